#[path = "toolchat-server/app.rs"]
mod app;
#[path = "toolchat-server/args.rs"]
mod args;
#[path = "toolchat-server/logging.rs"]
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
