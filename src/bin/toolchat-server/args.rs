use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "toolchat-server",
    about = "Chat backend that lets a local model call file and knowledge-base tools"
)]
pub struct ServerArgs {
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
    /// Run a single turn with this message, print the answer and exit.
    #[arg(long)]
    pub prompt: Option<String>,
    /// Session to continue when running with `--prompt`.
    #[arg(long, requires = "prompt")]
    pub session: Option<String>,
}
