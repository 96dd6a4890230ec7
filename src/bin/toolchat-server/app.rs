use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use toolchat::agent::{Agent, ModelHandle};
use toolchat::api::Server;
use toolchat::backends::ollama::Ollama;
use toolchat::config::{load_config, AppConfig};
use toolchat::embedding::EmbeddingProvider;
use toolchat::persistence::{JsonSessionStore, SessionStore};
use toolchat::tools::{Sandbox, ToolBox};

use crate::args::ServerArgs;
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    let loaded = load_config(args.config.clone())?;
    let mut config = loaded.config;
    apply_overrides(&mut config, &args);

    let _logger = init_logging(&config.logging)?;
    if loaded.config_exists {
        log::info!("loaded config from {}", loaded.path.display());
    } else {
        log::info!("no config at {}, using defaults", loaded.path.display());
    }

    let agent = Arc::new(build_agent(&config)?);

    if let Some(prompt) = args.prompt.as_deref() {
        let output = agent
            .process_turn(prompt, args.session.as_deref())
            .await
            .context("chat turn failed")?;
        println!("{}", output.response);
        eprintln!("session: {}", output.session_id);
        return Ok(());
    }

    let addr = config.server.addr();
    Server::new(agent)
        .with_cors_origins(config.server.cors_origins.clone())
        .run(&addr)
        .await
        .with_context(|| format!("server on {addr} stopped"))?;
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &ServerArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
}

fn build_agent(config: &AppConfig) -> anyhow::Result<Agent> {
    let sandbox = Sandbox::new(&config.sandbox.root).with_context(|| {
        format!(
            "cannot create sandbox root {}",
            config.sandbox.root.display()
        )
    })?;
    log::info!("file tools confined to {}", sandbox.root().display());

    let mut tools = ToolBox::new(Arc::new(sandbox));
    if config.retrieval.enabled {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(Ollama::new(
            config.model.base_url.clone(),
            config.model.resolved_api_key(),
            Some(config.model.chat_model.clone()),
            Some(config.model.embedding_model.clone()),
            None,
            Some(config.model.timeout_seconds),
            None,
        )?);
        tools = tools.with_retrieval(config.retrieval.clone(), embedder);
    }

    let store: Arc<dyn SessionStore> =
        Arc::new(JsonSessionStore::new(config.storage.sessions_dir.clone()));
    let model = ModelHandle::ollama(config.model.clone());

    Ok(Agent::new(Arc::new(model), Arc::new(tools), store)
        .with_policy(config.agent.malformed_arguments)
        .with_title_max_chars(config.agent.title_max_chars))
}
