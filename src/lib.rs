//! coala: a terminal chat front-end for an instruction-tuned causal LM with
//! a PEFT adapter, served by an external model server.

pub mod cli;
pub mod config;
pub mod engine;
pub mod llama;
pub mod postprocessing;
pub mod preprocessing;
pub mod session;
pub mod shell;

use crate::cli::Cli;
use crate::config::Config;
use crate::engine::Orchestrator;
use crate::llama::loader::{ModelLoader, ServerFactory};
use crate::llama::server::Timeouts;
use crate::preprocessing::PromptFormatter;
use crate::session::Session;
use crate::shell::Shell;
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coala_lib=info"));
    // Logs go to stderr so the transcript on stdout stays readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);
    config.validate().context("validating configuration")?;

    let loader = ModelLoader::new(ServerFactory {
        url: config.server_url()?,
        timeouts: Timeouts {
            connect: config.connect_timeout(),
            request: config.request_timeout(),
        },
        base_model: config.model.base.clone(),
        adapter: config.model.adapter.clone(),
    });
    let client = loader
        .get()
        .await
        .with_context(|| format!("connecting to model server at {}", config.server.url))?;
    info!(
        base_model = %config.model.base,
        adapter = config.model.adapter.as_deref().unwrap_or("<none>"),
        "Model ready"
    );

    let orchestrator = Orchestrator::new(
        client,
        PromptFormatter::new(config.template()?),
        config.generation.clone(),
    )
    .with_timeout(config.request_timeout());

    let mut shell = Shell::new(orchestrator, Session::new(config.session.history), config.ui);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    shell.run(stdin, &mut stdout).await
}
