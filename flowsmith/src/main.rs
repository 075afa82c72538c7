use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use flowsmith::{build_workflow_graph, ChatDriver, Cli, Console, Settings, TerminalConsole};
use flowsmith_core::RunnableExt;
use flowsmith_llm::{GoogleClient, PromptGenerator, TextGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_cli(Cli::parse())?;
    tracing::info!(model = %settings.model, "starting flowsmith");

    let client = GoogleClient::new(
        settings.api_key.expose_secret().as_str(),
        settings.model.clone(),
    )
    .context("failed to create the Gemini client")?
    .with_base_url(settings.base_url.clone());
    let generator: Arc<dyn TextGenerator> = Arc::new(
        PromptGenerator::new(client, settings.model.clone()).with_retries(settings.llm_retries),
    );

    let console: Arc<dyn Console> =
        Arc::new(TerminalConsole::new().context("failed to open the terminal")?);
    let graph = build_workflow_graph(generator, console.clone(), &settings.workflow, None);

    ChatDriver::new(graph, console)
        .run()
        .await
        .context("agent builder session failed")?;
    Ok(())
}
