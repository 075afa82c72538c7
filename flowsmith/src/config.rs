use clap::Parser;
use flowsmith_core::FlowsmithError;
use flowsmith_llm::{DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL};
use secrecy::SecretString;

use crate::workflow::WorkflowOptions;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Chat with Gemini to design an automation agent workflow, then export it as JSON.
#[derive(Debug, Parser)]
#[command(name = "flowsmith", version, about)]
pub struct Cli {
    /// Gemini API key. Prefer setting it in the environment or a .env file.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, hide = true)]
    pub api_key: Option<String>,

    /// Gemini model used for every generation step.
    #[arg(long, env = "FLOWSMITH_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,

    /// Change requests accepted before giving up (0 = unlimited).
    #[arg(long, env = "FLOWSMITH_MAX_REVISIONS", default_value_t = 10)]
    pub max_revisions: u32,

    /// Attempts per model call when the provider fails transiently.
    #[arg(long, env = "FLOWSMITH_LLM_RETRIES", default_value_t = 3)]
    pub llm_retries: usize,

    /// Generations tried when the final JSON does not parse.
    #[arg(long, env = "FLOWSMITH_FINALIZE_ATTEMPTS", default_value_t = 2)]
    pub finalize_attempts: usize,

    #[arg(long, env = "FLOWSMITH_GEMINI_BASE_URL", default_value = GEMINI_BASE_URL, hide = true)]
    pub base_url: String,
}

#[derive(Debug)]
pub struct Settings {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub llm_retries: usize,
    pub workflow: WorkflowOptions,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self, FlowsmithError> {
        let api_key = cli
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                FlowsmithError::InvalidConfig(format!(
                    "{API_KEY_ENV} is missing. Set it in your environment or a .env file"
                ))
            })?;

        if cli.model.trim().is_empty() {
            return Err(FlowsmithError::InvalidConfig("model must not be empty".to_string()));
        }

        Ok(Self {
            api_key: SecretString::new(api_key),
            model: cli.model,
            base_url: cli.base_url,
            llm_retries: cli.llm_retries.max(1),
            workflow: WorkflowOptions {
                max_revisions: (cli.max_revisions > 0).then_some(cli.max_revisions),
                finalize_attempts: cli.finalize_attempts.max(1),
            },
        })
    }
}
