//! Command-line flags. They override `coala.toml` and the environment.

use crate::config::Config;
use crate::session::HistoryRetention;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "coala", version, about = "Chat with an instruction-tuned model and its PEFT adapter")]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./coala.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the model server
    #[arg(long)]
    pub server_url: Option<String>,

    /// Maximum number of new tokens per answer
    #[arg(long)]
    pub max_new_tokens: Option<u32>,

    /// Which turns to show: `all` or `latest`
    #[arg(long)]
    pub history: Option<HistoryRetention>,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.server_url {
            config.server.url = url.clone();
        }
        if let Some(max_new_tokens) = self.max_new_tokens {
            config.generation.max_new_tokens = max_new_tokens;
        }
        if let Some(history) = self.history {
            config.session.history = history;
        }
    }
}
