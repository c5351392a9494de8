//! reddit-persona command-line binary.
//!
//! Builds a persona report for one Reddit user and writes it to
//! `<output_dir>/<username>_persona.txt`.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` — key for `--use-llm`
//! - `HF_API_KEY` — key for `--use-hf-llm`
//! - `REDDIT_PERSONA_CONFIG` — YAML config file
//! - `REDDIT_PERSONA_USER_AGENT`, `REDDIT_PERSONA_LIMIT`, `REDDIT_PERSONA_OUTPUT_DIR`
//! - `RUST_LOG` — tracing filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! reddit-persona https://www.reddit.com/user/spez/ --use-hf-llm
//! ```

use std::process::ExitCode;

use clap::Parser;

use reddit_persona::cli::{execute, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.resolve_config() {
        Ok(config) => execute(&cli, &config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(path) => {
            println!("User persona written to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,reddit_persona=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_target(false)
        .init();
}
