// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cupflow - application intake with a Telegram admin console.
//!
//! This is the binary entry point for the Cupflow service.

use clap::{Parser, Subcommand};
use cupflow_config::CupflowConfig;

mod serve;

/// Cupflow - application intake with a Telegram admin console.
#[derive(Parser, Debug)]
#[command(name = "cupflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway and the Telegram admin console.
    Serve,
    /// Print the resolved configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cupflow_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            cupflow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Config) => match toml::to_string_pretty(&redacted(&config)) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render config: {e}");
                std::process::exit(1);
            }
        },
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// A copy of the configuration safe to print.
fn redacted(config: &CupflowConfig) -> CupflowConfig {
    let mut config = config.clone();
    if config.telegram.bot_token.is_some() {
        config.telegram.bot_token = Some("[redacted]".to_string());
    }
    config
}
