// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cupflow serve` command implementation.
//!
//! Brings up the SQLite store, the Telegram admin console (long polling in a
//! background task), and the HTTP submission gateway, all sharing one tokio
//! runtime and one database handle.

use std::sync::Arc;

use cupflow_config::CupflowConfig;
use cupflow_core::{AdminNotifier, CupflowError};
use cupflow_gateway::{GatewayState, ServerConfig, start_server};
use cupflow_storage::Database;
use cupflow_telegram::AdminConsole;
use tracing::{error, info};

/// Runs the `cupflow serve` command.
pub async fn run_serve(config: CupflowConfig) -> Result<(), CupflowError> {
    init_tracing(&config.service.log_level);

    info!("starting cupflow serve");

    // The one fatal configuration error: serving without credentials.
    if config.telegram.bot_token.is_none() {
        error!("telegram.bot_token is not configured");
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token in cupflow.toml \
             or the CUPFLOW_TELEGRAM_BOT_TOKEN environment variable."
        );
        return Err(CupflowError::Config(
            "telegram.bot_token is required to serve".into(),
        ));
    }

    let db =
        Database::open_with_options(&config.storage.database_path, config.storage.wal_mode).await?;
    info!(path = config.storage.database_path.as_str(), "storage initialized");

    let console = Arc::new(AdminConsole::new(config.telegram.clone(), db.clone())?);
    console.connect().await?;
    info!(
        admins = config.telegram.admin_ids.len(),
        "admin console connected"
    );

    let notifier: Arc<dyn AdminNotifier> = console.clone();
    let state = GatewayState {
        db: db.clone(),
        notifier,
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let result = start_server(&server_config, state).await;

    // The gateway only returns on failure; wind the rest down behind it.
    console.shutdown().await;
    db.close().await?;
    result
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cupflow={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
