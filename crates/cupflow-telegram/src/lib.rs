// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram admin console for the Cupflow application intake service.
//!
//! Administrators browse and triage applications through `/заявки` commands
//! and inline-keyboard controls. The console holds no per-session state:
//! everything needed to resume an interaction is encoded in the control
//! payloads and the database. The console also implements [`AdminNotifier`]
//! so the HTTP gateway can push creation notifications through it.

pub mod callback;
pub mod filter;
pub mod handler;
pub mod view;

use std::sync::Arc;

use async_trait::async_trait;
use cupflow_config::model::TelegramConfig;
use cupflow_core::error::CupflowError;
use cupflow_core::traits::AdminNotifier;
use cupflow_core::types::Application;
use cupflow_storage::Database;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::handler::ConsoleContext;

/// The Telegram-backed admin console.
///
/// Owns the bot handle, the admin allow-list (explicit configuration, not
/// ambient globals), and a database handle. `connect()` starts long polling
/// in a background task.
pub struct AdminConsole {
    bot: Bot,
    config: TelegramConfig,
    db: Database,
    dispatch_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl AdminConsole {
    /// Creates the console. Requires `config.bot_token` to be set and
    /// non-empty.
    pub fn new(config: TelegramConfig, db: Database) -> Result<Self, CupflowError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            CupflowError::Config("telegram.bot_token is required for the admin console".into())
        })?;

        if token.is_empty() {
            return Err(CupflowError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        if config.admin_ids.is_empty() {
            warn!("telegram.admin_ids is empty: nobody will receive push notifications");
        }

        let bot = Bot::new(token);

        Ok(Self {
            bot,
            config,
            db,
            dispatch_handle: Mutex::new(None),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Start long polling in a background task. Idempotent: a second call is
    /// a no-op while the dispatcher is running.
    pub async fn connect(&self) -> Result<(), CupflowError> {
        let mut handle_slot = self.dispatch_handle.lock().await;
        if handle_slot.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let ctx = Arc::new(ConsoleContext {
            db: self.db.clone(),
            admin_ids: self.config.admin_ids.clone(),
        });

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let message_ctx = Arc::clone(&ctx);
            let callback_ctx = Arc::clone(&ctx);

            let tree = dptree::entry()
                .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                    let ctx = Arc::clone(&message_ctx);
                    async move {
                        if let Err(e) = handler::handle_message(&bot, &ctx, &msg).await {
                            error!(error = %e, chat_id = msg.chat.id.0, "message handler failed");
                        }
                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(
                    move |bot: Bot, q: CallbackQuery| {
                        let ctx = Arc::clone(&callback_ctx);
                        async move {
                            if let Err(e) = handler::handle_callback(&bot, &ctx, &q).await {
                                error!(error = %e, "callback handler failed");
                            }
                            respond(())
                        }
                    },
                ));

            Dispatcher::builder(bot, tree)
                .default_handler(|_| async {}) // Silently ignore other update kinds
                .build()
                .dispatch()
                .await;
        });

        *handle_slot = Some(handle);
        Ok(())
    }

    /// Stop the long-poll dispatcher, if running.
    pub async fn shutdown(&self) {
        let mut handle_slot = self.dispatch_handle.lock().await;
        if let Some(handle) = handle_slot.take() {
            handle.abort();
            info!("Telegram dispatcher stopped");
        }
    }
}

#[async_trait]
impl AdminNotifier for AdminConsole {
    /// Fan the creation notice out to every configured admin, one task per
    /// recipient. A failing or slow recipient never delays the others; each
    /// failure is logged and swallowed.
    async fn notify_created(&self, app: &Application) {
        let (text, keyboard) = view::push_view(app);

        for &admin_id in &self.config.admin_ids {
            let bot = self.bot.clone();
            let text = text.clone();
            let keyboard = keyboard.clone();
            let app_id = app.id;

            tokio::spawn(async move {
                if let Err(e) = bot
                    .send_message(ChatId(admin_id), text)
                    .reply_markup(keyboard)
                    .await
                {
                    warn!(admin_id, app_id, error = %e, "push notification delivery failed");
                }
            });
        }
    }
}
