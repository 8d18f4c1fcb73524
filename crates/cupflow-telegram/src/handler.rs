// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command routing and callback handling for the admin console.
//!
//! Commands arrive as chat messages (`/заявки` with an optional free-text
//! filter argument), control activations as callback queries. Neither path
//! keeps server-side session state: everything needed to resume (filter
//! text, page) is decoded back out of the control payload.

use cupflow_core::CupflowError;
use cupflow_storage::Database;
use cupflow_storage::queries::applications;
use teloxide::payloads::{AnswerCallbackQuerySetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, ChatId, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, Message,
    MessageId,
};
use tracing::{debug, info, warn};

use crate::callback::CallbackAction;
use crate::{filter, view};

const ACCESS_DENIED: &str = "🚫 Доступ запрещён.";
const NOT_FOUND: &str = "Заявка не найдена";

const HELP_TEXT: &str = "👋 Привет! Я бот для управления заявками.

📋 Основные команды:
• /заявки — активные заявки (новые + в работе)
• /заявки новые — только новые
• /заявки в работе — только в работе
• /заявки завершённые — завершённые
• /заявки стаканчики — бесплатные стаканчики
• /заявки бренд — заявки от брендов

💡 После отправки заявки вы получите уведомление с кнопками для быстрого изменения статуса.";

/// Shared state handed to every handler invocation.
pub struct ConsoleContext {
    pub db: Database,
    pub admin_ids: Vec<i64>,
}

/// A recognized console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// List applications; `args` is the raw filter argument (may be empty).
    List { args: String },
}

/// Parse a message text into a console command.
///
/// The command word is case-insensitive, accepts the localized form and the
/// ASCII alias, and tolerates a `@botname` suffix. Non-commands yield `None`.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();
    let (word, rest) = match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    };
    let word = word.split('@').next().unwrap_or(word).to_lowercase();

    match word.as_str() {
        "/start" => Some(Command::Start),
        "/заявки" | "/applications" => Some(Command::List {
            args: rest.to_string(),
        }),
        _ => None,
    }
}

/// Whether the message sender is on the admin allow-list.
///
/// Messages without a sender (channel posts) are never admin. An empty
/// allow-list admits nobody.
pub fn is_admin(msg: &Message, admin_ids: &[i64]) -> bool {
    msg.from
        .as_ref()
        .is_some_and(|user| admin_ids.contains(&(user.id.0 as i64)))
}

/// Handle one inbound chat message.
pub async fn handle_message(
    bot: &Bot,
    ctx: &ConsoleContext,
    msg: &Message,
) -> Result<(), CupflowError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(command) = parse_command(text) else {
        return Ok(());
    };

    match command {
        Command::Start => send_help(bot, msg.chat.id).await,
        Command::List { args } => {
            // The bare command is open; filtered queries are admin-only.
            if !args.is_empty() && !is_admin(msg, &ctx.admin_ids) {
                warn!(chat_id = msg.chat.id.0, "filtered list command from non-admin");
                return bot
                    .send_message(msg.chat.id, ACCESS_DENIED)
                    .await
                    .map(drop)
                    .map_err(|e| channel_err("failed to send access notice", e));
            }
            send_list(bot, ctx, msg.chat.id, &args, 1).await
        }
    }
}

/// Handle one inline-control activation.
///
/// Every branch answers the callback query so the pressed button never
/// appears stuck, including unknown payloads.
pub async fn handle_callback(
    bot: &Bot,
    ctx: &ConsoleContext,
    q: &CallbackQuery,
) -> Result<(), CupflowError> {
    let action = q.data.as_deref().and_then(CallbackAction::parse);

    let Some(message) = q.message.as_ref() else {
        // The originating message is gone or inaccessible; acknowledge only.
        return answer(bot, q).await;
    };
    let chat_id = message.chat().id;
    let message_id = message.id();

    match action {
        None | Some(CallbackAction::Noop) => answer(bot, q).await,

        Some(CallbackAction::Select(id)) => match applications::get(&ctx.db, id).await? {
            None => bot
                .answer_callback_query(q.id.clone())
                .text(NOT_FOUND)
                .show_alert(true)
                .await
                .map(drop)
                .map_err(|e| channel_err("failed to answer callback", e)),
            Some(app) => {
                let (text, keyboard) = view::detail_view(&app);
                edit_or_send(bot, chat_id, message_id, &text, Some(keyboard)).await?;
                answer(bot, q).await
            }
        },

        Some(CallbackAction::SetStatus { id, status }) => {
            applications::set_status(&ctx.db, id, status).await?;
            info!(id, status = %status, "status updated from console");
            let text = view::status_changed_text(id, status);
            edit_or_send(bot, chat_id, message_id, &text, None).await?;
            bot.answer_callback_query(q.id.clone())
                .text(format!("Статус изменён: {}", view::status_label(status)))
                .await
                .map(drop)
                .map_err(|e| channel_err("failed to answer callback", e))
        }

        Some(CallbackAction::Page { page, filter }) => {
            // The control layout differs across pages, so the old message is
            // replaced rather than edited.
            delete_quietly(bot, chat_id, message_id).await;
            answer(bot, q).await?;
            send_list(bot, ctx, chat_id, &filter, page).await
        }

        Some(CallbackAction::BackToList) => {
            delete_quietly(bot, chat_id, message_id).await;
            answer(bot, q).await?;
            send_list(bot, ctx, chat_id, "", 1).await
        }
    }
}

/// Resolve the filter, fetch one page, and send it as a fresh message.
pub async fn send_list(
    bot: &Bot,
    ctx: &ConsoleContext,
    chat_id: ChatId,
    raw_filter: &str,
    page: i64,
) -> Result<(), CupflowError> {
    let resolved = filter::resolve(raw_filter);
    let total = applications::count(&ctx.db, &resolved.filter).await?;
    if total == 0 {
        return bot
            .send_message(chat_id, view::empty_list_text(&resolved))
            .await
            .map(drop)
            .map_err(|e| channel_err("failed to send empty list notice", e));
    }

    let page = page.clamp(1, view::page_count(total));
    let offset = (page - 1) * view::PAGE_SIZE;
    let apps = applications::list(&ctx.db, &resolved.filter, view::PAGE_SIZE, offset).await?;
    let list = view::list_view(&apps, &resolved, page, total);

    bot.send_message(chat_id, list.text)
        .reply_markup(list.keyboard)
        .await
        .map(drop)
        .map_err(|e| channel_err("failed to send list", e))
}

async fn send_help(bot: &Bot, chat_id: ChatId) -> Result<(), CupflowError> {
    let rows = [
        ["/заявки", "/заявки новые"],
        ["/заявки стаканчики", "/заявки бренд"],
        ["/заявки завершённые", "/заявки в работе"],
    ]
    .map(|row| row.map(KeyboardButton::new).to_vec());

    bot.send_message(chat_id, HELP_TEXT)
        .reply_markup(KeyboardMarkup::new(rows).resize_keyboard())
        .await
        .map(drop)
        .map_err(|e| channel_err("failed to send help", e))
}

/// Edit a message in place, falling back to sending a new message when
/// Telegram rejects the edit (expired message, foreign message, etc.).
async fn edit_or_send(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: &str,
    keyboard: Option<InlineKeyboardMarkup>,
) -> Result<(), CupflowError> {
    use teloxide::payloads::EditMessageTextSetters;

    let edit = match keyboard.clone() {
        Some(kb) => {
            bot.edit_message_text(chat_id, message_id, text)
                .reply_markup(kb)
                .await
        }
        None => bot.edit_message_text(chat_id, message_id, text).await,
    };

    match edit {
        Ok(_) => Ok(()),
        Err(e) if e.to_string().contains("message is not modified") => Ok(()),
        Err(e) => {
            warn!(error = %e, "edit rejected, sending a new message instead");
            let send = match keyboard {
                Some(kb) => bot.send_message(chat_id, text).reply_markup(kb).await,
                None => bot.send_message(chat_id, text).await,
            };
            send.map(drop)
                .map_err(|e| channel_err("failed to send edit fallback", e))
        }
    }
}

/// Delete a message we are about to replace; failure is not actionable.
async fn delete_quietly(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    if let Err(e) = bot.delete_message(chat_id, message_id).await {
        debug!(error = %e, "could not delete replaced message");
    }
}

async fn answer(bot: &Bot, q: &CallbackQuery) -> Result<(), CupflowError> {
    bot.answer_callback_query(q.id.clone())
        .await
        .map(drop)
        .map_err(|e| channel_err("failed to answer callback", e))
}

fn channel_err(what: &str, e: teloxide::RequestError) -> CupflowError {
    let message = format!("{what}: {e}");
    CupflowError::Channel {
        message,
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock private chat message from JSON, matching the Telegram
    /// Bot API structure.
    fn make_private_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    /// Build a mock message without a sender.
    fn make_no_sender_message(text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": 12345i64,
                "type": "private",
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    #[test]
    fn bare_command_parses_with_empty_args() {
        assert_eq!(
            parse_command("/заявки"),
            Some(Command::List { args: String::new() })
        );
        assert_eq!(
            parse_command("/applications"),
            Some(Command::List { args: String::new() })
        );
    }

    #[test]
    fn command_argument_is_passed_through() {
        assert_eq!(
            parse_command("/заявки бренд завершённые"),
            Some(Command::List {
                args: "бренд завершённые".to_string()
            })
        );
        assert_eq!(
            parse_command("/applications brand done"),
            Some(Command::List {
                args: "brand done".to_string()
            })
        );
    }

    #[test]
    fn command_word_is_case_insensitive() {
        assert_eq!(
            parse_command("/ЗАЯВКИ новые"),
            Some(Command::List {
                args: "новые".to_string()
            })
        );
        assert_eq!(
            parse_command("/Applications"),
            Some(Command::List { args: String::new() })
        );
    }

    #[test]
    fn bot_name_suffix_is_tolerated() {
        assert_eq!(
            parse_command("/applications@cupflow_bot новые"),
            Some(Command::List {
                args: "новые".to_string()
            })
        );
    }

    #[test]
    fn start_command_parses() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
    }

    #[test]
    fn non_commands_are_ignored() {
        assert_eq!(parse_command("привет"), None);
        assert_eq!(parse_command("/unknown"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn admin_by_id_passes() {
        let msg = make_private_message(12345, "/заявки новые");
        assert!(is_admin(&msg, &[12345]));
    }

    #[test]
    fn non_admin_is_rejected() {
        let msg = make_private_message(12345, "/заявки новые");
        assert!(!is_admin(&msg, &[99999]));
    }

    #[test]
    fn empty_allow_list_admits_nobody() {
        let msg = make_private_message(12345, "/заявки");
        assert!(!is_admin(&msg, &[]));
    }

    #[test]
    fn message_without_sender_is_never_admin() {
        let msg = make_no_sender_message("/заявки");
        assert!(!is_admin(&msg, &[12345]));
    }

    #[test]
    fn mock_callback_query_payload_parses() {
        // A callback query as Telegram delivers it; the payload decodes into
        // the select action against the carried message.
        let json = serde_json::json!({
            "id": "77",
            "from": {
                "id": 12345u64,
                "is_bot": false,
                "first_name": "Test",
            },
            "chat_instance": "instance",
            "data": "select:9",
            "message": {
                "message_id": 5,
                "date": 1700000000i64,
                "chat": {
                    "id": 12345i64,
                    "type": "private",
                    "first_name": "Test",
                },
                "text": "📋 Заявки",
            },
        });
        let q: CallbackQuery =
            serde_json::from_value(json).expect("failed to deserialize mock callback query");
        assert_eq!(
            q.data.as_deref().and_then(CallbackAction::parse),
            Some(CallbackAction::Select(9))
        );
        assert!(q.message.is_some());
    }
}
