// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message and inline-keyboard rendering for the admin console.
//!
//! Pure functions from application records to display text plus controls.
//! Messages are plain text (no parse mode) so user-supplied contact data can
//! never break Telegram entity parsing.

use cupflow_core::types::{Application, ApplicationKind, ApplicationStatus};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::callback::CallbackAction;
use crate::filter::ResolvedFilter;

/// Records per list page.
pub const PAGE_SIZE: i64 = 5;

/// Select buttons per keyboard row in the list view.
const SELECT_BUTTONS_PER_ROW: usize = 5;

/// A rendered list page.
#[derive(Debug, Clone)]
pub struct ListView {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

/// Status label with its emoji glyph, as shown everywhere in the console.
pub fn status_label(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::New => "🔴 новая",
        ApplicationStatus::InProgress => "🟡 в работе",
        ApplicationStatus::Done => "✅ завершена",
        ApplicationStatus::Rejected => "❌ отклонена",
    }
}

fn kind_glyph(kind: ApplicationKind) -> &'static str {
    match kind {
        ApplicationKind::Cups => "🥤",
        ApplicationKind::Brand => "🏢",
    }
}

fn kind_title(kind: ApplicationKind) -> &'static str {
    match kind {
        ApplicationKind::Cups => "🥤 Бесплатные стаканчики",
        ApplicationKind::Brand => "🏢 Заявка для бренда",
    }
}

/// Total pages for a match count; at least one.
pub fn page_count(total: i64) -> i64 {
    ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1)
}

/// Render one list page: a line per application, select buttons in rows of
/// five, and a navigation row when the result set spans multiple pages.
/// "Previous" appears only past page 1, "next" only before the last page.
pub fn list_view(apps: &[Application], filter: &ResolvedFilter, page: i64, total: i64) -> ListView {
    let lines: Vec<String> = apps
        .iter()
        .map(|app| {
            format!(
                "#{} [{}] — {} — {}",
                app.id,
                kind_glyph(app.kind),
                app.contact,
                status_label(app.status)
            )
        })
        .collect();

    let text = format!(
        "📋 Заявки ({}):\n\n{}\n\n👉 Нажмите на номер заявки:",
        filter.description,
        lines.join("\n")
    );

    let select_buttons: Vec<InlineKeyboardButton> = apps
        .iter()
        .map(|app| {
            InlineKeyboardButton::callback(
                format!("#{}", app.id),
                CallbackAction::Select(app.id).encode(),
            )
        })
        .collect();

    let mut rows: Vec<Vec<InlineKeyboardButton>> = select_buttons
        .chunks(SELECT_BUTTONS_PER_ROW)
        .map(|chunk| chunk.to_vec())
        .collect();

    let pages = page_count(total);
    if total > PAGE_SIZE {
        let mut nav = Vec::new();
        if page > 1 {
            nav.push(InlineKeyboardButton::callback(
                "⬅️",
                CallbackAction::Page {
                    page: page - 1,
                    filter: filter.raw.clone(),
                }
                .encode(),
            ));
        }
        nav.push(InlineKeyboardButton::callback(
            format!("· {page}/{pages} ·"),
            CallbackAction::Noop.encode(),
        ));
        if page < pages {
            nav.push(InlineKeyboardButton::callback(
                "➡️",
                CallbackAction::Page {
                    page: page + 1,
                    filter: filter.raw.clone(),
                }
                .encode(),
            ));
        }
        rows.push(nav);
    }

    ListView {
        text,
        keyboard: InlineKeyboardMarkup::new(rows),
    }
}

/// Text shown when a list filter matches nothing.
pub fn empty_list_text(filter: &ResolvedFilter) -> String {
    format!("📭 Нет заявок ({}).", filter.description)
}

/// Render the full detail view of one application, with the three status
/// transition controls and a back-to-list control.
///
/// Every transition is offered regardless of the current status, including
/// re-applying it.
pub fn detail_view(app: &Application) -> (String, InlineKeyboardMarkup) {
    let text = format!(
        "{}\n\nТекущий статус: {}",
        field_block(app, "🆔"),
        status_label(app.status)
    );

    let mut rows = status_rows(app.id);
    rows.push(vec![InlineKeyboardButton::callback(
        "⬅️ Назад к списку",
        CallbackAction::BackToList.encode(),
    )]);

    (text, InlineKeyboardMarkup::new(rows))
}

/// Render the push notification sent to every admin on creation. Same field
/// rendering as the detail view, always status `new`, transition controls
/// only.
pub fn push_view(app: &Application) -> (String, InlineKeyboardMarkup) {
    let text = format!(
        "{}\nСтатус: {}",
        field_block(app, "🆕"),
        status_label(ApplicationStatus::New)
    );

    (text, InlineKeyboardMarkup::new(status_rows(app.id)))
}

/// The short in-place confirmation shown after a status change.
pub fn status_changed_text(id: i64, status: ApplicationStatus) -> String {
    format!("🆔 Заявка #{id}\nСтатус: {}", status_label(status))
}

/// Field lines by kind: cups applications carry a city, brand applications a
/// size and an optional comment.
fn field_block(app: &Application, id_glyph: &str) -> String {
    match app.kind {
        ApplicationKind::Cups => format!(
            "{}\n{} Заявка #{}\nКонтакт: {}\nГород: {}\nТелефон: {}",
            kind_title(app.kind),
            id_glyph,
            app.id,
            app.contact,
            app.city.as_deref().unwrap_or("—"),
            app.phone,
        ),
        ApplicationKind::Brand => format!(
            "{}\n{} Заявка #{}\nКонтакт: {}\nТелефон: {}\nРазмер: {}\nКомментарий: {}",
            kind_title(app.kind),
            id_glyph,
            app.id,
            app.contact,
            app.phone,
            app.size.as_deref().unwrap_or("—"),
            app.comment.as_deref().unwrap_or("—"),
        ),
    }
}

fn status_rows(id: i64) -> Vec<Vec<InlineKeyboardButton>> {
    [
        ("✅ В работе", ApplicationStatus::InProgress),
        ("❌ Отклонена", ApplicationStatus::Rejected),
        ("✔️ Завершена", ApplicationStatus::Done),
    ]
    .into_iter()
    .map(|(label, status)| {
        vec![InlineKeyboardButton::callback(
            label,
            CallbackAction::SetStatus { id, status }.encode(),
        )]
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter;
    use teloxide::types::InlineKeyboardButtonKind;

    fn cups_app(id: i64, status: ApplicationStatus) -> Application {
        Application {
            id,
            kind: ApplicationKind::Cups,
            contact: "Анна".into(),
            phone: "79990001122".into(),
            city: Some("Казань".into()),
            size: None,
            comment: None,
            status,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    fn brand_app(id: i64) -> Application {
        Application {
            id,
            kind: ApplicationKind::Brand,
            contact: "ООО Ромашка".into(),
            phone: "79995556677".into(),
            city: None,
            size: Some("500 шт".into()),
            comment: None,
            status: ApplicationStatus::New,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    fn callback_payloads(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
        keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_page_of_many_offers_next_but_not_previous() {
        let apps: Vec<Application> = (8..=12).rev().map(|i| cups_app(i, ApplicationStatus::New)).collect();
        let resolved = filter::resolve("");
        let view = list_view(&apps, &resolved, 1, 12);

        let payloads = callback_payloads(&view.keyboard);
        assert!(payloads.contains(&"page:2:".to_string()), "{payloads:?}");
        assert!(!payloads.iter().any(|p| p == "page:0:"));
        assert!(payloads.contains(&"noop".to_string()));
        // Five select buttons for five rows.
        assert_eq!(payloads.iter().filter(|p| p.starts_with("select:")).count(), 5);
    }

    #[test]
    fn last_partial_page_offers_previous_but_not_next() {
        let apps: Vec<Application> = (1..=2).rev().map(|i| cups_app(i, ApplicationStatus::New)).collect();
        let resolved = filter::resolve("");
        let view = list_view(&apps, &resolved, 3, 12);

        let payloads = callback_payloads(&view.keyboard);
        assert!(payloads.contains(&"page:2:".to_string()));
        assert!(!payloads.iter().any(|p| p == "page:4:"));
    }

    #[test]
    fn single_page_has_no_navigation_row() {
        let apps = vec![cups_app(1, ApplicationStatus::New)];
        let resolved = filter::resolve("");
        let view = list_view(&apps, &resolved, 1, 1);

        let payloads = callback_payloads(&view.keyboard);
        assert!(payloads.iter().all(|p| p.starts_with("select:")));
    }

    #[test]
    fn pagination_controls_carry_the_filter_text() {
        let apps: Vec<Application> = (1..=5).map(|i| brand_app(i)).collect();
        let resolved = filter::resolve("бренд новые");
        let view = list_view(&apps, &resolved, 2, 12);

        let payloads = callback_payloads(&view.keyboard);
        assert!(payloads.contains(&"page:1:бренд новые".to_string()));
        assert!(payloads.contains(&"page:3:бренд новые".to_string()));
    }

    #[test]
    fn list_lines_show_id_glyph_contact_and_status() {
        let apps = vec![cups_app(3, ApplicationStatus::InProgress)];
        let resolved = filter::resolve("");
        let view = list_view(&apps, &resolved, 1, 1);
        assert!(view.text.contains("#3 [🥤] — Анна — 🟡 в работе"));
        assert!(view.text.contains("активные"));
    }

    #[test]
    fn cups_detail_shows_city_and_not_size() {
        let (text, keyboard) = detail_view(&cups_app(5, ApplicationStatus::New));
        assert!(text.contains("Город: Казань"));
        assert!(!text.contains("Размер"));
        assert!(text.contains("Текущий статус: 🔴 новая"));

        let payloads = callback_payloads(&keyboard);
        assert_eq!(
            payloads,
            vec![
                "status:5:in_progress",
                "status:5:rejected",
                "status:5:done",
                "back_to_list",
            ]
        );
    }

    #[test]
    fn brand_detail_shows_size_and_placeholder_comment() {
        let (text, _) = detail_view(&brand_app(6));
        assert!(text.contains("Размер: 500 шт"));
        assert!(text.contains("Комментарий: —"));
        assert!(!text.contains("Город"));
    }

    #[test]
    fn transition_controls_do_not_depend_on_current_status() {
        let (_, done) = detail_view(&cups_app(9, ApplicationStatus::Done));
        let payloads = callback_payloads(&done);
        // The "done" transition is still offered on an already-done record.
        assert!(payloads.contains(&"status:9:done".to_string()));
    }

    #[test]
    fn push_view_renders_new_status_and_no_back_control() {
        let (text, keyboard) = push_view(&brand_app(11));
        assert!(text.contains("Статус: 🔴 новая"));
        let payloads = callback_payloads(&keyboard);
        assert_eq!(payloads.len(), 3);
        assert!(payloads.iter().all(|p| p.starts_with("status:11:")));
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(5), 1);
        assert_eq!(page_count(6), 2);
        assert_eq!(page_count(12), 3);
    }

    #[test]
    fn status_changed_text_names_the_application() {
        let text = status_changed_text(4, ApplicationStatus::Done);
        assert!(text.contains("#4"));
        assert!(text.contains("✅ завершена"));
    }
}
