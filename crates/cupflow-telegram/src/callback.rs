// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline-keyboard callback payload codec.
//!
//! Every piece of state the console needs to resume an interaction (selected
//! application, target status, page number, active filter text) travels
//! inside the callback data of the control that triggers it; nothing is kept
//! server-side. This module is the explicit serialize/deserialize pair for
//! that wire contract:
//!
//! - `select:<id>`
//! - `status:<id>:<new_status>`
//! - `page:<page>:<filter_text>`
//! - `back_to_list`
//! - `noop`
//!
//! Telegram caps callback data at 64 bytes; filter text is the only
//! open-ended segment and is user-typed command input, kept last so colons
//! inside it never shift the fixed fields.

use std::str::FromStr;

use cupflow_core::types::ApplicationStatus;

/// A decoded control activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Open the detail view for one application.
    Select(i64),
    /// Overwrite the status of one application.
    SetStatus {
        id: i64,
        status: ApplicationStatus,
    },
    /// Jump to a list page under the given raw filter text.
    Page { page: i64, filter: String },
    /// Return from a detail view to the default list.
    BackToList,
    /// The inert page indicator; acknowledged and nothing else.
    Noop,
}

impl CallbackAction {
    /// Encode into the callback-data wire format.
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Select(id) => format!("select:{id}"),
            CallbackAction::SetStatus { id, status } => format!("status:{id}:{status}"),
            CallbackAction::Page { page, filter } => format!("page:{page}:{filter}"),
            CallbackAction::BackToList => "back_to_list".to_string(),
            CallbackAction::Noop => "noop".to_string(),
        }
    }

    /// Decode callback data. Malformed or unknown payloads yield `None`;
    /// the caller acknowledges and drops them.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "back_to_list" => return Some(CallbackAction::BackToList),
            "noop" => return Some(CallbackAction::Noop),
            _ => {}
        }

        if let Some(rest) = data.strip_prefix("select:") {
            return rest.parse().ok().map(CallbackAction::Select);
        }

        if let Some(rest) = data.strip_prefix("status:") {
            let (id, status) = rest.split_once(':')?;
            return Some(CallbackAction::SetStatus {
                id: id.parse().ok()?,
                status: ApplicationStatus::from_str(status).ok()?,
            });
        }

        if let Some(rest) = data.strip_prefix("page:") {
            // Only the first colon separates the page number; the remainder
            // is the filter text verbatim, colons and all.
            let (page, filter) = rest.split_once(':')?;
            let page: i64 = page.parse().ok()?;
            if page < 1 {
                return None;
            }
            return Some(CallbackAction::Page {
                page,
                filter: filter.to_string(),
            });
        }

        None
    }
}
