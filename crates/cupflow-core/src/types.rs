// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the store, the admin console, and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The two kinds of application the intake form produces.
///
/// The kind is fixed at creation and decides which optional fields are
/// meaningful: `Cups` carries a city, `Brand` carries a size and an
/// optional comment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    Cups,
    Brand,
}

/// Lifecycle status of an application.
///
/// Every application starts as `New`; administrators move it through the
/// other states from the console. There is no transition guard: any status
/// may be overwritten with any other, including itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    New,
    InProgress,
    Done,
    Rejected,
}

impl ApplicationStatus {
    /// The statuses the implicit "active" filter matches.
    pub const ACTIVE: [ApplicationStatus; 2] =
        [ApplicationStatus::New, ApplicationStatus::InProgress];
}

/// A persisted application record.
///
/// `id` is assigned by the store and is the external reference carried in
/// every chat control. Exactly one of `city` / `size` is present, determined
/// by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ApplicationKind,
    pub contact: String,
    pub phone: String,
    pub city: Option<String>,
    pub size: Option<String>,
    pub comment: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: String,
}

/// Insert payload for a new application.
///
/// Status and creation timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub kind: ApplicationKind,
    pub contact: String,
    pub phone: String,
    pub city: Option<String>,
    pub size: Option<String>,
    pub comment: Option<String>,
}

/// Status predicate for count/list queries.
///
/// `Active` is a status-set (`new` or `in_progress`), distinct from any
/// single-status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Is(ApplicationStatus),
    Active,
}

/// Structured filter for count/list queries.
///
/// Both fields optional; present fields combine with AND. The empty filter
/// matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub kind: Option<ApplicationKind>,
    pub status: Option<StatusFilter>,
}

impl ApplicationFilter {
    /// The implicit filter used when a list command carries no argument.
    pub fn active() -> Self {
        Self {
            kind: None,
            status: Some(StatusFilter::Active),
        }
    }
}
