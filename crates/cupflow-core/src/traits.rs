// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between Cupflow components.

use async_trait::async_trait;

use crate::types::Application;

/// Push-notification seam between the submission gateway and the admin
/// console.
///
/// The gateway holds a `dyn AdminNotifier` so it never depends on the chat
/// transport directly. Delivery is best-effort: implementations must handle
/// and log per-recipient failures internally and never return them to the
/// submission path.
#[async_trait]
pub trait AdminNotifier: Send + Sync {
    /// Announce a freshly created application to every configured admin.
    async fn notify_created(&self, app: &Application);
}
