// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP submission gateway for the Cupflow application intake service.
//!
//! Exposes the intake form contract (`POST /api/submit`), the administrative
//! export (`GET /api/applications`), and a liveness probe (`GET /test`)
//! behind permissive CORS. Stored submissions are pushed to the admin
//! console through the [`AdminNotifier`](cupflow_core::AdminNotifier) seam.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, build_router, start_server};
