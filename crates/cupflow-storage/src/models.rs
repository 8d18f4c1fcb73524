// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types live in `cupflow-core::types` so the console and the
//! gateway share them. This module re-exports them for convenience within
//! the storage crate.

pub use cupflow_core::types::{
    Application, ApplicationFilter, ApplicationKind, ApplicationStatus, NewApplication,
    StatusFilter,
};
