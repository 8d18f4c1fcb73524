// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./cupflow.toml` > `~/.config/cupflow/cupflow.toml`
//! > `/etc/cupflow/cupflow.toml` with environment variable overrides via the
//! `CUPFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CupflowConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cupflow/cupflow.toml` (system-wide)
/// 3. `~/.config/cupflow/cupflow.toml` (user XDG config)
/// 4. `./cupflow.toml` (local directory)
/// 5. `CUPFLOW_*` environment variables
pub fn load_config() -> Result<CupflowConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CupflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CupflowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CupflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CupflowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for
/// diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CupflowConfig::default()))
        .merge(Toml::file("/etc/cupflow/cupflow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cupflow/cupflow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cupflow.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CUPFLOW_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("CUPFLOW_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
