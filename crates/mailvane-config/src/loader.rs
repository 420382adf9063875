// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mailvane.toml` > `~/.config/mailvane/mailvane.toml`
//! > `/etc/mailvane/mailvane.toml` with environment variable overrides via the
//! `MAILVANE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MailvaneConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mailvane/mailvane.toml` (system-wide)
/// 3. `~/.config/mailvane/mailvane.toml` (user XDG config)
/// 4. `./mailvane.toml` (local directory)
/// 5. `MAILVANE_*` environment variables
pub fn load_config() -> Result<MailvaneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MailvaneConfig::default()))
        .merge(Toml::file("/etc/mailvane/mailvane.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mailvane/mailvane.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("mailvane.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MailvaneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MailvaneConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MailvaneConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MailvaneConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MAILVANE_ANTHROPIC_API_KEY` must map to
/// `anthropic.api_key`, not `anthropic.api.key`.
fn env_provider() -> Env {
    Env::prefixed("MAILVANE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: MAILVANE_ANTHROPIC_API_KEY -> "anthropic_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("triage_", "triage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.name, "mailvane");
        assert_eq!(config.anthropic.max_tokens, 1024);
        assert!(config.triage.rerank_matches);
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailvane.toml");
        std::fs::write(&path, "[agent]\nname = \"from-file\"\n").unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.agent.name, "from-file");
    }

    #[test]
    fn toml_values_override_defaults() {
        let config = load_config_from_str(
            r#"
[anthropic]
default_model = "claude-haiku-4-5-20250901"
max_tokens = 512
"#,
        )
        .unwrap();
        assert_eq!(config.anthropic.default_model, "claude-haiku-4-5-20250901");
        assert_eq!(config.anthropic.max_tokens, 512);
        // Untouched sections keep defaults.
        assert_eq!(config.agent.log_level, "info");
    }
}
