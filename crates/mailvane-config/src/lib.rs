// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Mailvane triage engine.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and value-level post-deserialization checks.
//!
//! # Usage
//!
//! ```no_run
//! let config = mailvane_config::load_and_validate().expect("config errors");
//! println!("model: {}", config.anthropic.default_model);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MailvaneConfig;
pub use validation::ConfigError;

use mailvane_core::MailvaneError;

/// Load configuration from the XDG hierarchy and validate it.
///
/// The high-level entry point: loads config from TOML files + env vars via
/// Figment, then runs value-level validation. Violations are joined into a
/// single [`MailvaneError::Config`] message.
pub fn load_and_validate() -> Result<MailvaneConfig, MailvaneError> {
    let config = loader::load_config()
        .map_err(|e| MailvaneError::Config(e.to_string()))?;
    check(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<MailvaneConfig, MailvaneError> {
    let config = loader::load_config_from_str(toml_content)
        .map_err(|e| MailvaneError::Config(e.to_string()))?;
    check(config)
}

fn check(config: MailvaneConfig) -> Result<MailvaneConfig, MailvaneError> {
    validation::validate_config(&config).map_err(|errors| {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        MailvaneError::Config(joined)
    })?;
    Ok(config)
}
