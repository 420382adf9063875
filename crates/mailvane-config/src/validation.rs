// SPDX-FileCopyrightText: 2026 Mailvane Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for loaded configuration.
//!
//! Figment + serde catch type mismatches and unknown fields; this module
//! checks value-level constraints that serde cannot express.

use thiserror::Error;

use crate::model::MailvaneConfig;

/// A value-level configuration error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("agent.log_level must be one of trace|debug|info|warn|error, got '{0}'")]
    InvalidLogLevel(String),

    #[error("anthropic.max_tokens must be greater than zero")]
    ZeroMaxTokens,

    #[error("anthropic.default_model must not be empty")]
    EmptyModel,
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a loaded configuration, collecting every violation.
pub fn validate_config(config: &MailvaneConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.agent.log_level.clone()));
    }

    if config.anthropic.max_tokens == 0 {
        errors.push(ConfigError::ZeroMaxTokens);
    }

    if config.anthropic.default_model.trim().is_empty() {
        errors.push(ConfigError::EmptyModel);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MailvaneConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&MailvaneConfig::default()).is_ok());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = MailvaneConfig::default();
        config.agent.log_level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigError::InvalidLogLevel("verbose".into())]
        );
    }

    #[test]
    fn multiple_violations_are_collected() {
        let mut config = MailvaneConfig::default();
        config.agent.log_level = "loud".into();
        config.anthropic.max_tokens = 0;
        config.anthropic.default_model = "  ".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
