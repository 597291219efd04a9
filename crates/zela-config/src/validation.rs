// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: non-empty paths, a bindable
//! address, digit-only country codes, and non-zero lifetimes.

use crate::diagnostic::ConfigError;
use crate::model::ZelaConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every violation instead of stopping at the first one.
pub fn validate_config(config: &ZelaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.agent.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` must be one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let cc = config.identity.country_code.trim();
    if cc.is_empty() || cc.len() > 3 || !cc.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(ConfigError::validation(format!(
            "identity.country_code `{cc}` must be 1 to 3 digits"
        )));
    }

    if config.context.ttl_secs == 0 {
        errors.push(ConfigError::validation("context.ttl_secs must be greater than 0"));
    }
    if config.context.max_messages == 0 {
        errors.push(ConfigError::validation(
            "context.max_messages must be at least 1",
        ));
    }
    if config.context.sweep_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "context.sweep_interval_secs must be greater than 0",
        ));
    }
    if config.context.history_in_prompt > config.context.max_messages {
        errors.push(ConfigError::validation(format!(
            "context.history_in_prompt ({}) cannot exceed context.max_messages ({})",
            config.context.history_in_prompt, config.context.max_messages
        )));
    }

    if config.verification.code_ttl_secs == 0 {
        errors.push(ConfigError::validation(
            "verification.code_ttl_secs must be greater than 0",
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        )));
    }
    if config.gateway.session_ttl_secs == 0 {
        errors.push(ConfigError::validation(
            "gateway.session_ttl_secs must be greater than 0",
        ));
    }

    let threshold = config.extraction.confirm_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        errors.push(ConfigError::validation(format!(
            "extraction.confirm_threshold must be within [0, 1], got {threshold}"
        )));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&ZelaConfig::default()).is_ok());
    }

    #[test]
    fn rejects_non_digit_country_code() {
        let mut config = ZelaConfig::default();
        config.identity.country_code = "+55".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("identity.country_code"));
    }

    #[test]
    fn collects_every_violation() {
        let mut config = ZelaConfig::default();
        config.context.ttl_secs = 0;
        config.context.max_messages = 0;
        config.storage.database_path = "  ".into();
        config.extraction.confirm_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        // history_in_prompt (5) > max_messages (0) is reported too.
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = ZelaConfig::default();
        config.agent.log_level = "verbose".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn accepts_hostname_and_ipv6() {
        let mut config = ZelaConfig::default();
        config.gateway.host = "api.usezela.com".into();
        assert!(validate_config(&config).is_ok());
        config.gateway.host = "::1".into();
        assert!(validate_config(&config).is_ok());
        config.gateway.host = "bad host!".into();
        assert!(validate_config(&config).is_err());
    }
}
