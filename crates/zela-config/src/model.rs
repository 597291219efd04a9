// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level Zela configuration.
///
/// Every section is optional and defaults to values suitable for a single
/// Brazilian deployment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZelaConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Phone number canonicalization.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Conversation context store.
    #[serde(default)]
    pub context: ContextConfig,

    /// WhatsApp login codes.
    #[serde(default)]
    pub verification: VerificationConfig,

    /// SQLite ledger.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP webhook and portal server.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Transaction extraction policy.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in log lines and the health endpoint.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Portal address quoted in confirmation messages.
    #[serde(default = "default_panel_url")]
    pub panel_url: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            panel_url: default_panel_url(),
        }
    }
}

fn default_agent_name() -> String {
    "zela".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_panel_url() -> String {
    "usezela.com/painel".to_string()
}

/// Phone number canonicalization settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Country code prepended to bare national numbers.
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
        }
    }
}

fn default_country_code() -> String {
    "55".to_string()
}

/// Conversation context settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Inactivity window after which a conversation is forgotten.
    #[serde(default = "default_context_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of messages kept per conversation.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Interval between sweeps of expired contexts.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Number of recent messages passed to the assistant as history.
    #[serde(default = "default_history_in_prompt")]
    pub history_in_prompt: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_context_ttl_secs(),
            max_messages: default_max_messages(),
            sweep_interval_secs: default_sweep_interval_secs(),
            history_in_prompt: default_history_in_prompt(),
        }
    }
}

fn default_context_ttl_secs() -> u64 {
    600
}

fn default_max_messages() -> usize {
    10
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_history_in_prompt() -> usize {
    5
}

/// WhatsApp login code settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VerificationConfig {
    /// Lifetime of an issued code.
    #[serde(default = "default_code_ttl_secs")]
    pub code_ttl_secs: u64,

    /// Only numbers that have messaged the bot may request a code.
    #[serde(default = "default_require_registration")]
    pub require_registration: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: default_code_ttl_secs(),
            require_registration: default_require_registration(),
        }
    }
}

fn default_code_ttl_secs() -> u64 {
    300
}

fn default_require_registration() -> bool {
    true
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("zela").join("zela.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("zela.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Lifetime of a portal session token.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_session_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

/// Transaction extraction policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Extractions scoring below this are held for confirmation instead of saved.
    #[serde(default = "default_confirm_threshold")]
    pub confirm_threshold: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            confirm_threshold: default_confirm_threshold(),
        }
    }
}

fn default_confirm_threshold() -> f32 {
    0.7
}
