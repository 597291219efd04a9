// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/zela/zela.toml`, then `~/.config/zela/zela.toml`,
//! then `./zela.toml`, then `ZELA_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ZelaConfig;

/// Top-level sections, used to split `ZELA_SECTION_KEY` env vars.
const SECTIONS: &[&str] = &[
    "agent",
    "identity",
    "context",
    "verification",
    "storage",
    "gateway",
    "extraction",
];

/// Config files in merge order (later overrides earlier).
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/zela/zela.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("zela").join("zela.toml"));
    }
    paths.push(
        std::env::current_dir()
            .map(|d| d.join("zela.toml"))
            .unwrap_or_else(|_| PathBuf::from("zela.toml")),
    );
    paths
}

/// Build the Figment for the standard hierarchy without extracting it.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(ZelaConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<ZelaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ZelaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZelaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file plus env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ZelaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZelaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// `ZELA_*` provider mapping the first underscore after a known section to a dot.
///
/// `ZELA_GATEWAY_SESSION_TTL_SECS` becomes `gateway.session_ttl_secs`, not
/// `gateway.session.ttl.secs`.
fn env_provider() -> Env {
    Env::prefixed("ZELA_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|field| format!("{section}.{field}"))
        })
        .unwrap_or_else(|| key.to_string())
}
