// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and health shared by the assistant, sender, and storage backends.

use async_trait::async_trait;

use crate::error::ZelaError;
use crate::types::{AdapterType, HealthStatus};

/// Supertrait of every pluggable backend.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Name used in logs, e.g. `"sqlite"`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// `Degraded` means the backend answers but cannot do its real job.
    async fn health_check(&self) -> Result<HealthStatus, ZelaError>;

    async fn shutdown(&self) -> Result<(), ZelaError>;
}
