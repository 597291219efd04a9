// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `zela serve`: wires storage, stores, dispatcher and gateway together.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use zela_agent::{DispatcherConfig, MessageDispatcher};
use zela_config::model::ZelaConfig;
use zela_context::{ContextManager, MemoryStore, SessionTokens, VerificationCodes};
use zela_core::{ExpiringStore, StorageAdapter, ZelaError};
use zela_gateway::{GatewayState, LogSender, ServerConfig, start_server};
use zela_identity::PhoneNormalizer;
use zela_storage::{SqliteExpiringStore, SqliteStorage};

use crate::assistant::UnconfiguredAssistant;
use crate::shutdown::install_signal_handler;

/// Runs the server until SIGINT/SIGTERM.
pub async fn run_serve(config: ZelaConfig) -> Result<(), ZelaError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting zela serve");

    let normalizer = PhoneNormalizer::new(config.identity.country_code.clone());

    let storage = Arc::new(SqliteStorage::new(
        config.storage.clone(),
        normalizer.clone(),
    ));
    storage.initialize().await?;

    // Codes and panel sessions survive restarts; conversations do not.
    let durable: Arc<dyn ExpiringStore> =
        Arc::new(SqliteExpiringStore::new(storage.database()?.clone()));
    let contexts = Arc::new(ContextManager::from_config(
        Arc::new(MemoryStore::new()),
        &config.context,
    ));
    let codes = Arc::new(VerificationCodes::new(
        durable.clone(),
        normalizer.clone(),
        Duration::from_secs(config.verification.code_ttl_secs),
    ));
    let sessions = Arc::new(SessionTokens::new(
        durable.clone(),
        normalizer.clone(),
        Duration::from_secs(config.gateway.session_ttl_secs),
    ));

    warn!("no assistant provider configured; free-text extraction and answers are disabled");
    let dispatcher = Arc::new(MessageDispatcher::new(
        storage.clone(),
        Arc::new(UnconfiguredAssistant),
        contexts.clone(),
        normalizer,
        DispatcherConfig::from_config(&config),
    ));

    let cancel = install_signal_handler();

    tokio::spawn(sweep_loop(
        contexts,
        durable,
        Duration::from_secs(config.context.sweep_interval_secs),
        cancel.clone(),
    ));

    let state = GatewayState {
        dispatcher,
        storage: storage.clone(),
        sender: Arc::new(LogSender),
        codes,
        sessions,
        require_registration: config.verification.require_registration,
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let served = start_server(&server_config, state, cancel.clone()).await;
    cancel.cancel();

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to checkpoint database on shutdown");
    }
    served?;

    info!("zela serve shutdown complete");
    Ok(())
}

/// Purges expired contexts, codes and sessions every `every` until cancelled.
pub(crate) async fn sweep_loop(
    contexts: Arc<ContextManager>,
    durable: Arc<dyn ExpiringStore>,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(every);
    // Skip the first immediate tick.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match contexts.sweep().await {
                    Ok(0) => {}
                    Ok(n) => debug!(removed = n, "expired conversation contexts swept"),
                    Err(e) => warn!(error = %e, "context sweep failed"),
                }
                match durable.sweep().await {
                    Ok(0) => {}
                    Ok(n) => debug!(removed = n, "expired codes and sessions swept"),
                    Err(e) => warn!(error = %e, "durable store sweep failed"),
                }
            }
            _ = cancel.cancelled() => {
                debug!("sweep task shutting down");
                break;
            }
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zela={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sweep_loop_purges_expired_entries_until_cancelled() {
        let memory = Arc::new(MemoryStore::new());
        memory
            .set("ctx:5561981474690", "{}".into(), Duration::from_secs(1))
            .await
            .unwrap();
        let durable = Arc::new(MemoryStore::new());
        durable
            .set("code:5561981474690", "123456".into(), Duration::from_secs(1))
            .await
            .unwrap();
        let contexts = Arc::new(ContextManager::new(
            memory.clone(),
            Duration::from_secs(1),
            10,
        ));

        let cancel = CancellationToken::new();
        let task = tokio::spawn(sweep_loop(
            contexts,
            durable.clone(),
            Duration::from_secs(5),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(memory.is_empty());
        assert!(durable.is_empty());

        cancel.cancel();
        task.await.unwrap();
    }
}
