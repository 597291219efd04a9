// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod assistant;
pub mod channel;
pub mod storage;
pub mod store;

pub use adapter::PluginAdapter;
pub use assistant::AssistantAdapter;
pub use channel::MessageSender;
pub use storage::StorageAdapter;
pub use store::ExpiringStore;
