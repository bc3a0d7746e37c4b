//! # Sitelog
//!
//! Bounded append-only logs for site events: page-not-found hits, outgoing
//! mail, and searches. Each log keeps at most `max_entries` entries and
//! evicts the oldest first.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sitelog::{LogStore, SettingsUpdate};
//! use sitelog_core::{LogKind, SiteEvent};
//!
//! let store = LogStore::in_memory();
//! store.update_settings(&LogKind::not_found(), SettingsUpdate::max_entries(500)).await?;
//!
//! store.record(SiteEvent::NotFound {
//!     url: "/old-page".into(),
//!     referrer: "https://example.com/".into(),
//!     ip_address: "203.0.113.9".into(),
//!     user_agent: "Mozilla/5.0".into(),
//! }).await;
//!
//! let newest = store.list(&LogKind::not_found(), Some(20), 0).await?;
//! ```

pub mod cli;
pub mod config;
pub mod login_guard;
pub mod retention;
pub mod store;

pub use config::{
    CapacityMode, ConfigError, DEFAULT_MAX_ENTRIES, LogStoreConfig, SettingsUpdate, SitelogConfig,
};
pub use login_guard::{LoginAttempt, LoginGuard, LoginGuardConfig};
pub use retention::RetentionPolicy;
pub use store::{AppendOutcome, LogStore};
