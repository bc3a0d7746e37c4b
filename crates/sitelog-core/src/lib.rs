//! # Sitelog Core
//!
//! Core traits, types, and errors for the sitelog bounded log store.
//!
//! This crate provides the abstractions the log store is written against,
//! so the same retention logic works with an in-memory repository (for
//! tests) and an embedded database (for real deployments).
//!
//! ## Key Traits
//!
//! - [`DocumentRepository`]: Create/query/delete entries with attached attributes
//! - [`SettingsStore`]: Named configuration scalars
//! - [`Clock`]: Time abstraction for testability
//!
//! ## Key Types
//!
//! - [`LogKind`]: Which log an entry belongs to (`404`, `mail`, `search`, ...)
//! - [`LogEntry`]: One recorded event
//! - [`SiteEvent`]: Host events that feed the logs

pub mod entry;
pub mod error;
pub mod event;
pub mod settings;
pub mod traits;

// Re-export main types
pub use entry::*;
pub use error::*;
pub use event::*;
pub use settings::*;
pub use traits::*;
