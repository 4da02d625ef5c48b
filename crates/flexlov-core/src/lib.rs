//! List-of-values engine.
//!
//! Each registered catalog type blends three kinds of values for a tenant:
//! mandatory and optional values shared by everyone, and custom values owned by
//! the tenant. A tenant selects which optional and custom values its users may
//! pick from; mandatory values are always selected.
//!
//! - [`value`]: creation, visibility and soft deletion of values
//! - [`selection`]: a tenant's selected values and atomic selection changes
//! - [`defaults`]: idempotent synchronization of seed values
//! - [`app`]: registration of catalog types and startup

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod prelude;
pub mod selection;
pub mod value;

pub use app::{App, AppBuilder, AppBuilderOpts, AppState, GlobalTenantPolicy};
pub use catalog::Catalog;
pub use defaults::{CatalogReconcileResult, EntryFailure, ReconcileReport};

// vim: ts=4
