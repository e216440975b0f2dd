//! Idempotent create-or-update steps against the admin REST API.
//!
//! Each reconciler only adds or replaces resources; nothing absent from the
//! configuration is ever deleted.

pub mod client;
pub mod context;
pub mod group;
pub mod realm;
pub mod report;
pub mod representation;
pub mod user;

pub use client::ensure_client;
pub use context::ReconcileContext;
pub use group::ensure_groups;
pub use realm::ensure_realm;
pub use report::{Outcome, ReconcileWarning, ResourceKind, ResourceResult, RunReport};
pub use user::ensure_users;
