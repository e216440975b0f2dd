pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod reconcile;
pub mod transport;

pub use auth::{AdminCredentials, AdminToken, Authenticator};
pub use config::{load_config, load_config_from_str, Configuration};
pub use error::{ConfigError, ReconcileError, SetupError};
pub use orchestrator::{Orchestrator, RunSummary};
pub use reconcile::{ReconcileContext, ReconcileWarning, RunReport};
pub use transport::{RetryPolicy, Transport};
