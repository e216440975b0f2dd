use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Reconcile(#[from] ReconcileError),
}

/// Problems with the configuration document. Always raised before any
/// request reaches the server.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in configuration file: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Duplicate {kind} '{name}' in configuration")]
    Duplicate { kind: &'static str, name: String },
}

/// Fatal conditions that abort a reconciliation run.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Request to {url} failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Server URL '{0}' cannot be used as a base URL")]
    InvalidBaseUrl(String),

    #[error("Failed to get admin token ({status}): {body}")]
    Authentication { status: u16, body: String },

    #[error("Failed to create realm '{realm}' ({status}): {body}")]
    RealmCreate {
        realm: String,
        status: u16,
        body: String,
    },

    #[error("Failed to create client '{client_id}' ({status}): {body}")]
    ClientCreate {
        client_id: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}
