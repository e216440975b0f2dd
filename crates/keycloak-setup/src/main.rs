//! keycloak-setup - provision a realm, its groups, an OIDC client and users
//! from a JSON document.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use reqwest::Url;

use keycloak_setup::logging::{init_logging, LogFormat};
use keycloak_setup::transport::retry::DEFAULT_BASE_DELAY;
use keycloak_setup::{
    load_config, AdminCredentials, Orchestrator, RetryPolicy, RunSummary, SetupError, Transport,
};

/// Configure Keycloak realm, groups, client and users for SSO
#[derive(Parser, Debug)]
#[command(name = "keycloak-setup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config_file: PathBuf,

    /// Keycloak server URL
    #[arg(long, env = "KEYCLOAK_URL")]
    keycloak_url: Url,

    /// Keycloak admin username
    #[arg(long, env = "KEYCLOAK_ADMIN")]
    admin_user: String,

    /// Keycloak admin password
    #[arg(long, env = "KEYCLOAK_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Number of attempts per request when the server is unreachable
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    retries: u32,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging_ready = match init_logging(cli.log_format) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("{}", e);
            false
        }
    };

    match run(cli).await {
        Ok(summary) => {
            println!();
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) if logging_ready => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary, SetupError> {
    // Input errors must surface before anything is sent to the server
    let config = load_config(&cli.config_file)?;

    let transport = Transport::new(
        cli.keycloak_url,
        Duration::from_secs(cli.timeout),
        RetryPolicy::new(cli.retries, DEFAULT_BASE_DELAY),
    )?;
    let orchestrator = Orchestrator::new(
        transport,
        AdminCredentials::new(cli.admin_user, cli.admin_password),
    );

    info!("Configuring Keycloak for SSO...");
    let report = orchestrator.run(&config).await?;

    Ok(orchestrator.summary(&config, &report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use keycloak_setup::ConfigError;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from([
            "keycloak-setup",
            "--config-file",
            "keycloak.json",
            "--keycloak-url",
            "http://localhost:8080",
            "--admin-user",
            "admin",
            "--admin-password",
            "secret",
        ])
        .unwrap();

        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.retries, 3);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[tokio::test]
    async fn test_missing_config_fails_before_contacting_server() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("keycloak.json");
        let cli = Cli::try_parse_from([
            OsStr::new("keycloak-setup"),
            OsStr::new("--config-file"),
            missing.as_os_str(),
            OsStr::new("--keycloak-url"),
            OsStr::new("http://127.0.0.1:1"),
            OsStr::new("--admin-user"),
            OsStr::new("admin"),
            OsStr::new("--admin-password"),
            OsStr::new("secret"),
        ])
        .unwrap();

        match run(cli).await {
            Err(SetupError::Config(ConfigError::NotFound { path })) => assert_eq!(path, missing),
            other => panic!("expected a missing config error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_zero_retries_rejected() {
        let result = Cli::try_parse_from([
            "keycloak-setup",
            "--config-file",
            "keycloak.json",
            "--keycloak-url",
            "http://localhost:8080",
            "--admin-user",
            "admin",
            "--admin-password",
            "secret",
            "--retries",
            "0",
        ]);
        assert!(result.is_err());
    }
}
