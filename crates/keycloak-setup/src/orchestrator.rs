use std::fmt;

use log::info;
use tracing::{info_span, Instrument};

use crate::auth::{AdminCredentials, Authenticator};
use crate::config::Configuration;
use crate::error::ReconcileError;
use crate::reconcile::{
    ensure_client, ensure_groups, ensure_realm, ensure_users, Outcome, ReconcileContext,
    ReconcileWarning, RunReport,
};
use crate::transport::Transport;

/// Drives one provisioning run: authenticate once, then realm, groups,
/// client and users, strictly in that order. Users can only join groups
/// created earlier in the run.
pub struct Orchestrator {
    transport: Transport,
    credentials: AdminCredentials,
}

impl Orchestrator {
    pub fn new(transport: Transport, credentials: AdminCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Applies the configuration. Returns the first fatal error; best-effort
    /// failures end up as warnings in the report.
    pub async fn run(&self, config: &Configuration) -> Result<RunReport, ReconcileError> {
        let token = Authenticator::new(&self.transport)
            .get_admin_token(&self.credentials)
            .instrument(info_span!("authenticate"))
            .await?;
        let ctx = ReconcileContext::new(&self.transport, token);
        let mut report = RunReport::new();

        let Some(realm) = &config.realm else {
            info!("No realm configured; nothing to reconcile");
            return Ok(report);
        };
        let realm_name = realm.realm.as_str();

        info!("Configuring realm...");
        ensure_realm(&ctx, realm, &mut report)
            .instrument(info_span!("realm", realm = %realm_name))
            .await?;

        if let Some(groups) = &config.groups {
            info!("Creating groups...");
            ensure_groups(&ctx, realm_name, groups, &mut report)
                .instrument(info_span!("groups", realm = %realm_name, count = groups.len()))
                .await?;
        }

        if let Some(client) = &config.client {
            info!("Configuring client...");
            ensure_client(&ctx, realm_name, client, &mut report)
                .instrument(info_span!("client", realm = %realm_name, client_id = %client.client_id))
                .await?;
        }

        if let Some(users) = &config.users {
            info!("Creating users...");
            ensure_users(&ctx, realm_name, users, &mut report)
                .instrument(info_span!("users", realm = %realm_name, count = users.len()))
                .await?;
        }

        Ok(report)
    }

    pub fn summary(&self, config: &Configuration, report: &RunReport) -> RunSummary {
        let well_known_url = config.realm_name().map(|realm| {
            self.transport
                .url(["realms", realm, ".well-known", "openid-configuration"])
                .to_string()
        });

        RunSummary {
            realm: config.realm_name().map(str::to_string),
            client_id: config.client_id().map(str::to_string),
            well_known_url,
            users_processed: config.user_count(),
            created: report.count_outcome(Outcome::Created),
            updated: report.count_outcome(Outcome::Updated),
            unchanged: report.count_outcome(Outcome::AlreadyPresent),
            warnings: report.warnings().to_vec(),
        }
    }
}

/// End-of-run summary printed to stdout.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub realm: Option<String>,
    pub client_id: Option<String>,
    pub well_known_url: Option<String>,
    pub users_processed: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub warnings: Vec<ReconcileWarning>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keycloak configuration completed successfully!")?;
        writeln!(f)?;
        writeln!(f, "Configuration Summary:")?;
        if let Some(realm) = &self.realm {
            writeln!(f, "  Realm: {}", realm)?;
        }
        if let Some(client_id) = &self.client_id {
            writeln!(f, "  Client ID: {}", client_id)?;
        }
        if let Some(url) = &self.well_known_url {
            writeln!(f, "  Well-known URL: {}", url)?;
        }
        if self.users_processed > 0 {
            writeln!(f, "  Processed {} user(s)", self.users_processed)?;
        }
        write!(
            f,
            "  Resources: {} created, {} updated, {} unchanged",
            self.created, self.updated, self.unchanged
        )?;
        if !self.warnings.is_empty() {
            writeln!(f)?;
            write!(f, "  Warnings ({}):", self.warnings.len())?;
            for warning in &self.warnings {
                writeln!(f)?;
                write!(f, "    - {}", warning)?;
            }
        }
        Ok(())
    }
}
