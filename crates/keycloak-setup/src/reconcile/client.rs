use log::{info, warn};

use super::context::ReconcileContext;
use super::representation::{parse_list, ClientRepresentation};
use super::report::{Outcome, ReconcileWarning, ResourceKind, RunReport};
use crate::config::ClientSpec;
use crate::error::ReconcileError;

/// Creates the OIDC client, or replaces its settings if a client with the
/// same `clientId` exists.
pub async fn ensure_client(
    ctx: &ReconcileContext<'_>,
    realm: &str,
    spec: &ClientSpec,
    report: &mut RunReport,
) -> Result<(), ReconcileError> {
    let client_id = spec.client_id.as_str();
    let clients_path = ["admin", "realms", realm, "clients"];

    let search = ctx.get(&clients_path, &[("clientId", client_id)]).await?;

    let existing = if search.status == 200 {
        parse_list::<ClientRepresentation>(ctx, &clients_path, &search)?
            .into_iter()
            .next()
    } else {
        None
    };

    if let Some(existing) = existing {
        info!("Client '{}' already exists - updating configuration", client_id);
        let response = ctx
            .put_json(
                &["admin", "realms", realm, "clients", existing.id.as_str()],
                spec.representation(),
            )
            .await?;

        if response.status == 204 {
            info!("Updated client: {}", client_id);
            report.record(ResourceKind::Client, client_id, Outcome::Updated);
        } else {
            warn!("Failed to update client '{}' ({})", client_id, response.status);
            report.record(ResourceKind::Client, client_id, Outcome::Failed);
            report.warn(ReconcileWarning::ClientUpdateRejected {
                client_id: client_id.to_string(),
                status: response.status,
                body: response.body_excerpt(),
            });
        }
        return Ok(());
    }

    let response = ctx.post_json(&clients_path, spec.representation()).await?;

    if response.status != 201 {
        return Err(ReconcileError::ClientCreate {
            client_id: client_id.to_string(),
            status: response.status,
            body: response.body_excerpt(),
        });
    }

    info!("Created client: {}", client_id);
    report.record(ResourceKind::Client, client_id, Outcome::Created);
    Ok(())
}
