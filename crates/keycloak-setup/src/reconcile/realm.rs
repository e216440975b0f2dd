use log::{info, warn};

use super::context::ReconcileContext;
use super::report::{Outcome, ReconcileWarning, ResourceKind, RunReport};
use crate::config::RealmSpec;
use crate::error::ReconcileError;

/// Creates the realm, or replaces its settings if it already exists.
///
/// Creation is a hard prerequisite for everything else, so a rejected POST
/// is fatal; a rejected update is only recorded.
pub async fn ensure_realm(
    ctx: &ReconcileContext<'_>,
    spec: &RealmSpec,
    report: &mut RunReport,
) -> Result<(), ReconcileError> {
    let name = spec.realm.as_str();
    let realm_path = ["admin", "realms", name];

    let existing = ctx.get(&realm_path, &[]).await?;

    if existing.status == 200 {
        info!("Realm '{}' already exists - updating configuration", name);
        let response = ctx.put_json(&realm_path, spec.representation()).await?;
        if response.status == 204 {
            info!("Updated realm: {}", name);
            report.record(ResourceKind::Realm, name, Outcome::Updated);
        } else {
            warn!("Failed to update realm '{}' ({})", name, response.status);
            report.record(ResourceKind::Realm, name, Outcome::Failed);
            report.warn(ReconcileWarning::RealmUpdateRejected {
                realm: name.to_string(),
                status: response.status,
                body: response.body_excerpt(),
            });
        }
        return Ok(());
    }

    let response = ctx
        .post_json(&["admin", "realms"], spec.representation())
        .await?;

    if response.status != 201 {
        return Err(ReconcileError::RealmCreate {
            realm: name.to_string(),
            status: response.status,
            body: response.body_excerpt(),
        });
    }

    info!("Created realm: {}", name);
    report.record(ResourceKind::Realm, name, Outcome::Created);
    Ok(())
}
