use log::{info, warn};
use serde_json::json;

use super::context::ReconcileContext;
use super::representation::{parse_list, GroupRepresentation};
use super::report::{Outcome, ReconcileWarning, ResourceKind, RunReport};
use crate::error::ReconcileError;

/// Creates every group that doesn't exist yet. Existing groups are left
/// alone and failed creations don't stop the run.
pub async fn ensure_groups(
    ctx: &ReconcileContext<'_>,
    realm: &str,
    names: &[String],
    report: &mut RunReport,
) -> Result<(), ReconcileError> {
    let groups_path = ["admin", "realms", realm, "groups"];

    for name in names {
        let search = ctx.get(&groups_path, &[("search", name.as_str())]).await?;

        if search.status == 200 {
            let found: Vec<GroupRepresentation> = parse_list(ctx, &groups_path, &search)?;
            // The search is a substring match; only an exact name counts
            if found.iter().any(|group| group.name == *name) {
                info!("Group '{}' already exists", name);
                report.record(ResourceKind::Group, name.as_str(), Outcome::AlreadyPresent);
                continue;
            }
        }

        let body = json!({
            "name": name,
            "attributes": {}
        });
        let response = ctx.post_json(&groups_path, body).await?;

        if response.status == 201 {
            info!("Created group: {}", name);
            report.record(ResourceKind::Group, name.as_str(), Outcome::Created);
        } else {
            warn!("Failed to create group {} ({})", name, response.status);
            report.record(ResourceKind::Group, name.as_str(), Outcome::Failed);
            report.warn(ReconcileWarning::GroupCreateFailed {
                name: name.clone(),
                status: response.status,
                body: response.body_excerpt(),
            });
        }
    }

    Ok(())
}
