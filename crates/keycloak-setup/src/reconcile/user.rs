use std::collections::HashMap;

use log::{debug, info, warn};
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use super::context::ReconcileContext;
use super::representation::{id_from_location, parse_list, GroupRepresentation, UserRepresentation};
use super::report::{Outcome, ReconcileWarning, ResourceKind, RunReport};
use crate::config::UserSpec;
use crate::error::ReconcileError;

/// Creates every user that doesn't exist yet and, for new users only, joins
/// the configured groups. Existing users are never touched.
pub async fn ensure_users(
    ctx: &ReconcileContext<'_>,
    realm: &str,
    users: &[UserSpec],
    report: &mut RunReport,
) -> Result<(), ReconcileError> {
    let users_path = ["admin", "realms", realm, "users"];

    for user in users {
        let username = user.username.as_str();
        let search = ctx
            .get(&users_path, &[("username", username), ("exact", "true")])
            .await?;

        if search.status == 200 {
            let found: Vec<UserRepresentation> = parse_list(ctx, &users_path, &search)?;
            if found
                .iter()
                .any(|existing| existing.username.eq_ignore_ascii_case(username))
            {
                info!("User '{}' already exists", username);
                report.record(ResourceKind::User, username, Outcome::AlreadyPresent);
                continue;
            }
        }

        let response = ctx.post_json(&users_path, user_representation(user)).await?;

        if response.status != 201 {
            warn!("Failed to create user {} ({})", username, response.status);
            report.record(ResourceKind::User, username, Outcome::Failed);
            report.warn(ReconcileWarning::UserCreateFailed {
                username: username.to_string(),
                status: response.status,
                body: response.body_excerpt(),
            });
            continue;
        }

        info!("Created user: {}", username);
        report.record(ResourceKind::User, username, Outcome::Created);

        if user.groups.is_empty() {
            continue;
        }

        match response.location.as_deref().and_then(id_from_location) {
            Some(user_id) => add_user_to_groups(ctx, realm, user, user_id, report).await?,
            None => {
                warn!("No user id returned for {}; skipping group memberships", username);
                report.warn(ReconcileWarning::MissingUserId {
                    username: username.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn user_representation(user: &UserSpec) -> Value {
    let credentials: Vec<Value> = user
        .password
        .iter()
        .map(|password| {
            json!({
                "type": "password",
                "value": password.expose_secret(),
                "temporary": false
            })
        })
        .collect();

    json!({
        "username": user.username,
        "email": user.email,
        "firstName": user.first_name,
        "lastName": user.last_name,
        "enabled": true,
        "emailVerified": true,
        "credentials": credentials
    })
}

/// Joins a freshly created user to the requested groups. Group names the
/// server doesn't know are skipped silently.
async fn add_user_to_groups(
    ctx: &ReconcileContext<'_>,
    realm: &str,
    user: &UserSpec,
    user_id: &str,
    report: &mut RunReport,
) -> Result<(), ReconcileError> {
    let groups_path = ["admin", "realms", realm, "groups"];
    let listing = ctx.get(&groups_path, &[]).await?;

    if listing.status != 200 {
        warn!(
            "Failed to list groups ({}); skipping memberships for {}",
            listing.status, user.username
        );
        report.warn(ReconcileWarning::GroupListingFailed {
            username: user.username.clone(),
            status: listing.status,
        });
        return Ok(());
    }

    let groups: Vec<GroupRepresentation> = parse_list(ctx, &groups_path, &listing)?;
    let ids_by_name: HashMap<&str, &str> = groups
        .iter()
        .map(|group| (group.name.as_str(), group.id.as_str()))
        .collect();

    for group_name in &user.groups {
        let Some(&group_id) = ids_by_name.get(group_name.as_str()) else {
            debug!("Group '{}' not found; not adding {}", group_name, user.username);
            continue;
        };

        let response = ctx
            .put_empty(&["admin", "realms", realm, "users", user_id, "groups", group_id])
            .await?;
        let membership = format!("{}/{}", user.username, group_name);

        if response.status == 204 {
            info!("Added user to group: {}", group_name);
            report.record(ResourceKind::Membership, membership, Outcome::Created);
        } else {
            warn!(
                "Failed to add {} to group {} ({})",
                user.username, group_name, response.status
            );
            report.record(ResourceKind::Membership, membership, Outcome::Failed);
            report.warn(ReconcileWarning::MembershipFailed {
                username: user.username.clone(),
                group: group_name.clone(),
                status: response.status,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn users(json: &str) -> Vec<UserSpec> {
        load_config_from_str(json).unwrap().users.unwrap()
    }

    #[test]
    fn test_representation_with_password() {
        let users = users(
            r#"{ "realm": { "realm": "ci" }, "users": [
                { "username": "alice", "email": "alice@example.com", "firstName": "Alice", "password": "p" }
            ] }"#,
        );
        let body = user_representation(&users[0]);

        assert_eq!(body["username"], "alice");
        assert_eq!(body["email"], "alice@example.com");
        assert_eq!(body["firstName"], "Alice");
        assert!(body["lastName"].is_null());
        assert_eq!(body["enabled"], true);
        assert_eq!(body["emailVerified"], true);
        assert_eq!(
            body["credentials"],
            json!([{ "type": "password", "value": "p", "temporary": false }])
        );
    }

    #[test]
    fn test_representation_without_password_has_no_credentials() {
        let users = users(r#"{ "realm": { "realm": "ci" }, "users": [{ "username": "bob" }] }"#);
        let body = user_representation(&users[0]);
        assert_eq!(body["credentials"], json!([]));
    }
}
