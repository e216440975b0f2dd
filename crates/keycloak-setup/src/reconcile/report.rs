use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Realm,
    Group,
    Client,
    User,
    Membership,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Realm => "realm",
            ResourceKind::Group => "group",
            ResourceKind::Client => "client",
            ResourceKind::User => "user",
            ResourceKind::Membership => "membership",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    AlreadyPresent,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResult {
    pub kind: ResourceKind,
    pub name: String,
    pub outcome: Outcome,
}

/// Non-fatal problems. The run carries on and still exits successfully, so
/// these are the only trace of partial convergence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileWarning {
    #[error("Failed to update realm '{realm}' ({status}): {body}")]
    RealmUpdateRejected {
        realm: String,
        status: u16,
        body: String,
    },

    #[error("Failed to create group {name} ({status}): {body}")]
    GroupCreateFailed {
        name: String,
        status: u16,
        body: String,
    },

    #[error("Failed to update client '{client_id}' ({status}): {body}")]
    ClientUpdateRejected {
        client_id: String,
        status: u16,
        body: String,
    },

    #[error("Failed to create user {username} ({status}): {body}")]
    UserCreateFailed {
        username: String,
        status: u16,
        body: String,
    },

    #[error("User {username} was created but the server returned no user id; group memberships skipped")]
    MissingUserId { username: String },

    #[error("Failed to list groups for {username} ({status}); group memberships skipped")]
    GroupListingFailed { username: String, status: u16 },

    #[error("Failed to add user {username} to group {group} ({status})")]
    MembershipFailed {
        username: String,
        group: String,
        status: u16,
    },
}

/// What a run did, resource by resource.
#[derive(Debug, Default)]
pub struct RunReport {
    results: Vec<ResourceResult>,
    warnings: Vec<ReconcileWarning>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ResourceKind, name: impl Into<String>, outcome: Outcome) {
        self.results.push(ResourceResult {
            kind,
            name: name.into(),
            outcome,
        });
    }

    pub fn warn(&mut self, warning: ReconcileWarning) {
        self.warnings.push(warning);
    }

    pub fn results(&self) -> &[ResourceResult] {
        &self.results
    }

    pub fn warnings(&self) -> &[ReconcileWarning] {
        &self.warnings
    }

    pub fn count(&self, kind: ResourceKind, outcome: Outcome) -> usize {
        self.results
            .iter()
            .filter(|r| r.kind == kind && r.outcome == outcome)
            .count()
    }

    pub fn count_outcome(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn outcome_of(&self, kind: ResourceKind, name: &str) -> Option<Outcome> {
        self.results
            .iter()
            .find(|r| r.kind == kind && r.name == name)
            .map(|r| r.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = RunReport::new();
        report.record(ResourceKind::Group, "admins", Outcome::Created);
        report.record(ResourceKind::Group, "devs", Outcome::AlreadyPresent);
        report.record(ResourceKind::User, "alice", Outcome::Created);

        assert_eq!(report.count(ResourceKind::Group, Outcome::Created), 1);
        assert_eq!(report.count_outcome(Outcome::Created), 2);
        assert_eq!(
            report.outcome_of(ResourceKind::Group, "devs"),
            Some(Outcome::AlreadyPresent)
        );
        assert_eq!(report.outcome_of(ResourceKind::Client, "devs"), None);
    }

    #[test]
    fn test_warning_messages() {
        let warning = ReconcileWarning::GroupCreateFailed {
            name: "admins".to_string(),
            status: 409,
            body: "conflict".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Failed to create group admins (409): conflict"
        );
    }
}
