use std::collections::HashSet;
use std::path::Path;

use crate::config::schema::Configuration;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/provision-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Configuration, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Configuration = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Configuration) -> Result<(), ConfigError> {
    if let Some(realm) = &config.realm {
        require_non_blank("realm name", &realm.realm)?;
    } else {
        // Every other section is addressed under the realm's name
        let dependent = [
            ("groups", config.groups.is_some()),
            ("client", config.client.is_some()),
            ("users", config.users.is_some()),
        ];
        if let Some((section, _)) = dependent.iter().find(|(_, present)| *present) {
            return Err(ConfigError::Validation {
                message: format!("'{}' requires a 'realm' section", section),
            });
        }
    }

    if let Some(groups) = &config.groups {
        let mut seen = HashSet::new();
        for name in groups {
            require_non_blank("group name", name)?;
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Duplicate {
                    kind: "group",
                    name: name.clone(),
                });
            }
        }
    }

    if let Some(client) = &config.client {
        require_non_blank("clientId", &client.client_id)?;
    }

    if let Some(users) = &config.users {
        // The server folds usernames to lower case
        let mut seen = HashSet::new();
        for user in users {
            require_non_blank("username", &user.username)?;
            if !seen.insert(user.username.to_lowercase()) {
                return Err(ConfigError::Duplicate {
                    kind: "user",
                    name: user.username.clone(),
                });
            }
        }
    }

    Ok(())
}

fn require_non_blank(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: format!("{} must not be blank", field),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_load_full_config() {
        let config_json = r#"
        {
            "realm": { "realm": "ci", "enabled": true, "loginWithEmailAllowed": false },
            "groups": ["admins", "developers"],
            "client": {
                "clientId": "jenkins",
                "secret": "s3cret",
                "redirectUris": ["https://jenkins.example.com/*"]
            },
            "users": [
                {
                    "username": "alice",
                    "email": "alice@example.com",
                    "firstName": "Alice",
                    "lastName": "Admin",
                    "password": "p",
                    "groups": ["admins"]
                },
                { "username": "bob" }
            ]
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.realm_name(), Some("ci"));
        assert_eq!(config.client_id(), Some("jenkins"));
        assert_eq!(config.groups.as_deref().unwrap(), ["admins", "developers"]);
        assert_eq!(config.user_count(), 2);

        let alice = &config.users.as_ref().unwrap()[0];
        assert_eq!(alice.first_name.as_deref(), Some("Alice"));
        assert_eq!(alice.password.as_ref().unwrap().expose_secret(), "p");
        assert_eq!(alice.groups, vec!["admins".to_string()]);

        let bob = &config.users.as_ref().unwrap()[1];
        assert!(bob.password.is_none());
        assert!(bob.groups.is_empty());
    }

    #[test]
    fn test_realm_settings_pass_through() {
        let config = load_config_from_str(
            r#"{ "realm": { "realm": "ci", "accessTokenLifespan": 300 } }"#,
        )
        .unwrap();

        let body = config.realm.unwrap().representation();
        assert_eq!(body["realm"], "ci");
        assert_eq!(body["accessTokenLifespan"], 300);
    }

    #[test]
    fn test_empty_document_is_valid() {
        let config = load_config_from_str("{}").unwrap();
        assert!(config.realm.is_none());
        assert_eq!(config.user_count(), 0);
    }

    #[test]
    fn test_invalid_json() {
        let result = load_config_from_str("{ \"realm\": ");
        assert!(matches!(result, Err(ConfigError::ParseJson(_))));
    }

    #[test]
    fn test_schema_rejects_missing_client_id() {
        let result = load_config_from_str(
            r#"{ "realm": { "realm": "ci" }, "client": { "protocol": "openid-connect" } }"#,
        );
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_groups_require_realm() {
        let result = load_config_from_str(r#"{ "groups": ["admins"] }"#);
        match result {
            Err(ConfigError::Validation { message }) => assert!(message.contains("groups")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_username() {
        let result = load_config_from_str(
            r#"{ "realm": { "realm": "ci" }, "users": [{ "username": "   " }] }"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_duplicate_usernames_ignore_case() {
        let result = load_config_from_str(
            r#"{ "realm": { "realm": "ci" }, "users": [{ "username": "Alice" }, { "username": "alice" }] }"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::Duplicate { kind: "user", .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/keycloak-setup/config.json");
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }
}
