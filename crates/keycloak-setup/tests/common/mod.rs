//! Shared test utilities for keycloak-setup integration tests.
//!
//! This module provides:
//! - a `wiremock` server pre-loaded with the admin token endpoint
//! - an `Orchestrator` wired to that server with a fast retry policy
//! - small mounting helpers for the admin API resources

#![allow(dead_code)]

use std::time::Duration;

use reqwest::Url;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use keycloak_setup::{
    load_config_from_str, AdminCredentials, Configuration, Orchestrator, RetryPolicy, Transport,
};

pub const TOKEN_PATH: &str = "/realms/master/protocol/openid-connect/token";
pub const ACCESS_TOKEN: &str = "test-admin-token";
pub const BEARER: &str = "Bearer test-admin-token";

/// The configuration used by the fresh-server and re-run scenarios.
pub const JENKINS_CONFIG: &str = r#"{
    "realm": { "realm": "ci" },
    "groups": ["admins"],
    "client": { "clientId": "jenkins" },
    "users": [{ "username": "alice", "password": "p", "groups": ["admins"] }]
}"#;

/// Starts a mock server whose token endpoint accepts `admin`/`admin`
/// exactly once.
pub async fn start_keycloak() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=admin-cli"))
        .and(body_string_contains("username=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "expires_in": 60,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    server
}

pub fn orchestrator_for(server: &MockServer) -> Orchestrator {
    let url = Url::parse(&server.uri()).expect("mock server uri");
    let transport = Transport::new(
        url,
        Duration::from_secs(5),
        RetryPolicy::new(3, Duration::from_millis(10)),
    )
    .expect("transport");
    Orchestrator::new(transport, AdminCredentials::new("admin", "admin"))
}

pub fn config(json: &str) -> Configuration {
    load_config_from_str(json).expect("valid configuration")
}

/// An authenticated admin API mock.
pub fn admin(verb: &str, resource: &str) -> wiremock::MockBuilder {
    Mock::given(method(verb))
        .and(path(resource))
        .and(header("authorization", BEARER))
}

pub fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

pub fn created_at(server: &MockServer, resource: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).insert_header("Location", format!("{}{}", server.uri(), resource))
}
