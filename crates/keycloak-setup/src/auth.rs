//! Admin authentication via the password grant on the master realm.

use log::{debug, info};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ReconcileError;
use crate::transport::{ApiRequest, Transport};

/// Client used for admin logins; present in every master realm.
pub const ADMIN_CLIENT_ID: &str = "admin-cli";

const TOKEN_ENDPOINT: [&str; 5] = ["realms", "master", "protocol", "openid-connect", "token"];

#[derive(Debug)]
pub struct AdminCredentials {
    pub username: String,
    pub password: SecretString,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Response from the token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,

    /// Lifetime in seconds of the access token.
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Bearer token for the admin API, valid for the rest of the run.
#[derive(Debug)]
pub struct AdminToken {
    access_token: SecretString,
    expires_in: Option<u64>,
}

impl AdminToken {
    pub fn new(access_token: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            expires_in,
        }
    }

    pub fn secret(&self) -> &SecretString {
        &self.access_token
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

pub struct Authenticator<'a> {
    transport: &'a Transport,
}

impl<'a> Authenticator<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Exchanges the admin credentials for a bearer token. Anything but a
    /// 200 is fatal.
    pub async fn get_admin_token(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<AdminToken, ReconcileError> {
        info!("Getting admin token...");

        let request = ApiRequest::post(&TOKEN_ENDPOINT).form(&[
            ("client_id", ADMIN_CLIENT_ID),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.expose_secret()),
            ("grant_type", "password"),
        ]);
        let response = self.transport.call(&request).await?;

        if response.status != 200 {
            return Err(ReconcileError::Authentication {
                status: response.status,
                body: response.body_excerpt(),
            });
        }

        let token: TokenResponse = response.json().map_err(|e| ReconcileError::Decode {
            url: self.transport.url(TOKEN_ENDPOINT).to_string(),
            message: format!("Failed to parse token response: {}", e),
        })?;

        match token.expires_in {
            Some(secs) => debug!("Admin token obtained, expires in {}s", secs),
            None => debug!("Admin token obtained"),
        }

        Ok(AdminToken::new(token.access_token, token.expires_in))
    }
}
