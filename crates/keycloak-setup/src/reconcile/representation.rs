//! The subset of admin API representations the reconcilers read back.

use serde::Deserialize;

use super::context::ReconcileContext;
use crate::error::ReconcileError;
use crate::transport::ApiResponse;

#[derive(Debug, Clone, Deserialize)]
pub struct GroupRepresentation {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
    pub id: String,
    pub client_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRepresentation {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
}

/// Parses a 200 search/list body. A body that doesn't match the expected
/// shape means we are not talking to the admin API we think we are.
pub fn parse_list<T: serde::de::DeserializeOwned>(
    ctx: &ReconcileContext<'_>,
    segments: &[&str],
    response: &ApiResponse,
) -> Result<Vec<T>, ReconcileError> {
    response.json().map_err(|e| ReconcileError::Decode {
        url: ctx.url(segments),
        message: e.to_string(),
    })
}

/// Extracts the new resource id from a `Location` header such as
/// `.../admin/realms/ci/users/6e1f...`.
pub fn id_from_location(location: &str) -> Option<&str> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}
