use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maximum length for response bodies quoted in errors and warnings.
const MAX_BODY_EXCERPT_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// One admin API call, addressed by path segments relative to the server
/// base URL. Segments are percent-encoded when the URL is built.
#[derive(Debug)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<&'a SecretString>,
}

impl<'a> ApiRequest<'a> {
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn get(segments: &[&str]) -> Self {
        Self::new(Method::Get, segments)
    }

    pub fn post(segments: &[&str]) -> Self {
        Self::new(Method::Post, segments)
    }

    pub fn put(segments: &[&str]) -> Self {
        Self::new(Method::Put, segments)
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        self.body = RequestBody::Form(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn bearer(mut self, token: &'a SecretString) -> Self {
        self.bearer = Some(token);
        self
    }
}

/// A response that reached us, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// The body truncated for logging, so large or sensitive payloads don't
    /// flood the output.
    pub fn body_excerpt(&self) -> String {
        match self.body.char_indices().nth(MAX_BODY_EXCERPT_LENGTH) {
            Some((cut, _)) => format!("{}... (truncated)", &self.body[..cut]),
            None => self.body.clone(),
        }
    }
}

/// Tagged result of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success(ApiResponse),
    /// The server could not be reached (connection refused, timeout, ...).
    TransientFailure(String),
    /// The request could not be performed and retrying won't help.
    PermanentFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_excerpt_short() {
        let response = ApiResponse::new(400, "bad request");
        assert_eq!(response.body_excerpt(), "bad request");
    }

    #[test]
    fn test_body_excerpt_truncates_on_char_boundary() {
        let response = ApiResponse::new(500, "é".repeat(300));
        let excerpt = response.body_excerpt();
        assert!(excerpt.ends_with("... (truncated)"));
        assert_eq!(excerpt.chars().filter(|c| *c == 'é').count(), 200);
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get(&["admin", "realms", "ci", "users"])
            .query("username", "alice")
            .query("exact", "true");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.segments, ["admin", "realms", "ci", "users"]);
        assert_eq!(request.query.len(), 2);
        assert!(request.bearer.is_none());
        assert!(matches!(request.body, RequestBody::Empty));
    }
}
