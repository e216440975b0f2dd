use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Root of the provisioning document. Every section is optional; `groups`,
/// `client` and `users` are addressed under the realm named in `realm`.
#[derive(Debug, Default, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub realm: Option<RealmSpec>,

    #[serde(default)]
    pub groups: Option<Vec<String>>,

    #[serde(default)]
    pub client: Option<ClientSpec>,

    #[serde(default)]
    pub users: Option<Vec<UserSpec>>,
}

impl Configuration {
    /// Name of the realm every other section lives in.
    pub fn realm_name(&self) -> Option<&str> {
        self.realm.as_ref().map(|r| r.realm.as_str())
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client.as_ref().map(|c| c.client_id.as_str())
    }

    pub fn user_count(&self) -> usize {
        self.users.as_ref().map_or(0, Vec::len)
    }
}

/// Realm settings. Everything besides the name is passed through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct RealmSpec {
    pub realm: String,

    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl RealmSpec {
    /// The realm representation sent on create and update.
    pub fn representation(&self) -> Value {
        let mut body = self.settings.clone();
        body.insert("realm".to_string(), Value::String(self.realm.clone()));
        Value::Object(body)
    }
}

/// OIDC client settings (redirect URIs, secret, mappers, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSpec {
    #[serde(rename = "clientId")]
    pub client_id: String,

    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl ClientSpec {
    pub fn representation(&self) -> Value {
        let mut body = self.settings.clone();
        body.insert("clientId".to_string(), Value::String(self.client_id.clone()));
        Value::Object(body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
    pub username: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    /// Initial (non-temporary) password credential.
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,

    /// Groups joined when the user is first created.
    #[serde(default)]
    pub groups: Vec<String>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}
