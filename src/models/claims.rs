//! Identity claims returned by the provider's tokeninfo endpoint
//!
//! Only the fields the gateway cares about are represented. Missing fields
//! decode to their empty value, so an answer without `aud` simply fails the
//! audience check later on.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityClaims {
    /// Audience, should be our client id
    pub aud: String,
    /// Provider user id of the authenticating user
    pub sub: String,
    pub email: String,
    #[serde(deserialize_with = "bool_or_string")]
    pub email_verified: bool,
    pub picture: String,
    pub given_name: String,
    pub family_name: String,
    pub locale: String,
}

impl IdentityClaims {
    /// Decode a tokeninfo response body
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON object of the expected shape
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Full display name built from the given and family names
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let name = format!("{} {}", self.given_name, self.family_name);
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Google sends `email_verified` as `"true"`, other deployments as a JSON bool
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid email_verified value: {other}"
            ))),
        },
    }
}
