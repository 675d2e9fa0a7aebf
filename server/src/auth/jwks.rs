use super::AuthError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A JSON Web Key Set, as published by the identity provider (RFC 7517)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct JsonWebKeySet {
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Find the key with the given key id
    pub fn find(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

/// A single JSON Web Key. Only the members required for RSA signature verification are
/// represented.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JsonWebKey {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// RSA modulus, base64url encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent, base64url encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

/// Provider of the JSON Web Key Set for verifying bearer tokens
#[async_trait::async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch_key_set(&self) -> Result<JsonWebKeySet, AuthError>;
}

/// Fetches the key set from the identity provider's `.well-known/jwks.json` URL on every call
pub struct HttpKeySetSource {
    url: String,
    client: reqwest::Client,
}

impl HttpKeySetSource {
    pub fn for_auth_domain(auth_domain: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url: format!("https://{}/.well-known/jwks.json", auth_domain),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
        })
    }
}

#[async_trait::async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch_key_set(&self) -> Result<JsonWebKeySet, AuthError> {
        debug!("Fetching JSON Web Key Set from <{}>", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AuthError::JwksUnavailable(e.to_string()))?;
        response
            .json::<JsonWebKeySet>()
            .await
            .map_err(|e| AuthError::JwksUnavailable(e.to_string()))
    }
}

/// A fixed key set, e.g. for offline operation and tests
pub struct StaticKeySet(pub JsonWebKeySet);

#[async_trait::async_trait]
impl KeySetSource for StaticKeySet {
    async fn fetch_key_set(&self) -> Result<JsonWebKeySet, AuthError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_set() {
        let key_set: JsonWebKeySet = serde_json::from_str(
            r#"{"keys": [
                {"alg": "RS256", "kty": "RSA", "use": "sig", "n": "AQAB", "e": "AQAB",
                 "kid": "key-1", "x5t": "abc", "x5c": ["MIIC"]},
                {"kty": "EC", "kid": "key-2", "crv": "P-256", "x": "AA", "y": "AA"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(key_set.keys.len(), 2);
        let key = key_set.find("key-1").unwrap();
        assert_eq!(key.key_use.as_deref(), Some("sig"));
        assert_eq!(key.n.as_deref(), Some("AQAB"));
        assert_eq!(key_set.find("key-2").unwrap().kty, "EC");
        assert!(key_set.find("key-3").is_none());
    }
}
