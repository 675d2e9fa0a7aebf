use super::jwks::JsonWebKey;
use super::{AuthError, JsonWebKeySet, UNABLE_TO_PARSE_TOKEN};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use ring::signature::{RsaPublicKeyComponents, RSA_PKCS1_2048_8192_SHA256};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Expected values of the registered claims of a token
#[derive(Clone, Debug)]
pub struct TokenValidation {
    pub audience: String,
    pub issuer: String,
}

impl TokenValidation {
    /// Expect tokens issued by the identity provider at the given domain
    pub fn for_auth_domain(auth_domain: &str, audience: String) -> Self {
        Self {
            audience,
            issuer: format!("https://{}/", auth_domain),
        }
    }
}

/// The verified payload of a bearer token
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Claims {
    pub iss: Option<String>,
    pub sub: Option<String>,
    pub aud: Option<Audience>,
    /// Expiration time, in seconds since the Unix epoch
    pub exp: Option<i64>,
    /// Not-before time, in seconds since the Unix epoch
    pub nbf: Option<i64>,
    pub iat: Option<i64>,
    pub permissions: Option<Vec<String>>,
}

/// The `aud` claim, which may either be a single string or a list of strings
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(a) => a == audience,
            Audience::Multiple(list) => list.iter().any(|a| a == audience),
        }
    }
}

#[derive(Deserialize)]
struct Header {
    alg: Option<String>,
    kid: Option<String>,
}

/// Verify the signature and the claims of a compact-serialized JSON Web Token and return its
/// payload.
///
/// The signing key is looked up in the `key_set` by the `kid` of the token's header. Only RS256
/// signatures are accepted. The token must carry an `exp` claim, which must be after `now`, and
/// match the expected audience and issuer.
pub fn verify_decode_jwt(
    token: &str,
    validation: &TokenValidation,
    key_set: &JsonWebKeySet,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    let parse_error = AuthError::InvalidHeader(UNABLE_TO_PARSE_TOKEN);

    let mut segments = token.split('.');
    let (header_segment, payload_segment, signature_segment) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(payload), Some(signature), None) => (header, payload, signature),
        _ => return Err(parse_error),
    };

    let header: Header = decode_segment(header_segment).ok_or(parse_error.clone())?;
    let kid = header
        .kid
        .ok_or(AuthError::InvalidHeader("Authorization malformed."))?;
    let key = key_set.find(&kid).ok_or(AuthError::InvalidHeader(
        "Unable to find the appropriate key.",
    ))?;

    if header.alg.as_deref() != Some("RS256") {
        return Err(parse_error);
    }
    let public_key = rsa_public_key(key).ok_or(parse_error.clone())?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature_segment.trim_end_matches('='))
        .map_err(|_| parse_error.clone())?;
    let signed_message = &token[..header_segment.len() + 1 + payload_segment.len()];
    public_key
        .verify(
            &RSA_PKCS1_2048_8192_SHA256,
            signed_message.as_bytes(),
            &signature,
        )
        .map_err(|_| parse_error.clone())?;

    let claims: Claims = decode_segment(payload_segment).ok_or(parse_error)?;
    validate_claims(&claims, validation, now.timestamp())?;
    Ok(claims)
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Option<T> {
    let data = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&data).ok()
}

/// Get the RSA public key from a JSON Web Key, if it is an RSA key usable for RS256 signatures
fn rsa_public_key(key: &JsonWebKey) -> Option<RsaPublicKeyComponents<Vec<u8>>> {
    if key.kty != "RSA"
        || key.key_use.as_deref().is_some_and(|u| u != "sig")
        || key.alg.as_deref().is_some_and(|a| a != "RS256")
    {
        return None;
    }
    let n = URL_SAFE_NO_PAD.decode(key.n.as_deref()?).ok()?;
    let e = URL_SAFE_NO_PAD.decode(key.e.as_deref()?).ok()?;
    Some(RsaPublicKeyComponents {
        n: strip_leading_zeros(n),
        e: strip_leading_zeros(e),
    })
}

fn strip_leading_zeros(mut value: Vec<u8>) -> Vec<u8> {
    let leading_zeros = value.iter().take_while(|b| **b == 0).count();
    value.drain(..leading_zeros);
    value
}

fn validate_claims(
    claims: &Claims,
    validation: &TokenValidation,
    now: i64,
) -> Result<(), AuthError> {
    if claims.nbf.is_some_and(|nbf| nbf > now) {
        return Err(AuthError::InvalidClaims);
    }
    match claims.exp {
        None => return Err(AuthError::InvalidClaims),
        Some(exp) if exp <= now => return Err(AuthError::TokenExpired),
        Some(_) => {}
    }
    if !claims
        .aud
        .as_ref()
        .is_some_and(|aud| aud.contains(&validation.audience))
    {
        return Err(AuthError::InvalidClaims);
    }
    if claims.iss.as_deref() != Some(validation.issuer.as_str()) {
        return Err(AuthError::InvalidClaims);
    }
    Ok(())
}
