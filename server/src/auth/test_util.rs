//! Signing of bearer tokens with a fixed RSA test key

use super::{JsonWebKey, JsonWebKeySet, TokenValidation};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

pub const TEST_KEY_ID: &str = "trio-test-key";
pub const TEST_AUTH_DOMAIN: &str = "trio-test.eu.auth0.com";
pub const TEST_ISSUER: &str = "https://trio-test.eu.auth0.com/";
pub const TEST_AUDIENCE: &str = "coffee";

/// PKCS#8 encoded 2048 bit RSA private key, matching [TEST_KEY_MODULUS]
const TEST_SIGNING_KEY: &[u8] = include_bytes!("test_data/test_signing_key.pk8");
const TEST_KEY_MODULUS: &str = "wvxlc7tsBGeADHBZueIDzPqSIZAQv_8jzC5y2rlWK0d_WC605ZxPjM6EKLzFvCbMNxVLD0JmNsPap0IHEv0GyjZMOW93S40ufhO5nnTK8_1UDsIy4c9wSNDQY1dLG99SyFxkQKRPB3qs2aplkxtRtrn6lZr9h7rWNObl4nq4n3LwMfJ4tJxXb-8RSmT6I5A7akxzPYuQla-fCUaaCgT9kT8ZvdCJVK8-jVXjKuDwYkp01bxe_VV0_vkyctYmfF0To-iQ7c7p4m3_NvUILKmPkdrI30KYt_QWZu4uBev8tOtGb430w7ohno4gEU31Q2Dn8FYyCyU6p61vy5Z2iLnDMw";
const TEST_KEY_EXPONENT: &str = "AQAB";

/// The key set, containing the public key of the test key as [TEST_KEY_ID] and an unrelated key
pub fn test_key_set() -> JsonWebKeySet {
    JsonWebKeySet {
        keys: vec![
            JsonWebKey {
                kty: "RSA".to_owned(),
                kid: Some("unrelated-key".to_owned()),
                key_use: Some("sig".to_owned()),
                alg: Some("RS256".to_owned()),
                n: Some("sXch5Ak0ZpA0lnyWbTqYkH2LQw".to_owned()),
                e: Some(TEST_KEY_EXPONENT.to_owned()),
            },
            JsonWebKey {
                kty: "RSA".to_owned(),
                kid: Some(TEST_KEY_ID.to_owned()),
                key_use: Some("sig".to_owned()),
                alg: Some("RS256".to_owned()),
                n: Some(TEST_KEY_MODULUS.to_owned()),
                e: Some(TEST_KEY_EXPONENT.to_owned()),
            },
        ],
    }
}

pub fn test_token_validation() -> TokenValidation {
    TokenValidation::for_auth_domain(TEST_AUTH_DOMAIN, TEST_AUDIENCE.to_owned())
}

/// Create a compact-serialized JWT with the given header and payload, signed with the test key
/// using RS256 (regardless of the `alg` in the header).
pub fn sign_token(header: &serde_json::Value, payload: &serde_json::Value) -> String {
    let key_pair = ring::signature::RsaKeyPair::from_pkcs8(TEST_SIGNING_KEY)
        .expect("Test signing key should be valid");
    let message = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    );
    let mut signature = vec![0; key_pair.public().modulus_len()];
    key_pair
        .sign(
            &ring::signature::RSA_PKCS1_SHA256,
            &ring::rand::SystemRandom::new(),
            message.as_bytes(),
            &mut signature,
        )
        .expect("Signing should succeed");
    format!("{}.{}", message, URL_SAFE_NO_PAD.encode(signature))
}

/// Create a valid bearer token for the test key set with the given permissions, expiring one hour
/// after now.
pub fn token_with_permissions(permissions: &[&str]) -> String {
    let now = chrono::Utc::now().timestamp();
    sign_token(
        &serde_json::json!({"alg": "RS256", "typ": "JWT", "kid": TEST_KEY_ID}),
        &serde_json::json!({
            "iss": TEST_ISSUER,
            "sub": "auth0|test-user",
            "aud": TEST_AUDIENCE,
            "iat": now,
            "exp": now + 3600,
            "permissions": permissions,
        }),
    )
}
