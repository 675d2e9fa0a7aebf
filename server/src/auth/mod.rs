//! Authentication and authorization of coffee shop API clients via bearer tokens
//!
//! Tokens are JSON Web Tokens, issued by a third-party identity provider and signed with RS256.
//! They are verified against the JSON Web Key Set, published by the identity provider. Access
//! rights are granted via the `permissions` claim of the token.
//!
//! The verification itself ([verify_decode_jwt]) is a pure function of the token, the expected
//! claims, the key set and the current time. The key set is provided by a [KeySetSource], which
//! fetches it from the identity provider for every verification ([HttpKeySetSource]) or holds a
//! fixed key set (`StaticKeySet`, in tests).

mod bearer;
mod jwks;
mod jwt;
#[cfg(test)]
pub mod test_util;

pub use bearer::get_token_auth_header;
pub use jwks::{HttpKeySetSource, JsonWebKeySet, KeySetSource};
#[cfg(test)]
pub use jwks::{JsonWebKey, StaticKeySet};
pub use jwt::{verify_decode_jwt, Claims, TokenValidation};

const UNABLE_TO_PARSE_TOKEN: &str = "Unable to parse authentication token.";

/// Reason for rejecting the authentication or authorization of a client
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No Authorization header present in the request
    AuthorizationHeaderMissing,
    /// The Authorization header or the token is malformed, the token's signature is invalid or no
    /// matching key is known. The string describes the problem for the client.
    InvalidHeader(&'static str),
    TokenExpired,
    /// Audience or issuer do not match, the expiry is missing or the token is not yet valid
    InvalidClaims,
    /// The token does not contain a permissions claim
    NoPermissions,
    /// The token's permissions don't include the required permission
    InsufficientPermissions {
        required_permission: &'static str,
    },
    /// The key set of the identity provider could not be retrieved. See string for details.
    JwksUnavailable(String),
}

impl AuthError {
    /// Machine-readable error code for the client
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AuthorizationHeaderMissing => "authorization_header_missing",
            AuthError::InvalidHeader(_) => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::NoPermissions => "no_permissions",
            AuthError::InsufficientPermissions { .. } => "insufficient_permissions",
            AuthError::JwksUnavailable(_) => "jwks_unavailable",
        }
    }

    /// Human-readable error description for the client
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::AuthorizationHeaderMissing => "Authorization header is expected.",
            AuthError::InvalidHeader(description) => description,
            AuthError::TokenExpired => "Token expired.",
            AuthError::InvalidClaims => "Incorrect claims. Please, check the audience and issuer.",
            AuthError::NoPermissions => "No permissions component to payload.",
            AuthError::InsufficientPermissions { .. } => {
                "User does not have permissions to take that action."
            }
            AuthError::JwksUnavailable(_) => "Unable to retrieve the token signing keys.",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InsufficientPermissions {
                required_permission,
            } => write!(
                f,
                "{} ({}, requires {})",
                self.description(),
                self.code(),
                required_permission
            ),
            AuthError::JwksUnavailable(e) => {
                write!(f, "{} ({}: {})", self.description(), self.code(), e)
            }
            _ => write!(f, "{} ({})", self.description(), self.code()),
        }
    }
}

impl std::error::Error for AuthError {}

/// Check that the verified token grants the required permission
pub fn check_permissions(
    required_permission: &'static str,
    claims: &Claims,
) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::NoPermissions)?;
    if !permissions.iter().any(|p| p == required_permission) {
        return Err(AuthError::InsufficientPermissions {
            required_permission,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_permissions(permissions: Option<Vec<&str>>) -> Claims {
        Claims {
            permissions: permissions.map(|p| p.into_iter().map(|s| s.to_owned()).collect()),
            ..Claims::default()
        }
    }

    #[test]
    fn test_check_permissions() {
        let claims = claims_with_permissions(Some(vec!["get:drinks-detail", "post:drinks"]));
        assert_eq!(check_permissions("post:drinks", &claims), Ok(()));
        assert_eq!(
            check_permissions("delete:drinks", &claims),
            Err(AuthError::InsufficientPermissions {
                required_permission: "delete:drinks"
            })
        );
    }

    #[test]
    fn test_check_permissions_without_claim() {
        assert_eq!(
            check_permissions("post:drinks", &claims_with_permissions(None)),
            Err(AuthError::NoPermissions)
        );
        assert_eq!(
            check_permissions("post:drinks", &claims_with_permissions(Some(vec![])))
                .map_err(|e| e.code()),
            Err("insufficient_permissions")
        );
    }
}
