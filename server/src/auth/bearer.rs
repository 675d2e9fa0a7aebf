use super::AuthError;

/// Extract the token from the value of an `Authorization: Bearer <token>` header
pub fn get_token_auth_header(header_value: Option<&str>) -> Result<&str, AuthError> {
    let header_value = match header_value {
        None | Some("") => return Err(AuthError::AuthorizationHeaderMissing),
        Some(v) => v,
    };
    let parts: Vec<&str> = header_value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::InvalidHeader(
            "Authorization header must start with \"Bearer\".",
        )),
        [] => Err(AuthError::InvalidHeader(
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::InvalidHeader("Token not found.")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::InvalidHeader(
            "Authorization header must be bearer token.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_header() {
        assert_eq!(get_token_auth_header(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(get_token_auth_header(Some("bearer  xyz ")), Ok("xyz"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            get_token_auth_header(None),
            Err(AuthError::AuthorizationHeaderMissing)
        );
        assert_eq!(
            get_token_auth_header(Some("")),
            Err(AuthError::AuthorizationHeaderMissing)
        );
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(
            get_token_auth_header(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidHeader(
                "Authorization header must start with \"Bearer\"."
            ))
        );
        assert_eq!(
            get_token_auth_header(Some("   ")),
            Err(AuthError::InvalidHeader(
                "Authorization header must start with \"Bearer\"."
            ))
        );
        assert_eq!(
            get_token_auth_header(Some("Bearer")),
            Err(AuthError::InvalidHeader("Token not found."))
        );
        assert_eq!(
            get_token_auth_header(Some("Bearer abc def")),
            Err(AuthError::InvalidHeader(
                "Authorization header must be bearer token."
            ))
        );
    }
}
