//! Common parts of the JSON APIs (trivia and coffee shop): error type, extractor configuration
//! and CORS headers

use crate::auth::AuthError;
use crate::data_store::StoreError;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    web, HttpRequest, HttpResponse,
};
use std::fmt::Display;

#[derive(Debug)]
pub enum APIError {
    NotExisting,
    AlreadyExisting,
    MethodNotAllowed,
    /// The bearer token was missing, invalid or did not grant the required permission
    Unauthorized(AuthError),
    InvalidJson(JsonPayloadError),
    InvalidQuery(QueryPayloadError),
    InvalidData(String),
    TransactionConflict,
    InternalError(String),
}

impl APIError {
    /// Short description of the error class, used as `message` in the JSON error response
    fn message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "bad request",
            StatusCode::NOT_FOUND => "resource not found",
            StatusCode::METHOD_NOT_ALLOWED => "method not allowed",
            StatusCode::CONFLICT => "conflict",
            StatusCode::UNSUPPORTED_MEDIA_TYPE => "unsupported media type",
            StatusCode::UNPROCESSABLE_ENTITY => "unprocessable",
            StatusCode::SERVICE_UNAVAILABLE => "service unavailable",
            _ => "internal server error",
        }
    }
}

impl Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotExisting => f.write_str("Element does not exist"),
            Self::AlreadyExisting => f.write_str("Element already exists"),
            Self::MethodNotAllowed => f.write_str("HTTP method not allowed for this resource"),
            Self::Unauthorized(e) => write!(f, "Client is not authorized: {}", e),
            Self::InvalidJson(e) => write!(f, "Invalid JSON request data: {}", e),
            Self::InvalidQuery(e) => write!(f, "Invalid query parameters: {}", e),
            Self::InvalidData(e) => write!(f, "Invalid request data: {}", e),
            Self::TransactionConflict => {
                f.write_str("Concurrent database transaction conflict. Please retry request.")
            }
            Self::InternalError(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl ResponseError for APIError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotExisting => StatusCode::NOT_FOUND,
            Self::AlreadyExisting => StatusCode::CONFLICT,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized(AuthError::JwksUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidJson(e) => match e {
                JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                JsonPayloadError::Deserialize(json_error) if json_error.is_data() => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::BAD_REQUEST,
            },
            Self::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::TransactionConflict => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        response.insert_header(ContentType::json());
        if let Self::Unauthorized(auth_error) = self {
            response.json(trio_api_types::AuthErrorResponse {
                success: false,
                code: auth_error.code().to_owned(),
                description: auth_error.description().to_owned(),
            })
        } else {
            response.json(trio_api_types::ErrorResponse {
                success: false,
                error: self.status_code().as_u16(),
                message: self.message().to_owned(),
            })
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ConnectionError(error) => {
                Self::InternalError(format!("Could not connect to database: {}", error))
            }
            StoreError::QueryError(diesel_error) => Self::InternalError(format!(
                "Error while executing database query: {}",
                diesel_error
            )),
            StoreError::TransactionConflict => Self::TransactionConflict,
            StoreError::NotExisting => Self::NotExisting,
            StoreError::ConflictEntityExists => Self::AlreadyExisting,
            StoreError::InvalidInputData(e) => Self::InvalidData(e),
            StoreError::InvalidDataInDatabase(e) => Self::InternalError(format!(
                "Data queried from database could not be deserialized: {}",
                e
            )),
        }
    }
}

impl From<actix_web::error::BlockingError> for APIError {
    fn from(_e: actix_web::error::BlockingError) -> Self {
        APIError::InternalError(
            "Could not get thread from thread pool for synchronous database operation.".to_owned(),
        )
    }
}

impl From<AuthError> for APIError {
    fn from(e: AuthError) -> Self {
        APIError::Unauthorized(e)
    }
}

/// Extractor configurations for JSON API scopes, turning extraction failures into [APIError]s
pub fn json_extractor_configs() -> (web::JsonConfig, web::QueryConfig, web::PathConfig) {
    (
        web::JsonConfig::default().error_handler(|err, _req| APIError::InvalidJson(err).into()),
        web::QueryConfig::default().error_handler(|err, _req| APIError::InvalidQuery(err).into()),
        // Like unknown paths, a malformed id in the path does not identify any resource
        web::PathConfig::default().error_handler(|_err: PathError, _req| APIError::NotExisting.into()),
    )
}

/// Default service for JSON API resources: Answer CORS preflight requests and reject all other
/// unsupported methods.
pub async fn preflight_or_method_not_allowed(req: HttpRequest) -> Result<HttpResponse, APIError> {
    if req.method() == Method::OPTIONS {
        Ok(HttpResponse::Ok().finish())
    } else {
        Err(APIError::MethodNotAllowed)
    }
}

/// Default service for JSON API scopes
pub async fn not_found() -> Result<HttpResponse, APIError> {
    Err(APIError::NotExisting)
}

/// Allow cross-origin requests from any origin, using the given HTTP methods
pub fn cors_headers(allowed_methods: &'static str) -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Headers", "Content-Type,Authorization"))
        .add(("Access-Control-Allow-Methods", allowed_methods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_error_response_body() {
        let response = APIError::NotExisting.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().try_into_bytes().unwrap();
        let body: trio_api_types::ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(!body.success);
        assert_eq!(body.error, 404);
        assert_eq!(body.message, "resource not found");
    }

    #[test]
    fn test_auth_error_response_body() {
        let response = APIError::Unauthorized(AuthError::TokenExpired).error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = response.into_body().try_into_bytes().unwrap();
        let body: trio_api_types::AuthErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(!body.success);
        assert_eq!(body.code, "token_expired");
        assert_eq!(body.description, "Token expired.");

        let response =
            APIError::Unauthorized(AuthError::JwksUnavailable("timeout".to_owned())).error_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
