use crate::auth::AuthError;
use crate::web::fyyur::error::AppError;
use crate::web::json_api::APIError;
use log::{error, info, warn};

/// An actix-web middleware for logging the cause of error responses
///
/// Client errors (not found, invalid data, rejected authentication) are logged at `warn` level
/// (or `info`, for expected results like invalid request data), failures of the server itself
/// (database connection, internal errors) are logged at `error` level.
pub async fn error_logging_middleware<B: actix_web::body::MessageBody>(
    req: actix_web::dev::ServiceRequest,
    next: actix_web::middleware::Next<B>,
) -> Result<actix_web::dev::ServiceResponse<B>, actix_web::Error> {
    let response = next.call(req).await?;

    if let Some(error) = response.response().error() {
        let status = response.response().status();
        let uri = response.request().uri();
        let client = response
            .request()
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_owned();
        if let Some(app_error) = error.as_error::<AppError>() {
            match app_error {
                AppError::PageNotFound | AppError::EntityNotFound => {
                    warn!("HTTP {} not found at <{}>. Client: <{}>", status, uri, client);
                }
                AppError::InvalidFormData(e) => {
                    warn!("HTTP {} invalid form data at <{}>: {}", status, uri, e);
                }
                AppError::TransactionConflict => {
                    warn!("HTTP {} transaction conflict at <{}>", status, uri);
                }
                AppError::DatabaseConnectionError(e) => {
                    error!("HTTP {} database connection error: {}", status, e);
                }
                AppError::InternalError(e) => {
                    error!(
                        "HTTP {} internal server error at <{}>: {}",
                        status, uri, e
                    );
                }
            }
        } else if let Some(api_error) = error.as_error::<APIError>() {
            match api_error {
                APIError::Unauthorized(AuthError::JwksUnavailable(e)) => {
                    error!(
                        "HTTP {} could not retrieve token signing keys at <{}>: {}",
                        status, uri, e
                    );
                }
                APIError::Unauthorized(auth_error) => {
                    warn!(
                        "HTTP {} authorization failed at <{}>. Client: <{}> Cause: {}",
                        status, uri, client, auth_error
                    );
                }
                APIError::NotExisting | APIError::MethodNotAllowed => {
                    warn!("HTTP {} at <{}>. Client: <{}>", status, uri, client);
                }
                APIError::AlreadyExisting
                | APIError::InvalidJson(_)
                | APIError::InvalidQuery(_)
                | APIError::InvalidData(_) => {
                    info!("HTTP {} at <{}>: {}", status, uri, api_error);
                }
                APIError::TransactionConflict => {
                    warn!("HTTP {} transaction conflict at <{}>", status, uri);
                }
                APIError::InternalError(e) => {
                    error!(
                        "HTTP {} internal server error at <{}>: {}",
                        status, uri, e
                    );
                }
            }
        } else {
            error!(
                "HTTP {} unexpected error at <{}>: {:?}",
                status, uri, error
            );
        }
    }
    Ok(response)
}
