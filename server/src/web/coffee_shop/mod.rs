//! The coffee shop JSON API, mounted at `/drinks` and `/drinks-detail`
//!
//! Reading the drinks menu is public. All other endpoints require a bearer token, granting the
//! respective permission (see [crate::auth]).

use crate::auth::{check_permissions, get_token_auth_header, verify_decode_jwt, AuthError, Claims};
use crate::web::http_error_logging::error_logging_middleware;
use crate::web::json_api::{
    cors_headers, json_extractor_configs, not_found, preflight_or_method_not_allowed, APIError,
};
use crate::web::AppState;
use actix_web::http::header;
use actix_web::middleware::from_fn;
use actix_web::{web, HttpRequest};

mod endpoints;

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    let (json_config, query_config, path_config) = json_extractor_configs();
    cfg.service(
        web::scope("/drinks")
            .app_data(json_config)
            .app_data(path_config)
            .app_data(query_config)
            .service(
                web::resource("")
                    .route(web::get().to(endpoints::list_drinks))
                    .route(web::post().to(endpoints::create_drink))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .service(
                web::resource("/{drink_id}")
                    .route(web::patch().to(endpoints::update_drink))
                    .route(web::delete().to(endpoints::delete_drink))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .default_service(web::to(not_found))
            .wrap(from_fn(error_logging_middleware))
            .wrap(cors_headers(ALLOWED_METHODS)),
    )
    .service(
        web::scope("/drinks-detail")
            .service(
                web::resource("")
                    .route(web::get().to(endpoints::list_drinks_detail))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .default_service(web::to(not_found))
            .wrap(from_fn(error_logging_middleware))
            .wrap(cors_headers(ALLOWED_METHODS)),
    );
}

const ALLOWED_METHODS: &str = "GET,POST,PATCH,DELETE,OPTIONS";

pub const PERMISSION_GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const PERMISSION_POST_DRINKS: &str = "post:drinks";
pub const PERMISSION_PATCH_DRINKS: &str = "patch:drinks";
pub const PERMISSION_DELETE_DRINKS: &str = "delete:drinks";

/// Verify the request's bearer token and check that it grants the required permission.
///
/// This does not touch the database, so it should be called before any data store access.
async fn require_permission(
    req: &HttpRequest,
    state: &AppState,
    required_permission: &'static str,
) -> Result<Claims, APIError> {
    let verifier = state.token_verifier.as_ref().ok_or_else(|| {
        APIError::InternalError("Bearer token verification is not configured".to_owned())
    })?;
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| {
            value.to_str().map_err(|_| {
                AuthError::InvalidHeader("Authorization header must start with \"Bearer\".")
            })
        })
        .transpose()?;
    let token = get_token_auth_header(header_value)?;
    let key_set = verifier.key_set_source.fetch_key_set().await?;
    let claims = verify_decode_jwt(token, &verifier.validation, &key_set, chrono::Utc::now())?;
    check_permissions(required_permission, &claims)?;
    Ok(claims)
}
