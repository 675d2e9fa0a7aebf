//! The trivia JSON API, mounted at `/api`

use crate::web::json_api::{
    cors_headers, json_extractor_configs, not_found, preflight_or_method_not_allowed,
};
use crate::web::http_error_logging::error_logging_middleware;
use actix_web::middleware::from_fn;
use actix_web::web;

mod endpoints;
#[cfg(test)]
mod tests;

pub const QUESTIONS_PER_PAGE: usize = 10;

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    let (json_config, query_config, path_config) = json_extractor_configs();
    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .app_data(query_config)
            .app_data(path_config)
            .service(
                web::resource("/categories")
                    .route(web::get().to(endpoints::list_categories))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .service(
                web::resource("/categories/{category_id}/questions")
                    .route(web::get().to(endpoints::list_category_questions))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .service(
                web::resource("/questions")
                    .route(web::get().to(endpoints::list_questions))
                    .route(web::post().to(endpoints::create_question))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .service(
                web::resource("/questions/search")
                    .route(web::post().to(endpoints::search_questions))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .service(
                web::resource("/questions/{question_id}")
                    .route(web::delete().to(endpoints::delete_question))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .service(
                web::resource("/play")
                    .route(web::post().to(endpoints::play_quiz))
                    .default_service(web::to(preflight_or_method_not_allowed)),
            )
            .default_service(web::to(not_found))
            .wrap(from_fn(error_logging_middleware))
            .wrap(cors_headers("GET,POST,DELETE,OPTIONS")),
    );
}
