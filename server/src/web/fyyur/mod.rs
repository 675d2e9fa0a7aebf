//! Fyyur, the HTML website for listing venues, artists and their shows
//!
//! All pages are rendered on the server with askama templates. Errors are turned into HTML error
//! pages by the [framework::error_page::error_page_middleware], success and failure notices are
//! transported to the next page as flash messages ([framework::flash]).

use crate::web::fyyur::error::AppError;
use crate::web::fyyur::framework::error_page::error_page_middleware;
use crate::web::fyyur::framework::flash::flash_middleware;
use crate::web::http_error_logging::error_logging_middleware;
use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::middleware::from_fn;
use actix_web::{get, web, HttpResponse, Responder};
use rust_embed::Embed;

mod endpoints;
pub mod error;
mod framework;
mod util;

/// Number of recently listed venues and artists on the home page
const RECENT_LISTINGS_COUNT: usize = 10;

pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        get_ui_service()
            .wrap(from_fn(error_logging_middleware))
            .wrap(from_fn(flash_middleware))
            .wrap(from_fn(error_page_middleware)),
    );
}

fn get_ui_service() -> actix_web::Scope {
    web::scope("")
        .service(static_resources)
        .service(endpoints::index::index)
        .service(endpoints::venues::list_venues)
        .service(endpoints::venues::search_venues)
        .service(endpoints::venues::show_venue)
        .service(endpoints::venues::create_venue_form)
        .service(endpoints::venues::create_venue)
        .service(endpoints::venues::edit_venue_form)
        .service(endpoints::venues::edit_venue)
        .service(endpoints::venues::delete_venue)
        .service(endpoints::venues::delete_venue_form_post)
        .service(endpoints::artists::list_artists)
        .service(endpoints::artists::search_artists)
        .service(endpoints::artists::show_artist)
        .service(endpoints::artists::create_artist_form)
        .service(endpoints::artists::create_artist)
        .service(endpoints::artists::edit_artist_form)
        .service(endpoints::artists::edit_artist)
        .service(endpoints::artists::delete_artist)
        .service(endpoints::artists::delete_artist_form_post)
        .service(endpoints::shows::list_shows)
        .service(endpoints::shows::search_shows)
        .service(endpoints::shows::create_show_form)
        .service(endpoints::shows::create_show)
        .default_service(web::to(not_found_handler))
}

#[derive(Embed)]
#[folder = "static/"]
struct Resources;

impl Resources {
    fn handle_embedded_file(path: &str) -> HttpResponse {
        match Self::get(path) {
            Some(content) => HttpResponse::Ok()
                .content_type(mime_guess::from_path(path).first_or_octet_stream().as_ref())
                .append_header(CacheControl(vec![CacheDirective::MaxAge(86400 * 365)]))
                .body(content.data.into_owned()),
            None => {
                HttpResponse::NotFound().body(format!("Static resource file '{}' not found", path))
            }
        }
    }
}

#[get("/static/{_:.*}")]
async fn static_resources(path: web::Path<String>) -> impl Responder {
    Resources::handle_embedded_file(path.as_str())
}

async fn not_found_handler() -> Result<&'static str, AppError> {
    Err(AppError::PageNotFound)
}
