use crate::data_store::models::{ArtistListEntry, VenueListEntry};
use crate::web::fyyur::error::AppError;
use crate::web::fyyur::framework::base_template::BaseTemplateContext;
use crate::web::fyyur::RECENT_LISTINGS_COUNT;
use crate::web::AppState;
use actix_web::web::Html;
use actix_web::{get, web, HttpRequest, Responder};
use askama::Template;

#[get("/")]
async fn index(state: web::Data<AppState>, req: HttpRequest) -> Result<impl Responder, AppError> {
    let now = chrono::Utc::now();
    let (mut venues, mut artists) = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok((store.get_venues(now)?, store.get_artists(now)?))
    })
    .await??;

    // Ids are assigned in ascending order, so the highest ids are the most recently listed
    venues.sort_by(|a, b| b.id.cmp(&a.id));
    venues.truncate(RECENT_LISTINGS_COUNT);
    artists.sort_by(|a, b| b.id.cmp(&a.id));
    artists.truncate(RECENT_LISTINGS_COUNT);

    let tmpl = IndexTemplate {
        base: BaseTemplateContext {
            request: &req,
            page_title: "Fyyur",
            active_main_nav_button: None,
        },
        recent_venues: &venues,
        recent_artists: &artists,
    };
    Ok(Html::new(tmpl.render()?))
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    base: BaseTemplateContext<'a>,
    recent_venues: &'a Vec<VenueListEntry>,
    recent_artists: &'a Vec<ArtistListEntry>,
}
