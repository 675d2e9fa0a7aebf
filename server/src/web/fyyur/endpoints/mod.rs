//! The endpoint functions of the Fyyur UI, one module per entity type

pub mod artists;
pub mod index;
pub mod shows;
pub mod venues;

use crate::data_store::models::Genre;
use crate::data_store::GenreId;
use crate::web::fyyur::error::AppError;
use crate::web::fyyur::framework::base_template::{BaseTemplateContext, MainNavButton};
use crate::web::fyyur::framework::form_inputs::SelectEntry;
use crate::web::fyyur::framework::validation::{Int32FromList, US_STATES};
use actix_web::web::Html;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use askama::Template;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Form data of the search boxes
#[derive(Deserialize)]
pub struct SearchFormData {
    #[serde(default)]
    search_term: String,
}

/// One entry of the venue or artist search results page
pub struct SearchResult {
    url: String,
    name: String,
    num_upcoming_shows: i64,
}

#[derive(Template)]
#[template(path = "search_results.html")]
struct SearchResultsTemplate<'a> {
    base: BaseTemplateContext<'a>,
    search_term: &'a str,
    results: &'a [SearchResult],
}

fn render_search_results(
    req: &HttpRequest,
    nav_button: MainNavButton,
    search_term: &str,
    results: &[SearchResult],
) -> Result<Html, AppError> {
    let tmpl = SearchResultsTemplate {
        base: BaseTemplateContext {
            request: req,
            page_title: "Search results",
            active_main_nav_button: Some(nav_button),
        },
        search_term,
        results,
    };
    Ok(Html::new(tmpl.render()?))
}

fn us_state_entries() -> Vec<SelectEntry<'static>> {
    US_STATES
        .iter()
        .map(|state| SelectEntry {
            value: Cow::Borrowed(*state),
            text: Cow::Borrowed(*state),
        })
        .collect()
}

fn genre_entries(genres: &[Genre]) -> Vec<SelectEntry<'_>> {
    genres
        .iter()
        .map(|genre| SelectEntry {
            value: Cow::Owned(genre.id.to_string()),
            text: Cow::Borrowed(&genre.name),
        })
        .collect()
}

/// Collect the selected genre ids of a venue or artist form, each at most once
fn dedup_genre_ids(genres: Vec<Int32FromList>) -> Vec<GenreId> {
    let mut genre_ids: Vec<GenreId> = genres.into_iter().map(|g| g.into_inner()).collect();
    genre_ids.sort_unstable();
    genre_ids.dedup();
    genre_ids
}

/// JSON response of the DELETE endpoints, used by the delete buttons' JavaScript
#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
    message: String,
}

/// Create the JSON response for the DELETE endpoints from the result of the deletion, which is
/// the name of the deleted entity.
///
/// Errors are reported as JSON as well (instead of an error page), so they are logged here.
fn create_delete_json_response(
    result: Result<String, AppError>,
    kind_of_thing: &str,
    id: i32,
    req: &HttpRequest,
) -> HttpResponse {
    match result {
        Ok(name) => HttpResponse::Ok().json(DeleteResponse {
            success: true,
            message: format!("{} {} was deleted.", kind_of_thing, name),
        }),
        Err(AppError::EntityNotFound) => {
            warn!("{} {} to be deleted at <{}> not found", kind_of_thing, id, req.uri());
            HttpResponse::NotFound().json(DeleteResponse {
                success: false,
                message: format!("{} {} does not exist.", kind_of_thing, id),
            })
        }
        Err(e) => {
            error!("Deleting {} {} failed: {}", kind_of_thing, id, e);
            HttpResponse::build(e.status_code()).json(DeleteResponse {
                success: false,
                message: format!(
                    "An error occurred. {} {} could not be deleted.",
                    kind_of_thing, id
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_genre_ids() {
        let genres = vec![Int32FromList(3), Int32FromList(1), Int32FromList(3), Int32FromList(1)];
        assert_eq!(dedup_genre_ids(genres), vec![1, 3]);
        assert_eq!(dedup_genre_ids(vec![]), Vec::<GenreId>::new());
    }
}
