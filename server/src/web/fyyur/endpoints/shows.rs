use super::SearchFormData;
use crate::data_store::models::{ArtistListEntry, Show, ShowListEntry, VenueListEntry};
use crate::data_store::StoreError;
use crate::web::fyyur::error::AppError;
use crate::web::fyyur::framework::base_template::{BaseTemplateContext, MainNavButton};
use crate::web::fyyur::framework::form_inputs::SelectEntry;
use crate::web::fyyur::framework::form_values::{FormValue, _FormValidSimpleValidate};
use crate::web::fyyur::framework::validation::{Int32FromList, ShowStartTime};
use crate::web::fyyur::util::{create_edit_form_response, FormSubmitResult};
use crate::web::AppState;
use actix_web::web::{Form, Html};
use actix_web::{get, post, web, HttpRequest, Responder};
use askama::Template;
use serde::Deserialize;
use std::borrow::Cow;

#[get("/shows")]
async fn list_shows(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let shows = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_shows()?)
    })
    .await??;

    let tmpl = ShowsTemplate {
        base: BaseTemplateContext {
            request: &req,
            page_title: "Shows",
            active_main_nav_button: Some(MainNavButton::Shows),
        },
        shows: &shows,
        search_term: None,
    };
    Ok(Html::new(tmpl.render()?))
}

#[post("/shows/search")]
async fn search_shows(
    state: web::Data<AppState>,
    data: Form<SearchFormData>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let search_term = data.into_inner().search_term;
    let search_term_copy = search_term.clone();
    let shows = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.search_shows(&search_term_copy)?)
    })
    .await??;

    let tmpl = ShowsTemplate {
        base: BaseTemplateContext {
            request: &req,
            page_title: "Search results",
            active_main_nav_button: Some(MainNavButton::Shows),
        },
        shows: &shows,
        search_term: Some(&search_term),
    };
    Ok(Html::new(tmpl.render()?))
}

#[derive(Template)]
#[template(path = "shows.html")]
struct ShowsTemplate<'a> {
    base: BaseTemplateContext<'a>,
    shows: &'a [ShowListEntry],
    /// Only present on the search results page
    search_term: Option<&'a str>,
}

#[get("/shows/create")]
async fn create_show_form(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let now = chrono::Utc::now();
    let (venues, artists) = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok((store.get_venues(now)?, store.get_artists(now)?))
    })
    .await??;

    let form_data = ShowFormData {
        venue_id: FormValue::empty(),
        artist_id: FormValue::empty(),
        start_time: ShowStartTime(now).into(),
    };
    let tmpl = NewShowTemplate::new(&req, &form_data, &venues, &artists);
    Ok(Html::new(tmpl.render()?))
}

#[post("/shows/create")]
async fn create_show(
    state: web::Data<AppState>,
    data: Form<ShowFormData>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let mut form_data = data.into_inner();
    let now = chrono::Utc::now();
    let state_copy = state.clone();
    let (venues, artists) = web::block(move || -> Result<_, AppError> {
        let mut store = state_copy.store.get_facade()?;
        Ok((store.get_venues(now)?, store.get_artists(now)?))
    })
    .await??;

    let venue_ids = venues.iter().map(|v| v.id).collect();
    let artist_ids = artists.iter().map(|a| a.id).collect();
    let result = match form_data.validate(&venue_ids, &artist_ids) {
        Some(show) => {
            let store_result = web::block(move || -> Result<_, AppError> {
                let mut store = state.store.get_facade()?;
                Ok(store.create_show(show))
            })
            .await??;
            match store_result {
                Err(StoreError::ConflictEntityExists) => {
                    form_data.start_time.add_error(
                        "This artist already has a show at this venue at that time.".to_owned(),
                    );
                    FormSubmitResult::ValidationError
                }
                Err(StoreError::InvalidInputData(_)) => {
                    // The venue or artist has been deleted in the meantime
                    form_data
                        .venue_id
                        .add_error("The venue or artist does not exist anymore.".to_owned());
                    FormSubmitResult::ValidationError
                }
                store_result => FormSubmitResult::from_store_result(store_result, |()| {
                    Ok(req.url_for_static("list_shows")?)
                }),
            }
        }
        None => FormSubmitResult::ValidationError,
    };

    let tmpl = NewShowTemplate::new(&req, &form_data, &venues, &artists);
    create_edit_form_response(result, tmpl, "Show", true, &req)
}

#[derive(Deserialize, Debug)]
struct ShowFormData {
    venue_id: FormValue<Int32FromList>,
    artist_id: FormValue<Int32FromList>,
    start_time: FormValue<ShowStartTime>,
}

impl ShowFormData {
    fn validate(&mut self, venue_ids: &Vec<i32>, artist_ids: &Vec<i32>) -> Option<Show> {
        let venue_id = self.venue_id.validate_with(venue_ids);
        let artist_id = self.artist_id.validate_with(artist_ids);
        let start_time = self.start_time.validate();
        Some(Show {
            venue_id: venue_id?.into_inner(),
            artist_id: artist_id?.into_inner(),
            start_time: start_time?.into_inner(),
        })
    }
}

#[derive(Template)]
#[template(path = "new_show.html")]
struct NewShowTemplate<'a> {
    base: BaseTemplateContext<'a>,
    form_data: &'a ShowFormData,
    venue_entries: Vec<SelectEntry<'a>>,
    artist_entries: Vec<SelectEntry<'a>>,
}

impl<'a> NewShowTemplate<'a> {
    fn new(
        req: &'a HttpRequest,
        form_data: &'a ShowFormData,
        venues: &'a [VenueListEntry],
        artists: &'a [ArtistListEntry],
    ) -> Self {
        Self {
            base: BaseTemplateContext {
                request: req,
                page_title: "List a new show",
                active_main_nav_button: Some(MainNavButton::Shows),
            },
            form_data,
            venue_entries: venues
                .iter()
                .map(|venue| SelectEntry {
                    value: Cow::Owned(venue.id.to_string()),
                    text: Cow::Borrowed(&venue.name),
                })
                .collect(),
            artist_entries: artists
                .iter()
                .map(|artist| SelectEntry {
                    value: Cow::Owned(artist.id.to_string()),
                    text: Cow::Borrowed(&artist.name),
                })
                .collect(),
        }
    }
}
