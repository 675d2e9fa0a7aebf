use super::{
    create_delete_json_response, dedup_genre_ids, genre_entries, render_search_results,
    us_state_entries, SearchFormData, SearchResult,
};
use crate::data_store::models::{
    FullNewVenue, FullVenue, Genre, NewVenue, Venue, VenueListEntry, VenueShow,
    IMAGE_LINK_MAX_CHARS, SEEKING_DESCRIPTION_MAX_CHARS, SHORT_TEXT_MAX_CHARS,
};
use crate::data_store::{GenreId, VenueId};
use crate::web::fyyur::error::AppError;
use crate::web::fyyur::framework::base_template::{BaseTemplateContext, MainNavButton};
use crate::web::fyyur::framework::flash::{FlashMessage, FlashType, FlashesInterface};
use crate::web::fyyur::framework::form_inputs::SelectEntry;
use crate::web::fyyur::framework::form_values::{
    BoolFormValue, FormValue, MultiFormValue, _FormValidSimpleValidate,
};
use crate::web::fyyur::framework::validation::{
    Int32FromList, NonEmptyString, OptionalPhoneNumber, OptionalText, OptionalUrl, UsState,
};
use crate::web::fyyur::util::{
    create_edit_form_response, parse_form_with_repeated_fields, FormSubmitResult,
};
use crate::web::AppState;
use actix_web::web::{Form, Html, Redirect};
use actix_web::{delete, get, post, web, HttpRequest, Responder};
use askama::Template;
use serde::Deserialize;

#[get("/venues")]
async fn list_venues(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let now = chrono::Utc::now();
    let venues = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_venues(now)?)
    })
    .await??;

    let tmpl = VenuesTemplate {
        base: BaseTemplateContext {
            request: &req,
            page_title: "Venues",
            active_main_nav_button: Some(MainNavButton::Venues),
        },
        areas: group_by_area(&venues),
    };
    Ok(Html::new(tmpl.render()?))
}

/// The venues of one city
struct VenueArea<'a> {
    city: &'a str,
    state: &'a str,
    venues: Vec<&'a VenueListEntry>,
}

/// Group the venues by (city, state). The venues must be sorted by these fields.
fn group_by_area(venues: &[VenueListEntry]) -> Vec<VenueArea<'_>> {
    let mut result: Vec<VenueArea> = Vec::new();
    for venue in venues {
        match result.last_mut() {
            Some(area) if area.city == venue.city && area.state == venue.state => {
                area.venues.push(venue);
            }
            _ => result.push(VenueArea {
                city: &venue.city,
                state: &venue.state,
                venues: vec![venue],
            }),
        }
    }
    result
}

#[derive(Template)]
#[template(path = "venues.html")]
struct VenuesTemplate<'a> {
    base: BaseTemplateContext<'a>,
    areas: Vec<VenueArea<'a>>,
}

#[post("/venues/search")]
async fn search_venues(
    state: web::Data<AppState>,
    data: Form<SearchFormData>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let now = chrono::Utc::now();
    let search_term = data.into_inner().search_term;
    let search_term_copy = search_term.clone();
    let venues = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.search_venues(&search_term_copy, now)?)
    })
    .await??;

    let results = venues
        .into_iter()
        .map(|venue| {
            Ok(SearchResult {
                url: req
                    .url_for("show_venue", [venue.id.to_string()])?
                    .to_string(),
                name: venue.name,
                num_upcoming_shows: venue.num_upcoming_shows,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    render_search_results(&req, MainNavButton::Venues, &search_term, &results)
}

#[get("/venues/{venue_id:\\d+}")]
async fn show_venue(
    path: web::Path<VenueId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let venue_id = path.into_inner();
    let venue = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_venue(venue_id)?)
    })
    .await??;

    let now = chrono::Utc::now();
    let (upcoming_shows, past_shows): (Vec<&VenueShow>, Vec<&VenueShow>) =
        venue.shows.iter().partition(|show| show.start_time >= now);
    let tmpl = VenueTemplate {
        base: BaseTemplateContext {
            request: &req,
            page_title: &venue.venue.name,
            active_main_nav_button: Some(MainNavButton::Venues),
        },
        venue: &venue.venue,
        genres: &venue.genres,
        past_shows,
        upcoming_shows,
    };
    Ok(Html::new(tmpl.render()?))
}

#[derive(Template)]
#[template(path = "venue.html")]
struct VenueTemplate<'a> {
    base: BaseTemplateContext<'a>,
    venue: &'a Venue,
    genres: &'a [Genre],
    past_shows: Vec<&'a VenueShow>,
    upcoming_shows: Vec<&'a VenueShow>,
}

#[get("/venues/create")]
async fn create_venue_form(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let genres = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_genres()?)
    })
    .await??;

    let form_data = VenueFormData::default();
    let form_action = req.url_for_static("create_venue")?.to_string();
    let tmpl = EditVenueTemplate::new(&req, &form_data, None, &form_action, &genres);
    Ok(Html::new(tmpl.render()?))
}

#[post("/venues/create")]
async fn create_venue(
    state: web::Data<AppState>,
    body: web::Bytes,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let (mut form_data, pairs): (VenueFormData, _) = parse_form_with_repeated_fields(&body)?;
    form_data.genres = MultiFormValue::from_pairs(&pairs, "genres");

    let state_copy = state.clone();
    let genres = web::block(move || -> Result<_, AppError> {
        let mut store = state_copy.store.get_facade()?;
        Ok(store.get_genres()?)
    })
    .await??;

    let name_of_thing = format!("Venue {}", form_data.name.string_value().trim());
    let result = match form_data.validate(&genres.iter().map(|g| g.id).collect()) {
        Some(venue) => {
            let store_result = web::block(move || -> Result<_, AppError> {
                let mut store = state.store.get_facade()?;
                Ok(store.create_venue(venue))
            })
            .await??;
            FormSubmitResult::from_store_result(store_result, |venue_id| {
                Ok(req.url_for("show_venue", [venue_id.to_string()])?)
            })
        }
        None => FormSubmitResult::ValidationError,
    };

    let form_action = req.url_for_static("create_venue")?.to_string();
    let tmpl = EditVenueTemplate::new(&req, &form_data, None, &form_action, &genres);
    create_edit_form_response(result, tmpl, &name_of_thing, true, &req)
}

#[get("/venues/{venue_id:\\d+}/edit")]
async fn edit_venue_form(
    path: web::Path<VenueId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let venue_id = path.into_inner();
    let (venue, genres) = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok((store.get_venue(venue_id)?, store.get_genres()?))
    })
    .await??;

    let form_data: VenueFormData = venue.into();
    let form_action = req
        .url_for("edit_venue", [venue_id.to_string()])?
        .to_string();
    let tmpl = EditVenueTemplate::new(&req, &form_data, Some(venue_id), &form_action, &genres);
    Ok(Html::new(tmpl.render()?))
}

#[post("/venues/{venue_id:\\d+}/edit")]
async fn edit_venue(
    path: web::Path<VenueId>,
    state: web::Data<AppState>,
    body: web::Bytes,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let venue_id = path.into_inner();
    let (mut form_data, pairs): (VenueFormData, _) = parse_form_with_repeated_fields(&body)?;
    form_data.genres = MultiFormValue::from_pairs(&pairs, "genres");

    let state_copy = state.clone();
    let genres = web::block(move || -> Result<_, AppError> {
        let mut store = state_copy.store.get_facade()?;
        // Make sure to show a "not found" page for missing venues instead of the form
        store.get_venue(venue_id)?;
        Ok(store.get_genres()?)
    })
    .await??;

    let name_of_thing = format!("Venue {}", form_data.name.string_value().trim());
    let result = match form_data.validate(&genres.iter().map(|g| g.id).collect()) {
        Some(venue) => {
            let store_result = web::block(move || -> Result<_, AppError> {
                let mut store = state.store.get_facade()?;
                Ok(store.update_venue(venue_id, venue))
            })
            .await??;
            FormSubmitResult::from_store_result(store_result, |()| {
                Ok(req.url_for("show_venue", [venue_id.to_string()])?)
            })
        }
        None => FormSubmitResult::ValidationError,
    };

    let form_action = req
        .url_for("edit_venue", [venue_id.to_string()])?
        .to_string();
    let tmpl = EditVenueTemplate::new(&req, &form_data, Some(venue_id), &form_action, &genres);
    create_edit_form_response(result, tmpl, &name_of_thing, false, &req)
}

#[delete("/venues/{venue_id:\\d+}")]
async fn delete_venue(
    path: web::Path<VenueId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> impl Responder {
    let venue_id = path.into_inner();
    let result = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.delete_venue(venue_id)?.name)
    })
    .await
    .map_err(AppError::from)
    .and_then(|r| r);
    create_delete_json_response(result, "Venue", venue_id, &req)
}

/// Fallback for deleting a venue without JavaScript
#[post("/venues/{venue_id:\\d+}/delete")]
async fn delete_venue_form_post(
    path: web::Path<VenueId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let venue_id = path.into_inner();
    let venue = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.delete_venue(venue_id)?)
    })
    .await??;

    req.add_flash_message(FlashMessage::new(
        FlashType::SUCCESS,
        format!("Venue {} was deleted.", venue.name),
    ));
    Ok(Redirect::to(req.url_for_static("list_venues")?.to_string()).see_other())
}

#[derive(Deserialize, Default, Debug)]
struct VenueFormData {
    name: FormValue<NonEmptyString<SHORT_TEXT_MAX_CHARS>>,
    city: FormValue<NonEmptyString<SHORT_TEXT_MAX_CHARS>>,
    state: FormValue<UsState>,
    address: FormValue<NonEmptyString<SHORT_TEXT_MAX_CHARS>>,
    phone: FormValue<OptionalPhoneNumber>,
    image_link: FormValue<OptionalUrl<IMAGE_LINK_MAX_CHARS>>,
    facebook_link: FormValue<OptionalUrl<SHORT_TEXT_MAX_CHARS>>,
    website_link: FormValue<OptionalUrl<SHORT_TEXT_MAX_CHARS>>,
    seeking_talent: BoolFormValue,
    seeking_description: FormValue<OptionalText<SEEKING_DESCRIPTION_MAX_CHARS>>,
    #[serde(skip)]
    genres: MultiFormValue<Int32FromList>,
}

impl VenueFormData {
    fn validate(&mut self, genre_ids: &Vec<GenreId>) -> Option<FullNewVenue> {
        let name = self.name.validate();
        let city = self.city.validate();
        let state = self.state.validate();
        let address = self.address.validate();
        let phone = self.phone.validate();
        let image_link = self.image_link.validate();
        let facebook_link = self.facebook_link.validate();
        let website = self.website_link.validate();
        let seeking_description = self.seeking_description.validate();
        let genres = self.genres.validate_with(genre_ids);

        Some(FullNewVenue {
            venue: NewVenue {
                name: name?.into_inner(),
                city: city?.into_inner(),
                state: state?.into_inner(),
                address: address?.into_inner(),
                phone: phone?.into_inner(),
                image_link: image_link?.into_inner(),
                facebook_link: facebook_link?.into_inner(),
                website: website?.into_inner(),
                seeking_talent: self.seeking_talent.get_value(),
                seeking_description: seeking_description?.into_inner(),
            },
            genre_ids: dedup_genre_ids(genres?),
        })
    }
}

impl From<FullVenue> for VenueFormData {
    fn from(value: FullVenue) -> Self {
        let venue = value.venue;
        Self {
            name: NonEmptyString(venue.name).into(),
            city: NonEmptyString(venue.city).into(),
            state: UsState(venue.state).into(),
            address: NonEmptyString(venue.address).into(),
            phone: OptionalPhoneNumber(venue.phone).into(),
            image_link: OptionalUrl(venue.image_link).into(),
            facebook_link: OptionalUrl(venue.facebook_link).into(),
            website_link: OptionalUrl(venue.website).into(),
            seeking_talent: venue.seeking_talent.into(),
            seeking_description: OptionalText(venue.seeking_description).into(),
            genres: value
                .genres
                .iter()
                .map(|genre| Int32FromList(genre.id))
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "edit_venue.html")]
struct EditVenueTemplate<'a> {
    base: BaseTemplateContext<'a>,
    form_data: &'a VenueFormData,
    /// `None` for the creation form
    venue_id: Option<VenueId>,
    form_action: &'a str,
    state_entries: Vec<SelectEntry<'static>>,
    genre_entries: Vec<SelectEntry<'a>>,
}

impl<'a> EditVenueTemplate<'a> {
    fn new(
        req: &'a HttpRequest,
        form_data: &'a VenueFormData,
        venue_id: Option<VenueId>,
        form_action: &'a str,
        genres: &'a [Genre],
    ) -> Self {
        Self {
            base: BaseTemplateContext {
                request: req,
                page_title: if venue_id.is_some() {
                    "Edit venue"
                } else {
                    "List a new venue"
                },
                active_main_nav_button: Some(MainNavButton::Venues),
            },
            form_data,
            venue_id,
            form_action,
            state_entries: us_state_entries(),
            genre_entries: genre_entries(genres),
        }
    }
}
