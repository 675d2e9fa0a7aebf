use super::{
    create_delete_json_response, dedup_genre_ids, genre_entries, render_search_results,
    us_state_entries, SearchFormData, SearchResult,
};
use crate::data_store::models::{
    Artist, ArtistListEntry, ArtistShow, FullArtist, FullNewArtist, Genre, NewArtist,
    IMAGE_LINK_MAX_CHARS, SEEKING_DESCRIPTION_MAX_CHARS, SHORT_TEXT_MAX_CHARS,
};
use crate::data_store::{ArtistId, GenreId};
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

#[get("/artists")]
async fn list_artists(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let now = chrono::Utc::now();
    let artists = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_artists(now)?)
    })
    .await??;

    let tmpl = ArtistsTemplate {
        base: BaseTemplateContext {
            request: &req,
            page_title: "Artists",
            active_main_nav_button: Some(MainNavButton::Artists),
        },
        artists: &artists,
    };
    Ok(Html::new(tmpl.render()?))
}

#[derive(Template)]
#[template(path = "artists.html")]
struct ArtistsTemplate<'a> {
    base: BaseTemplateContext<'a>,
    artists: &'a [ArtistListEntry],
}

#[post("/artists/search")]
async fn search_artists(
    state: web::Data<AppState>,
    data: Form<SearchFormData>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let now = chrono::Utc::now();
    let search_term = data.into_inner().search_term;
    let search_term_copy = search_term.clone();
    let artists = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.search_artists(&search_term_copy, now)?)
    })
    .await??;

    let results = artists
        .into_iter()
        .map(|artist| {
            Ok(SearchResult {
                url: req
                    .url_for("show_artist", [artist.id.to_string()])?
                    .to_string(),
                name: artist.name,
                num_upcoming_shows: artist.num_upcoming_shows,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    render_search_results(&req, MainNavButton::Artists, &search_term, &results)
}

#[get("/artists/{artist_id:\\d+}")]
async fn show_artist(
    path: web::Path<ArtistId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let artist_id = path.into_inner();
    let artist = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_artist(artist_id)?)
    })
    .await??;

    let now = chrono::Utc::now();
    let (upcoming_shows, past_shows): (Vec<&ArtistShow>, Vec<&ArtistShow>) =
        artist.shows.iter().partition(|show| show.start_time >= now);
    let tmpl = ArtistTemplate {
        base: BaseTemplateContext {
            request: &req,
            page_title: &artist.artist.name,
            active_main_nav_button: Some(MainNavButton::Artists),
        },
        artist: &artist.artist,
        genres: &artist.genres,
        past_shows,
        upcoming_shows,
    };
    Ok(Html::new(tmpl.render()?))
}

#[derive(Template)]
#[template(path = "artist.html")]
struct ArtistTemplate<'a> {
    base: BaseTemplateContext<'a>,
    artist: &'a Artist,
    genres: &'a [Genre],
    past_shows: Vec<&'a ArtistShow>,
    upcoming_shows: Vec<&'a ArtistShow>,
}

#[get("/artists/create")]
async fn create_artist_form(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let genres = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_genres()?)
    })
    .await??;

    let form_data = ArtistFormData::default();
    let form_action = req.url_for_static("create_artist")?.to_string();
    let tmpl = EditArtistTemplate::new(&req, &form_data, None, &form_action, &genres);
    Ok(Html::new(tmpl.render()?))
}

#[post("/artists/create")]
async fn create_artist(
    state: web::Data<AppState>,
    body: web::Bytes,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let (mut form_data, pairs): (ArtistFormData, _) = parse_form_with_repeated_fields(&body)?;
    form_data.genres = MultiFormValue::from_pairs(&pairs, "genres");

    let state_copy = state.clone();
    let genres = web::block(move || -> Result<_, AppError> {
        let mut store = state_copy.store.get_facade()?;
        Ok(store.get_genres()?)
    })
    .await??;

    let name_of_thing = format!("Artist {}", form_data.name.string_value().trim());
    let result = match form_data.validate(&genres.iter().map(|g| g.id).collect()) {
        Some(artist) => {
            let store_result = web::block(move || -> Result<_, AppError> {
                let mut store = state.store.get_facade()?;
                Ok(store.create_artist(artist))
            })
            .await??;
            FormSubmitResult::from_store_result(store_result, |artist_id| {
                Ok(req.url_for("show_artist", [artist_id.to_string()])?)
            })
        }
        None => FormSubmitResult::ValidationError,
    };

    let form_action = req.url_for_static("create_artist")?.to_string();
    let tmpl = EditArtistTemplate::new(&req, &form_data, None, &form_action, &genres);
    create_edit_form_response(result, tmpl, &name_of_thing, true, &req)
}

#[get("/artists/{artist_id:\\d+}/edit")]
async fn edit_artist_form(
    path: web::Path<ArtistId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let artist_id = path.into_inner();
    let (artist, genres) = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok((store.get_artist(artist_id)?, store.get_genres()?))
    })
    .await??;

    let form_data: ArtistFormData = artist.into();
    let form_action = req
        .url_for("edit_artist", [artist_id.to_string()])?
        .to_string();
    let tmpl = EditArtistTemplate::new(&req, &form_data, Some(artist_id), &form_action, &genres);
    Ok(Html::new(tmpl.render()?))
}

#[post("/artists/{artist_id:\\d+}/edit")]
async fn edit_artist(
    path: web::Path<ArtistId>,
    state: web::Data<AppState>,
    body: web::Bytes,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let artist_id = path.into_inner();
    let (mut form_data, pairs): (ArtistFormData, _) = parse_form_with_repeated_fields(&body)?;
    form_data.genres = MultiFormValue::from_pairs(&pairs, "genres");

    let state_copy = state.clone();
    let genres = web::block(move || -> Result<_, AppError> {
        let mut store = state_copy.store.get_facade()?;
        store.get_artist(artist_id)?;
        Ok(store.get_genres()?)
    })
    .await??;

    let name_of_thing = format!("Artist {}", form_data.name.string_value().trim());
    let result = match form_data.validate(&genres.iter().map(|g| g.id).collect()) {
        Some(artist) => {
            let store_result = web::block(move || -> Result<_, AppError> {
                let mut store = state.store.get_facade()?;
                Ok(store.update_artist(artist_id, artist))
            })
            .await??;
            FormSubmitResult::from_store_result(store_result, |()| {
                Ok(req.url_for("show_artist", [artist_id.to_string()])?)
            })
        }
        None => FormSubmitResult::ValidationError,
    };

    let form_action = req
        .url_for("edit_artist", [artist_id.to_string()])?
        .to_string();
    let tmpl = EditArtistTemplate::new(&req, &form_data, Some(artist_id), &form_action, &genres);
    create_edit_form_response(result, tmpl, &name_of_thing, false, &req)
}

#[delete("/artists/{artist_id:\\d+}")]
async fn delete_artist(
    path: web::Path<ArtistId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> impl Responder {
    let artist_id = path.into_inner();
    let result = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.delete_artist(artist_id)?.name)
    })
    .await
    .map_err(AppError::from)
    .and_then(|r| r);
    create_delete_json_response(result, "Artist", artist_id, &req)
}

/// Fallback for deleting an artist without JavaScript
#[post("/artists/{artist_id:\\d+}/delete")]
async fn delete_artist_form_post(
    path: web::Path<ArtistId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    let artist_id = path.into_inner();
    let artist = web::block(move || -> Result<_, AppError> {
        let mut store = state.store.get_facade()?;
        Ok(store.delete_artist(artist_id)?)
    })
    .await??;

    req.add_flash_message(FlashMessage::new(
        FlashType::SUCCESS,
        format!("Artist {} was deleted.", artist.name),
    ));
    Ok(Redirect::to(req.url_for_static("list_artists")?.to_string()).see_other())
}

#[derive(Deserialize, Default, Debug)]
struct ArtistFormData {
    name: FormValue<NonEmptyString<SHORT_TEXT_MAX_CHARS>>,
    city: FormValue<NonEmptyString<SHORT_TEXT_MAX_CHARS>>,
    state: FormValue<UsState>,
    phone: FormValue<OptionalPhoneNumber>,
    image_link: FormValue<OptionalUrl<IMAGE_LINK_MAX_CHARS>>,
    facebook_link: FormValue<OptionalUrl<SHORT_TEXT_MAX_CHARS>>,
    website_link: FormValue<OptionalUrl<SHORT_TEXT_MAX_CHARS>>,
    seeking_venue: BoolFormValue,
    seeking_description: FormValue<OptionalText<SEEKING_DESCRIPTION_MAX_CHARS>>,
    #[serde(skip)]
    genres: MultiFormValue<Int32FromList>,
}

impl ArtistFormData {
    fn validate(&mut self, genre_ids: &Vec<GenreId>) -> Option<FullNewArtist> {
        let name = self.name.validate();
        let city = self.city.validate();
        let state = self.state.validate();
        let phone = self.phone.validate();
        let image_link = self.image_link.validate();
        let facebook_link = self.facebook_link.validate();
        let website = self.website_link.validate();
        let seeking_description = self.seeking_description.validate();
        let genres = self.genres.validate_with(genre_ids);

        Some(FullNewArtist {
            artist: NewArtist {
                name: name?.into_inner(),
                city: city?.into_inner(),
                state: state?.into_inner(),
                phone: phone?.into_inner(),
                image_link: image_link?.into_inner(),
                facebook_link: facebook_link?.into_inner(),
                website: website?.into_inner(),
                seeking_venue: self.seeking_venue.get_value(),
                seeking_description: seeking_description?.into_inner(),
            },
            genre_ids: dedup_genre_ids(genres?),
        })
    }
}

impl From<FullArtist> for ArtistFormData {
    fn from(value: FullArtist) -> Self {
        let artist = value.artist;
        Self {
            name: NonEmptyString(artist.name).into(),
            city: NonEmptyString(artist.city).into(),
            state: UsState(artist.state).into(),
            phone: OptionalPhoneNumber(artist.phone).into(),
            image_link: OptionalUrl(artist.image_link).into(),
            facebook_link: OptionalUrl(artist.facebook_link).into(),
            website_link: OptionalUrl(artist.website).into(),
            seeking_venue: artist.seeking_venue.into(),
            seeking_description: OptionalText(artist.seeking_description).into(),
            genres: value
                .genres
                .iter()
                .map(|genre| Int32FromList(genre.id))
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "edit_artist.html")]
struct EditArtistTemplate<'a> {
    base: BaseTemplateContext<'a>,
    form_data: &'a ArtistFormData,
    /// `None` for the creation form
    artist_id: Option<ArtistId>,
    form_action: &'a str,
    state_entries: Vec<SelectEntry<'static>>,
    genre_entries: Vec<SelectEntry<'a>>,
}

impl<'a> EditArtistTemplate<'a> {
    fn new(
        req: &'a HttpRequest,
        form_data: &'a ArtistFormData,
        artist_id: Option<ArtistId>,
        form_action: &'a str,
        genres: &'a [Genre],
    ) -> Self {
        Self {
            base: BaseTemplateContext {
                request: req,
                page_title: if artist_id.is_some() {
                    "Edit artist"
                } else {
                    "List a new artist"
                },
                active_main_nav_button: Some(MainNavButton::Artists),
            },
            form_data,
            artist_id,
            form_action,
            state_entries: us_state_entries(),
            genre_entries: genre_entries(genres),
        }
    }
}
