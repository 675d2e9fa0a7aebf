//! Handlers of the coffee shop API
//!
//! The handlers taking a request body receive the body extraction result instead of the plain
//! `web::Json`, so that the bearer token is checked before the body is validated.

use super::{
    require_permission, PERMISSION_DELETE_DRINKS, PERMISSION_GET_DRINKS_DETAIL,
    PERMISSION_PATCH_DRINKS, PERMISSION_POST_DRINKS,
};
use crate::data_store::models::{DrinkPatch, NewDrink, Recipe, DRINK_TITLE_MAX_CHARS};
use crate::data_store::DrinkId;
use crate::web::json_api::APIError;
use crate::web::AppState;
use actix_web::{web, HttpRequest, Responder};
use trio_api_types::{DrinkDeletedResponse, DrinkLong, DrinkShort, DrinksResponse};

pub async fn list_drinks(state: web::Data<AppState>) -> Result<impl Responder, APIError> {
    let drinks: Vec<DrinkShort> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_drinks()?)
    })
    .await??
    .into_iter()
    .map(|d| d.short())
    .collect();

    Ok(web::Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

pub async fn list_drinks_detail(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, APIError> {
    require_permission(&req, &state, PERMISSION_GET_DRINKS_DETAIL).await?;
    let drinks: Vec<DrinkLong> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_drinks()?)
    })
    .await??
    .into_iter()
    .map(|d| d.into())
    .collect();

    Ok(web::Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

pub async fn create_drink(
    data: Result<web::Json<trio_api_types::NewDrink>, actix_web::Error>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, actix_web::Error> {
    require_permission(&req, &state, PERMISSION_POST_DRINKS).await?;
    let drink: NewDrink = data?.into_inner().into();
    validate_title(&drink.title)?;
    validate_recipe(&drink.recipe)?;
    let created = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.create_drink(drink)?)
    })
    .await
    .map_err(APIError::from)??;

    Ok(web::Json(DrinksResponse::<DrinkLong> {
        success: true,
        drinks: vec![created.into()],
    }))
}

pub async fn update_drink(
    path: web::Path<DrinkId>,
    data: Result<web::Json<trio_api_types::DrinkPatch>, actix_web::Error>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, actix_web::Error> {
    require_permission(&req, &state, PERMISSION_PATCH_DRINKS).await?;
    let drink_id = path.into_inner();
    let patch: DrinkPatch = data?.into_inner().into();
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(recipe) = &patch.recipe {
        validate_recipe(recipe)?;
    }
    let updated = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.update_drink(drink_id, patch)?)
    })
    .await
    .map_err(APIError::from)??;

    Ok(web::Json(DrinksResponse::<DrinkLong> {
        success: true,
        drinks: vec![updated.into()],
    }))
}

pub async fn delete_drink(
    path: web::Path<DrinkId>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, APIError> {
    require_permission(&req, &state, PERMISSION_DELETE_DRINKS).await?;
    let drink_id = path.into_inner();
    web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        store.delete_drink(drink_id)?;
        Ok(())
    })
    .await??;

    Ok(web::Json(DrinkDeletedResponse {
        success: true,
        delete: drink_id,
    }))
}

fn validate_title(title: &str) -> Result<(), APIError> {
    if title.trim().is_empty() {
        return Err(APIError::InvalidData("Title must not be empty".to_owned()));
    }
    if title.chars().count() > DRINK_TITLE_MAX_CHARS {
        return Err(APIError::InvalidData(format!(
            "Title must not be longer than {} characters",
            DRINK_TITLE_MAX_CHARS
        )));
    }
    Ok(())
}

fn validate_recipe(recipe: &Recipe) -> Result<(), APIError> {
    if recipe.0.is_empty() {
        return Err(APIError::InvalidData(
            "Recipe must contain at least one part".to_owned(),
        ));
    }
    if recipe.0.iter().any(|part| part.parts < 1) {
        return Err(APIError::InvalidData(
            "Number of parts must be positive".to_owned(),
        ));
    }
    Ok(())
}
