use crate::data_store::StoreError;
use crate::web::fyyur::error::AppError;
use crate::web::fyyur::framework::flash::{FlashMessage, FlashType, FlashesInterface};
use actix_web::http::header::ContentType;
use actix_web::web::Redirect;
use actix_web::{Either, HttpRequest, HttpResponse};
use askama::Template;
use log::error;
use serde::de::DeserializeOwned;

/// Helper type for representing the different possible outcomes of submitting an edit form.
///
/// They are used to delegate creating appropriate response to [create_edit_form_response()].
pub enum FormSubmitResult {
    /// The entity has been stored. Redirect to the given URL.
    Success(url::Url),
    ValidationError,
    TransactionConflict,
    /// Storing the entity failed due to a database problem. The form is shown again, so the user
    /// does not lose the entered data.
    DatabaseError(StoreError),
    UnexpectedError(AppError),
}

impl FormSubmitResult {
    /// Map the result of the data store call, storing the form's entity, to a FormSubmitResult.
    ///
    /// `success_redirect` is called with the result value to generate the redirect URL.
    pub fn from_store_result<T>(
        result: Result<T, StoreError>,
        success_redirect: impl FnOnce(T) -> Result<url::Url, AppError>,
    ) -> Self {
        match result {
            Ok(value) => match success_redirect(value) {
                Ok(url) => Self::Success(url),
                Err(e) => Self::UnexpectedError(e),
            },
            Err(StoreError::TransactionConflict) => Self::TransactionConflict,
            Err(e @ (StoreError::ConnectionError(_) | StoreError::QueryError(_))) => {
                Self::DatabaseError(e)
            }
            Err(e) => Self::UnexpectedError(e.into()),
        }
    }
}

/// Helper function for generating the HTTP response of the form submission endpoints.
///
/// Together with the [FormSubmitResult] helper type, this function keeps the error message
/// creation in one place. `name_of_thing` is used in the flash messages, e.g. "Venue The Musical
/// Hop".
pub fn create_edit_form_response(
    result: FormSubmitResult,
    tmpl: impl Template,
    name_of_thing: &str,
    is_new_entity: bool,
    request: &HttpRequest,
) -> Result<Either<Redirect, HttpResponse>, AppError> {
    match result {
        FormSubmitResult::Success(success_redirect) => {
            request.add_flash_message(FlashMessage::new(
                FlashType::SUCCESS,
                if is_new_entity {
                    format!("{} was successfully listed!", name_of_thing)
                } else {
                    format!("{} was successfully updated!", name_of_thing)
                },
            ));
            Ok(Either::Left(
                Redirect::to(success_redirect.to_string()).see_other(),
            ))
        }
        FormSubmitResult::ValidationError => {
            request.add_flash_message(FlashMessage::new(
                FlashType::ERROR,
                "The submitted data is invalid. Please check the highlighted fields.",
            ));
            Ok(Either::Right(
                HttpResponse::UnprocessableEntity()
                    .content_type(ContentType::html())
                    .body(tmpl.render()?),
            ))
        }
        FormSubmitResult::TransactionConflict => {
            request.add_flash_message(FlashMessage::new(
                FlashType::WARNING,
                "Could not save due to a concurrent database access. Please submit the form again.",
            ));
            Ok(Either::Right(
                HttpResponse::ServiceUnavailable()
                    .content_type(ContentType::html())
                    .body(tmpl.render()?),
            ))
        }
        FormSubmitResult::DatabaseError(e) => {
            error!(
                "Could not store form data of {} at <{}>: {}",
                name_of_thing,
                request.uri(),
                e
            );
            request.add_flash_message(FlashMessage::new(
                FlashType::ERROR,
                format!(
                    "An error occurred. {} could not be {}.",
                    name_of_thing,
                    if is_new_entity { "listed" } else { "updated" }
                ),
            ));
            Ok(Either::Right(
                HttpResponse::InternalServerError()
                    .content_type(ContentType::html())
                    .body(tmpl.render()?),
            ))
        }
        FormSubmitResult::UnexpectedError(e) => Err(e),
    }
}

/// Decode an urlencoded form body, which contains repeated fields.
///
/// Returns the form data struct (which should skip the repeated fields) together with all
/// key-value pairs of the form, for building the [MultiFormValue]s of the repeated fields.
///
/// [MultiFormValue]: crate::web::fyyur::framework::form_values::MultiFormValue
pub fn parse_form_with_repeated_fields<T: DeserializeOwned>(
    body: &[u8],
) -> Result<(T, Vec<(String, String)>), AppError> {
    let data = serde_urlencoded::from_bytes(body)?;
    let pairs = serde_urlencoded::from_bytes(body)?;
    Ok((data, pairs))
}
