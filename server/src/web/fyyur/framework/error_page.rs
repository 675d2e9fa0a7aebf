use crate::web::fyyur::error::AppError;
use crate::web::fyyur::framework::base_template::BaseTemplateContext;
use actix_web::body::EitherBody;
use actix_web::web::Html;
use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError};
use askama::Template;

/// An actix-web middleware replacing all error responses with a rendered HTML error page
///
/// [AppError]s get a descriptive page, all other errors (e.g. from actix-web's extractors) a
/// generic one with the error's description.
pub async fn error_page_middleware<B: actix_web::body::MessageBody>(
    req: actix_web::dev::ServiceRequest,
    next: actix_web::middleware::Next<B>,
) -> Result<actix_web::dev::ServiceResponse<EitherBody<B, String>>, actix_web::Error> {
    let response = next.call(req).await?;

    let Some(error) = response.response().error() else {
        return Ok(response.map_body(|_, body| EitherBody::left(body)));
    };
    let page = if let Some(app_error) = error.as_error::<AppError>() {
        generate_app_error_page(app_error, response.request())
    } else {
        generate_generic_error_page(error.as_response_error(), response.request())
    };
    let (req, _res) = response.into_parts();
    Ok(actix_web::dev::ServiceResponse::new(
        req,
        page.map_body(|_, body| EitherBody::right(body)),
    ))
}

fn generate_app_error_page(app_error: &AppError, http_request: &HttpRequest) -> HttpResponse<String> {
    let tmpl = AppErrorTemplate {
        base: BaseTemplateContext {
            request: http_request,
            page_title: "Error",
            active_main_nav_button: None,
        },
        error: app_error,
    };
    render_template_or_show_error_as_string(tmpl, app_error, http_request)
}

fn generate_generic_error_page(
    error: &dyn ResponseError,
    http_request: &HttpRequest,
) -> HttpResponse<String> {
    let tmpl = ErrorTemplate {
        base: BaseTemplateContext {
            request: http_request,
            page_title: "Error",
            active_main_nav_button: None,
        },
        status: error.status_code().as_u16(),
        message: error.to_string(),
    };
    render_template_or_show_error_as_string(tmpl, error, http_request)
}

fn render_template_or_show_error_as_string(
    tmpl: impl Template,
    error: &dyn ResponseError,
    req: &HttpRequest,
) -> HttpResponse<String> {
    match tmpl.render() {
        Ok(body) => (Html::new(body), error.status_code()).respond_to(req),
        Err(err) => (
            format!(
                "Error: {}\n(Could not render nice error page: {})",
                error, err
            ),
            error.status_code(),
        )
            .respond_to(req),
    }
}

#[derive(Debug, Template)]
#[template(path = "app_error.html")]
struct AppErrorTemplate<'a> {
    base: BaseTemplateContext<'a>,
    error: &'a AppError,
}

impl AppErrorTemplate<'_> {
    fn is_not_found(&self) -> bool {
        matches!(self.error, AppError::PageNotFound | AppError::EntityNotFound)
    }

    fn is_temporary(&self) -> bool {
        matches!(
            self.error,
            AppError::TransactionConflict | AppError::DatabaseConnectionError(_)
        )
    }
}

#[derive(Debug, Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    base: BaseTemplateContext<'a>,
    status: u16,
    message: String,
}
