use crate::auth::{HttpKeySetSource, KeySetSource, TokenValidation};
use crate::cli_error::CliError;
use crate::data_store::{get_store_from_env, TrioStore};
use crate::setup::{
    get_api_audience_from_env, get_auth_domain_from_env, get_listen_address_from_env,
    get_listen_port_from_env,
};
use actix_web::{middleware, web, App, HttpServer};
use log::info;
use std::sync::Arc;

mod coffee_shop;
mod fyyur;
mod http_error_logging;
mod json_api;
mod trivia;

/// The independent web applications, served by this program
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WebApp {
    /// Venue and artist listing site (HTML)
    Fyyur,
    /// Trivia questions JSON API
    Trivia,
    /// Coffee shop drinks JSON API with bearer token authentication
    CoffeeShop,
}

pub fn serve(apps: &[WebApp]) -> Result<(), CliError> {
    let state = AppState::new(apps)?;
    let apps = apps.to_vec();
    info!("Starting web server with applications {:?}", apps);
    actix_web::rt::System::new()
        .block_on(
            HttpServer::new(move || {
                App::new()
                    .configure(|cfg| configure_apps(cfg, &apps))
                    .app_data(web::Data::new(state.clone()))
                    .wrap(middleware::Logger::default())
                    .wrap(middleware::Compress::default())
            })
            .bind((get_listen_address_from_env()?, get_listen_port_from_env()?))
            .map_err(CliError::BindError)?
            .run(),
        )
        .map_err(CliError::ServerError)
}

/// Register the services of the enabled applications.
///
/// The Fyyur UI handles all paths without a more specific prefix, so it must be registered last.
/// Each application wraps its services in the [http_error_logging::error_logging_middleware].
fn configure_apps(cfg: &mut web::ServiceConfig, apps: &[WebApp]) {
    if apps.contains(&WebApp::Trivia) {
        cfg.configure(trivia::configure_app);
    }
    if apps.contains(&WebApp::CoffeeShop) {
        cfg.configure(coffee_shop::configure_app);
    }
    if apps.contains(&WebApp::Fyyur) {
        cfg.configure(fyyur::configure_app);
    }
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TrioStore>,
    /// Only present if the coffee shop API is enabled
    token_verifier: Option<TokenVerifier>,
}

impl AppState {
    pub fn new(apps: &[WebApp]) -> Result<Self, CliError> {
        let token_verifier = if apps.contains(&WebApp::CoffeeShop) {
            Some(TokenVerifier::from_env()?)
        } else {
            None
        };
        Ok(Self {
            store: Arc::new(get_store_from_env()?),
            token_verifier,
        })
    }
}

/// Everything required for verifying the bearer tokens of coffee shop API clients
#[derive(Clone)]
pub struct TokenVerifier {
    key_set_source: Arc<dyn KeySetSource>,
    validation: TokenValidation,
}

impl TokenVerifier {
    fn from_env() -> Result<Self, CliError> {
        let auth_domain = get_auth_domain_from_env()?;
        let audience = get_api_audience_from_env()?;
        let key_set_source = HttpKeySetSource::for_auth_domain(&auth_domain)
            .map_err(|e| CliError::SetupError(format!("Could not create HTTP client: {}", e)))?;
        Ok(Self {
            key_set_source: Arc::new(key_set_source),
            validation: TokenValidation::for_auth_domain(&auth_domain, audience),
        })
    }
}
