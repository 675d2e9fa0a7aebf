use std::env;
use std::env::VarError;
use std::fmt::{Display, Formatter};

/// Get the database URL from the environment variable.
pub fn get_database_url_from_env() -> Result<String, SetupError> {
    env::var("DATABASE_URL").map_err(|e| SetupError::from_env_error(e, "DATABASE_URL"))
}

/// Get the web server TCP listening port from the environment variable
pub fn get_listen_port_from_env() -> Result<u16, SetupError> {
    env::var("LISTEN_PORT")
        .map_err(|e| SetupError::from_env_error(e, "LISTEN_PORT"))
        .and_then(|v| {
            v.parse().map_err(|_| SetupError::EnvVariableInvalid {
                variable_name: "LISTEN_PORT",
                problem: "Not a valid uint16",
            })
        })
}

/// Get the web server TCP listening interface address from the environment variable
pub fn get_listen_address_from_env() -> Result<String, SetupError> {
    env::var("LISTEN_ADDRESS").map_err(|e| SetupError::from_env_error(e, "LISTEN_ADDRESS"))
}

/// Get the domain of the identity provider, which issues the bearer tokens for the coffee shop
/// API, from the environment variable.
///
/// The domain is used for deriving the expected token issuer and the URL of the published JSON
/// Web Key Set.
pub fn get_auth_domain_from_env() -> Result<String, SetupError> {
    let domain =
        env::var("AUTH0_DOMAIN").map_err(|e| SetupError::from_env_error(e, "AUTH0_DOMAIN"))?;
    if domain.is_empty() || domain.contains('/') {
        return Err(SetupError::EnvVariableInvalid {
            variable_name: "AUTH0_DOMAIN",
            problem: "Must be a plain domain name without scheme or path",
        });
    }
    Ok(domain)
}

/// Get the expected audience claim of bearer tokens for the coffee shop API from the environment
/// variable.
pub fn get_api_audience_from_env() -> Result<String, SetupError> {
    env::var("API_AUDIENCE").map_err(|e| SetupError::from_env_error(e, "API_AUDIENCE"))
}

#[derive(Debug)]
pub enum SetupError {
    EnvVariableMissing {
        variable_name: &'static str,
    },
    EnvVariableInvalid {
        variable_name: &'static str,
        problem: &'static str,
    },
}

impl SetupError {
    fn from_env_error(error: VarError, variable_name: &'static str) -> Self {
        match error {
            VarError::NotPresent => Self::EnvVariableMissing { variable_name },
            VarError::NotUnicode(_) => Self::EnvVariableInvalid {
                variable_name,
                problem: "no valid unicode",
            },
        }
    }
}

impl Display for SetupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::EnvVariableMissing { variable_name } => {
                write!(f, "Environment variable {} must be defined", variable_name)
            }
            SetupError::EnvVariableInvalid {
                variable_name,
                problem,
            } => write!(
                f,
                "Value of environment variable {} is invalid: {}",
                variable_name, problem
            ),
        }
    }
}

impl std::error::Error for SetupError {}
