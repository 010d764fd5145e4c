//! Environment-driven gateway settings.
//!
//! Values are read through [`mockable::Env`] so parsing can be tested without
//! touching the process environment. Invalid values abort startup; absent
//! values fall back to documented defaults.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use mockable::Env;
use tracing::warn;
use url::Url;
use zeroize::Zeroize;

use crate::domain::RpcDeadline;

const IDENTITY_URL_ENV: &str = "IDENTITY_SERVICE_URL";
const IDENTITY_URL_ALIAS_ENV: &str = "SSO_HTTP_URL";
const BACKEND_ADDR_ENV: &str = "BACKEND_GRPC_ADDR";
const RPC_TIMEOUT_ENV: &str = "RPC_TIMEOUT_MS";
const HTTP_HOST_ENV: &str = "HTTP_HOST";
const HTTP_PORT_ENV: &str = "HTTP_PORT";
const SWAGGER_ENV: &str = "SWAGGER_ENABLED";
const ORIGINS_ENV: &str = "ALLOWED_CORS_ORIGINS";
const ORIGINS_ALIAS_ENV: &str = "ALLOWED_ORIGINS";
const PUBLIC_URL_ENV: &str = "PUBLIC_URL";
const SWAGGER_USER_ENV: &str = "SWAGGER_USER";
const SWAGGER_PASSWORD_ENV: &str = "SWAGGER_PASSWORD";

/// Origin entry that admits every browser origin.
pub const ANY_ORIGIN: &str = "*";

const DEFAULT_BACKEND_ADDR: &str = "http://127.0.0.1:50051";
const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8080;

const URL_EXPECTED: &str = "absolute http(s) URL";
const MILLIS_EXPECTED: &str = "non-negative integer milliseconds";
const HOST_EXPECTED: &str = "IP address";
const PORT_EXPECTED: &str = "port number 1-65535";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const ORIGIN_EXPECTED: &str = "comma-separated http(s) origins or *";
const CREDENTIALS_EXPECTED: &str = "both SWAGGER_USER and SWAGGER_PASSWORD";

/// Errors raised while reading gateway settings.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// A required variable is unset or blank.
    #[error("{name} must be set")]
    Missing { name: &'static str },
}

/// Basic-auth credentials guarding the API docs.
///
/// `Debug` output omits the password and the password is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DocsCredentials {
    user: String,
    password: String,
}

impl DocsCredentials {
    /// Pair a user name with its password.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Whether `user` and `password` match these credentials.
    #[must_use]
    pub fn matches(&self, user: &str, password: &str) -> bool {
        self.user == user && self.password == password
    }
}

impl std::fmt::Debug for DocsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsCredentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Drop for DocsCredentials {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Base URL of the identity service; `None` makes every protected
    /// request fail with `502`.
    pub identity_url: Option<Url>,
    /// gRPC endpoint of the semantic backend.
    pub backend_addr: String,
    /// Per-call deadline for outbound calls.
    pub rpc_deadline: RpcDeadline,
    /// Socket the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Whether Swagger UI and the OpenAPI document are served.
    pub swagger_enabled: bool,
    /// Browser origins admitted by the CORS policy, normalised to
    /// `scheme://host[:port]`, or [`ANY_ORIGIN`].
    pub allowed_origins: Vec<String>,
    /// Public base URL advertised as the OpenAPI server.
    pub public_url: Option<Url>,
    /// Credentials guarding the docs; `None` leaves them open.
    pub docs_credentials: Option<DocsCredentials>,
}

impl GatewaySettings {
    /// Read settings from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayConfigError::InvalidEnv`] for the first variable whose
    /// value cannot be parsed, and [`GatewayConfigError::Missing`] when no
    /// CORS origin is configured.
    ///
    /// # Examples
    /// ```
    /// use mockable::MockEnv;
    /// use gateway::config::GatewaySettings;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "IDENTITY_SERVICE_URL" => Some("http://sso:8080".to_owned()),
    ///     "HTTP_PORT" => Some("9000".to_owned()),
    ///     "ALLOWED_CORS_ORIGINS" => Some("https://app.example, http://localhost:3000".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let settings = GatewaySettings::from_env(&env).expect("valid settings");
    /// assert_eq!(settings.bind_addr.port(), 9000);
    /// assert!(settings.swagger_enabled);
    /// assert_eq!(settings.allowed_origins.len(), 2);
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Result<Self, GatewayConfigError> {
        let identity_url = identity_url_from_env(env)?;
        let backend_addr = non_blank(env, BACKEND_ADDR_ENV)
            .unwrap_or_else(|| DEFAULT_BACKEND_ADDR.to_owned());
        let rpc_deadline = rpc_deadline_from_env(env)?;
        let bind_addr = bind_addr_from_env(env)?;
        let swagger_enabled = match non_blank(env, SWAGGER_ENV) {
            Some(value) => parse_bool(&value).ok_or(GatewayConfigError::InvalidEnv {
                name: SWAGGER_ENV,
                value,
                expected: BOOL_EXPECTED,
            })?,
            None => true,
        };
        let allowed_origins = allowed_origins_from_env(env)?;
        let public_url = public_url_from_env(env)?;
        let docs_credentials = docs_credentials_from_env(env)?;

        if identity_url.is_none() {
            warn!("IDENTITY_SERVICE_URL not set; protected routes will answer 502");
        }

        Ok(Self {
            identity_url,
            backend_addr,
            rpc_deadline,
            bind_addr,
            swagger_enabled,
            allowed_origins,
            public_url,
            docs_credentials,
        })
    }

    /// Timeout for identity validation calls: the RPC deadline when one is
    /// set, otherwise `fallback`.
    #[must_use]
    pub fn identity_timeout(&self, fallback: Duration) -> Duration {
        self.rpc_deadline.duration().unwrap_or(fallback)
    }
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn identity_url_from_env<E: Env>(env: &E) -> Result<Option<Url>, GatewayConfigError> {
    let (name, value) = match non_blank(env, IDENTITY_URL_ENV) {
        Some(value) => (IDENTITY_URL_ENV, value),
        None => match non_blank(env, IDENTITY_URL_ALIAS_ENV) {
            Some(value) => (IDENTITY_URL_ALIAS_ENV, value),
            None => return Ok(None),
        },
    };
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Some(url)),
        _ => Err(GatewayConfigError::InvalidEnv {
            name,
            value,
            expected: URL_EXPECTED,
        }),
    }
}

fn parse_http_url(value: &str) -> Option<Url> {
    Url::parse(value)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn allowed_origins_from_env<E: Env>(env: &E) -> Result<Vec<String>, GatewayConfigError> {
    let (name, value) = match non_blank(env, ORIGINS_ENV) {
        Some(value) => (ORIGINS_ENV, value),
        None => match non_blank(env, ORIGINS_ALIAS_ENV) {
            Some(value) => (ORIGINS_ALIAS_ENV, value),
            None => return Err(GatewayConfigError::Missing { name: ORIGINS_ENV }),
        },
    };
    let mut origins = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let origin = if entry == ANY_ORIGIN {
            ANY_ORIGIN.to_owned()
        } else {
            parse_http_url(entry)
                .map(|url| url.origin().ascii_serialization())
                .ok_or_else(|| GatewayConfigError::InvalidEnv {
                    name,
                    value: value.clone(),
                    expected: ORIGIN_EXPECTED,
                })?
        };
        if !origins.contains(&origin) {
            origins.push(origin);
        }
    }
    if origins.is_empty() {
        return Err(GatewayConfigError::Missing { name });
    }
    Ok(origins)
}

fn public_url_from_env<E: Env>(env: &E) -> Result<Option<Url>, GatewayConfigError> {
    let Some(value) = non_blank(env, PUBLIC_URL_ENV) else {
        return Ok(None);
    };
    parse_http_url(&value)
        .map(Some)
        .ok_or(GatewayConfigError::InvalidEnv {
            name: PUBLIC_URL_ENV,
            value,
            expected: URL_EXPECTED,
        })
}

fn docs_credentials_from_env<E: Env>(
    env: &E,
) -> Result<Option<DocsCredentials>, GatewayConfigError> {
    match (non_blank(env, SWAGGER_USER_ENV), non_blank(env, SWAGGER_PASSWORD_ENV)) {
        (Some(user), Some(password)) => Ok(Some(DocsCredentials::new(user, password))),
        (None, None) => Ok(None),
        (Some(user), None) => Err(GatewayConfigError::InvalidEnv {
            name: SWAGGER_USER_ENV,
            value: user,
            expected: CREDENTIALS_EXPECTED,
        }),
        (None, Some(_)) => Err(GatewayConfigError::InvalidEnv {
            name: SWAGGER_PASSWORD_ENV,
            value: "<redacted>".to_owned(),
            expected: CREDENTIALS_EXPECTED,
        }),
    }
}

fn rpc_deadline_from_env<E: Env>(env: &E) -> Result<RpcDeadline, GatewayConfigError> {
    let Some(value) = non_blank(env, RPC_TIMEOUT_ENV) else {
        return Ok(RpcDeadline::unbounded());
    };
    value
        .parse::<u64>()
        .map(RpcDeadline::from_millis)
        .map_err(|_| GatewayConfigError::InvalidEnv {
            name: RPC_TIMEOUT_ENV,
            value,
            expected: MILLIS_EXPECTED,
        })
}

fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, GatewayConfigError> {
    let host = match non_blank(env, HTTP_HOST_ENV) {
        Some(value) => value
            .parse::<IpAddr>()
            .map_err(|_| GatewayConfigError::InvalidEnv {
                name: HTTP_HOST_ENV,
                value,
                expected: HOST_EXPECTED,
            })?,
        None => DEFAULT_HTTP_HOST
            .parse::<IpAddr>()
            .unwrap_or(IpAddr::from([0, 0, 0, 0])),
    };
    let port = match non_blank(env, HTTP_PORT_ENV) {
        Some(value) => value
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or(GatewayConfigError::InvalidEnv {
                name: HTTP_PORT_ENV,
                value,
                expected: PORT_EXPECTED,
            })?,
        None => DEFAULT_HTTP_PORT,
    };
    Ok(SocketAddr::new(host, port))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
