use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use fieldgate_core::AppError;
use fieldgate_domain::{DEFAULT_MAX_DEPTH, TraversalConfig};
use fieldgate_infrastructure::HttpPermissionAuthorityConfig;
use tracing_subscriber::EnvFilter;
use url::Url;


const DEFAULT_API_PORT: u16 = 3002;
const DEFAULT_AUTHORITY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_AUTHORITY_MAX_ATTEMPTS: u8 = 3;
const DEFAULT_AUTHORITY_RETRY_BACKOFF_MS: u64 = 200;
const DEFAULT_SCHEMA_SNAPSHOT_TIMEOUT_MS: u64 = 10_000;

/// Where the schema snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSourceConfig {
    File(PathBuf),
    Url { url: Url, timeout: Duration },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub schema_source: SchemaSourceConfig,
    pub traversal: TraversalConfig,
    pub warm_up_entities: Vec<String>,
    pub permission_authority: Option<HttpPermissionAuthorityConfig>,
    pub database_url: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_host = value("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_or(value("API_PORT"), "API_PORT", DEFAULT_API_PORT)?;
        let cors_allowed_origin = value("CORS_ALLOWED_ORIGIN");

        let schema_source = match (value("SCHEMA_SNAPSHOT_PATH"), value("SCHEMA_SNAPSHOT_URL")) {
            (Some(path), None) => SchemaSourceConfig::File(PathBuf::from(path)),
            (None, Some(url)) => SchemaSourceConfig::Url {
                url: parse_url(&url, "SCHEMA_SNAPSHOT_URL")?,
                timeout: Duration::from_millis(parse_or(
                    value("SCHEMA_SNAPSHOT_TIMEOUT_MS"),
                    "SCHEMA_SNAPSHOT_TIMEOUT_MS",
                    DEFAULT_SCHEMA_SNAPSHOT_TIMEOUT_MS,
                )?),
            },
            (Some(_), Some(_)) => {
                return Err(AppError::Configuration(
                    "set only one of SCHEMA_SNAPSHOT_PATH and SCHEMA_SNAPSHOT_URL".to_owned(),
                ));
            }
            (None, None) => {
                return Err(AppError::Configuration(
                    "SCHEMA_SNAPSHOT_PATH or SCHEMA_SNAPSHOT_URL is required".to_owned(),
                ));
            }
        };

        let traversal = TraversalConfig::new(
            parse_or(
                value("TRAVERSAL_MAX_DEPTH"),
                "TRAVERSAL_MAX_DEPTH",
                DEFAULT_MAX_DEPTH,
            )?,
            split_list(value("TRAVERSAL_ALLOWED_TYPES")),
            parse_flag(value("TRAVERSAL_DEBUG"), "TRAVERSAL_DEBUG")?,
        )
        .map_err(|error| AppError::Configuration(format!("invalid traversal settings: {error}")))?;

        let warm_up_entities = split_list(value("WARM_UP_ENTITIES"));

        let permission_authority = value("PERMISSION_AUTHORITY_URL")
            .map(|base_url| {
                Ok::<_, AppError>(HttpPermissionAuthorityConfig {
                    base_url: parse_url(&base_url, "PERMISSION_AUTHORITY_URL")?,
                    timeout: Duration::from_millis(parse_or(
                        value("PERMISSION_AUTHORITY_TIMEOUT_MS"),
                        "PERMISSION_AUTHORITY_TIMEOUT_MS",
                        DEFAULT_AUTHORITY_TIMEOUT_MS,
                    )?),
                    max_attempts: parse_or(
                        value("PERMISSION_AUTHORITY_MAX_ATTEMPTS"),
                        "PERMISSION_AUTHORITY_MAX_ATTEMPTS",
                        DEFAULT_AUTHORITY_MAX_ATTEMPTS,
                    )?,
                    retry_backoff_ms: parse_or(
                        value("PERMISSION_AUTHORITY_RETRY_BACKOFF_MS"),
                        "PERMISSION_AUTHORITY_RETRY_BACKOFF_MS",
                        DEFAULT_AUTHORITY_RETRY_BACKOFF_MS,
                    )?,
                })
            })
            .transpose()?;
        let database_url = value("DATABASE_URL");

        if permission_authority.is_none() && database_url.is_none() {
            return Err(AppError::Configuration(
                "PERMISSION_AUTHORITY_URL or DATABASE_URL is required".to_owned(),
            ));
        }

        Ok(Self {
            api_host,
            api_port,
            cors_allowed_origin,
            schema_source,
            traversal,
            warm_up_entities,
            permission_authority,
            database_url,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Configuration(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|error| AppError::Configuration(format!("invalid {name} '{value}': {error}")))
    })
}

fn parse_flag(value: Option<String>, name: &str) -> Result<bool, AppError> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("false" | "0" | "no") => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some(other) => Err(AppError::Configuration(format!(
            "{name} must be 'true' or 'false', got '{other}'"
        ))),
    }
}

fn parse_url(value: &str, name: &str) -> Result<Url, AppError> {
    Url::parse(value)
        .map_err(|error| AppError::Configuration(format!("invalid {name} '{value}': {error}")))
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
