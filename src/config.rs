use crate::services::errors::RelayError;
use secrecy::SecretString;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use url::Url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the relay, read from the environment at startup.
#[derive(Debug)]
pub struct RelayConfig {
    pub tenant_base_url: Url,
    pub api_token: SecretString,
    pub org_group_id: String,
    pub template_id: String,
    pub bind_addr: SocketAddr,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl RelayConfig {
    /// Reads the process environment. `main` loads `.env` beforehand.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            get(key).ok_or_else(|| RelayError::Config(format!("{} must be set", key)))
        };

        let base = required("OT_TENANT_BASE_URL")?;
        let tenant_base_url = Url::parse(&base).map_err(|e| {
            RelayError::Config(format!("OT_TENANT_BASE_URL is not a valid URL: {}", e))
        })?;
        if tenant_base_url.cannot_be_a_base() {
            return Err(RelayError::Config(
                "OT_TENANT_BASE_URL cannot be used as a base URL".to_string(),
            ));
        }

        let api_token = SecretString::from(required("OT_API_TOKEN")?);
        let org_group_id = required("OT_ORG_GROUP_GUID")?;
        let template_id = required("OT_TEMPLATE_GUID")?;

        let host: IpAddr = get("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse()
            .map_err(|e| RelayError::Config(format!("HOST is not an IP address: {}", e)))?;
        let port = match get("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| RelayError::Config(format!("PORT is not a valid port: {}", e)))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("OT_REQUEST_TIMEOUT_SECS") {
            Some(t) => t.parse::<u64>().map_err(|e| {
                RelayError::Config(format!("OT_REQUEST_TIMEOUT_SECS is not a number: {}", e))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(RelayError::Config(
                "OT_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let allowed_origins = parse_origins(get("CORS_ALLOWED_ORIGINS").as_deref());

        Ok(Self {
            tenant_base_url,
            api_token,
            org_group_id,
            template_id,
            bind_addr: SocketAddr::new(host, port),
            allowed_origins,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// "*" anywhere in the list wins
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
