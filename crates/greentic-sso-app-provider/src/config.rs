use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use greentic_sso_app_core::BetaMapping;
use serde::Deserialize;
use url::Url;

use crate::{
    api::{ClientHandle, Credentials},
    error::ApiError,
    live::{DEFAULT_API_URL, DEFAULT_TIMEOUT, LiveApplicationsClient},
};

pub const ENV_API_KEY: &str = "JUMPCLOUD_API_KEY";
pub const ENV_ORG_ID: &str = "JUMPCLOUD_ORG_ID";
pub const ENV_API_URL: &str = "JUMPCLOUD_URL";
pub const ENV_TIMEOUT_SECS: &str = "JUMPCLOUD_TIMEOUT_SECS";
pub const ENV_BETA_MAPPING: &str = "JUMPCLOUD_BETA_MAPPING";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting `{key}` (set {env})")]
    Missing {
        key: &'static str,
        env: &'static str,
    },
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// One source of provider settings. Later layers override earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub api_url: Option<String>,
    pub org_id: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub beta_mapping: Option<BetaMapping>,
}

impl ConfigLayer {
    /// Loads a TOML file, or JSON when the extension is `.json`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).map_err(|err| err.to_string()),
            _ => toml::from_str(&contents).map_err(|err| err.to_string()),
        };
        parsed.map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the `JUMPCLOUD_*` variables through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let timeout_secs = get(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.parse::<u64>().map_err(|err| ConfigError::Invalid {
                    key: "timeout_secs",
                    reason: format!("{raw}: {err}"),
                })
            })
            .transpose()?;
        let beta_mapping = get(ENV_BETA_MAPPING)
            .map(|raw| {
                raw.parse::<BetaMapping>().map_err(|err| ConfigError::Invalid {
                    key: "beta_mapping",
                    reason: err.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            api_url: get(ENV_API_URL),
            org_id: get(ENV_ORG_ID),
            api_key: get(ENV_API_KEY),
            timeout_secs,
            beta_mapping,
        })
    }

    pub fn merge(self, over: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            api_url: over.api_url.or(self.api_url),
            org_id: over.org_id.or(self.org_id),
            api_key: over.api_key.or(self.api_key),
            timeout_secs: over.timeout_secs.or(self.timeout_secs),
            beta_mapping: over.beta_mapping.or(self.beta_mapping),
        }
    }
}

/// Settings needed to reach the application API.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_url: Url,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub beta_mapping: BetaMapping,
}

impl ProviderConfig {
    pub fn resolve(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let raw_url = layer.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url).map_err(|err| ConfigError::Invalid {
            key: "api_url",
            reason: format!("{raw_url}: {err}"),
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "api_url",
                reason: format!("unsupported scheme `{}`", api_url.scheme()),
            });
        }
        let api_key = layer.api_key.ok_or(ConfigError::Missing {
            key: "api_key",
            env: ENV_API_KEY,
        })?;
        let timeout = match layer.timeout_secs {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    key: "timeout_secs",
                    reason: "must be greater than zero".into(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_url,
            credentials: Credentials::new(layer.org_id.unwrap_or_default(), api_key),
            timeout,
            beta_mapping: layer.beta_mapping.unwrap_or_default(),
        })
    }

    /// Builds the live client handle for these settings.
    pub fn connect(&self) -> Result<ClientHandle, ApiError> {
        let client = LiveApplicationsClient::new(
            &self.api_url,
            self.credentials.clone(),
            self.timeout,
        )?;
        Ok(ClientHandle::from_client(Arc::new(client), self.credentials.clone())
            .with_beta_mapping(self.beta_mapping))
    }
}
