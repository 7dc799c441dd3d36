use shared::MAX_UPLOAD_BYTES;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::classifier::mock::DEFAULT_DELAY;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub classify_delay: Duration,
    pub classifier_seed: Option<u64>,
    pub classifier_fixed_index: Option<usize>,
    pub catalog_path: Option<PathBuf>,
    pub inference_url: Option<String>,
    pub frontend_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset and blank keys take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let frontend_dir = get("FRONTEND_DIR").unwrap_or_else(|| {
            if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
                format!("{}/../frontend/dist", manifest_dir)
            } else {
                "/usr/src/app/frontend/dist".to_string()
            }
        });

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse(&get, "PORT")?.unwrap_or(8081),
            max_upload_bytes: parse(&get, "MAX_UPLOAD_BYTES")?.unwrap_or(MAX_UPLOAD_BYTES),
            classify_delay: parse(&get, "CLASSIFY_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_DELAY),
            classifier_seed: parse(&get, "CLASSIFIER_SEED")?,
            classifier_fixed_index: parse(&get, "CLASSIFIER_FIXED_INDEX")?,
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
            inference_url: get("INFERENCE_URL"),
            frontend_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
