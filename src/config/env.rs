//! Environment loading for `CaptureConfig`
//!
//! Required:
//! - `SUPABASE_URL`, `SUPABASE_SERVICE_KEY`, `BUCKET_NAME`
//!
//! Optional overrides:
//! - `VIZCAPTURE_QUERY`, `VIZCAPTURE_MIN_FAVORITES`, `VIZCAPTURE_START_PAGE`,
//!   `VIZCAPTURE_END_PAGE`, `VIZCAPTURE_HEADLESS`, `VIZCAPTURE_STAGING_DIR`

use std::str::FromStr;

use super::error::ConfigError;
use super::types::CaptureConfig;

pub const ENV_STORAGE_URL: &str = "SUPABASE_URL";
pub const ENV_SERVICE_KEY: &str = "SUPABASE_SERVICE_KEY";
pub const ENV_BUCKET: &str = "BUCKET_NAME";
pub const ENV_QUERY: &str = "VIZCAPTURE_QUERY";
pub const ENV_MIN_FAVORITES: &str = "VIZCAPTURE_MIN_FAVORITES";
pub const ENV_START_PAGE: &str = "VIZCAPTURE_START_PAGE";
pub const ENV_END_PAGE: &str = "VIZCAPTURE_END_PAGE";
pub const ENV_HEADLESS: &str = "VIZCAPTURE_HEADLESS";
pub const ENV_STAGING_DIR: &str = "VIZCAPTURE_STAGING_DIR";

impl CaptureConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));

        let mut builder = CaptureConfig::builder()
            .storage(require(ENV_STORAGE_URL)?, require(ENV_SERVICE_KEY)?)
            .bucket(require(ENV_BUCKET)?);

        if let Some(query) = get(ENV_QUERY) {
            builder = builder.search_query(query);
        }

        if let Some(min) = parse_var::<u32>(ENV_MIN_FAVORITES, get(ENV_MIN_FAVORITES))? {
            builder = builder.min_favorites(min);
        }

        let start = parse_var::<u32>(ENV_START_PAGE, get(ENV_START_PAGE))?;
        let end = parse_var::<u32>(ENV_END_PAGE, get(ENV_END_PAGE))?;
        if start.is_some() || end.is_some() {
            let defaults = CaptureConfig::builder();
            builder = builder.pages(
                start.unwrap_or(defaults.start_page),
                end.unwrap_or(defaults.end_page),
            );
        }

        if let Some(raw) = get(ENV_HEADLESS) {
            builder = builder.headless(parse_flag(ENV_HEADLESS, &raw)?);
        }

        if let Some(dir) = get(ENV_STAGING_DIR) {
            builder = builder.staging_dir(dir);
        }

        builder.build()
    }
}

fn parse_var<T>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| {
        value.trim().parse::<T>().map_err(|e| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
            value,
        })
    })
    .transpose()
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            var,
            value: raw.to_string(),
            reason: "expected true/false".into(),
        }),
    }
}
