//! Importer configuration
//!
//! Values are layered:
//! 1. Defaults in code
//! 2. `ndvi-importer.toml` in the working directory, or `--config <path>`
//! 3. Environment variables with the `NDVI_IMPORTER__` prefix
//!
//! Supabase credentials come from `supabase_url`/`supabase_key` when set,
//! otherwise from `NEXT_PUBLIC_SUPABASE_URL`/`NEXT_PUBLIC_SUPABASE_ANON_KEY`
//! (or `SUPABASE_URL`/`SUPABASE_KEY`). A dotenv file is loaded beforehand.

use config::{Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CONFIG_FILE, DEFAULT_ENV_FILES, DEFAULT_TABLE, ENV_PREFIX,
    SUPABASE_KEY_VARS, SUPABASE_URL_VARS,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImporterConfig {
    /// Remote table receiving the rows
    #[validate(length(min = 1))]
    pub table: String,

    /// Records per insert request
    #[validate(range(min = 1))]
    pub chunk_size: usize,

    /// Per-request timeout; requests wait indefinitely when unset
    #[serde(default)]
    #[validate(range(min = 1))]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub supabase_url: Option<String>,

    #[serde(default)]
    pub supabase_key: Option<String>,
}

/// Endpoint and key for the Supabase project
#[derive(Debug, Clone, Validate)]
pub struct SupabaseConfig {
    #[validate(url)]
    pub url: String,

    #[validate(length(min = 1))]
    pub key: String,
}

impl ImporterConfig {
    /// Load configuration from defaults, file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = config::Config::builder()
            .set_default("table", DEFAULT_TABLE)?
            .set_default("chunk_size", DEFAULT_CHUNK_SIZE as i64)?
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut loaded: Self = config.try_deserialize()?;

        if loaded.supabase_url.is_none() {
            loaded.supabase_url = first_env_var(&SUPABASE_URL_VARS);
        }
        if loaded.supabase_key.is_none() {
            loaded.supabase_key = first_env_var(&SUPABASE_KEY_VARS);
        }

        loaded.validate()?;
        Ok(loaded)
    }

    /// Credentials for the remote insert; required only when importing
    pub fn supabase(&self) -> Result<SupabaseConfig> {
        let url = self.supabase_url.clone().ok_or_else(|| {
            ProcessingError::Config(format!(
                "Supabase URL not set (expected one of {})",
                SUPABASE_URL_VARS.join(", ")
            ))
        })?;
        let key = self.supabase_key.clone().ok_or_else(|| {
            ProcessingError::Config(format!(
                "Supabase key not set (expected one of {})",
                SUPABASE_KEY_VARS.join(", ")
            ))
        })?;

        let supabase = SupabaseConfig { url, key };
        supabase.validate()?;
        Ok(supabase)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn first_env_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Load a dotenv file into the process environment.
///
/// An explicit path must exist. Without one, `.env.local` then `.env` are
/// tried. Variables already set are not overridden. Returns the loaded file.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = path {
        dotenvy::from_path(path).map_err(|e| {
            ProcessingError::Config(format!(
                "Failed to load env file {}: {}",
                path.display(),
                e
            ))
        })?;
        return Ok(Some(path.to_path_buf()));
    }

    for candidate in DEFAULT_ENV_FILES {
        let candidate = Path::new(candidate);
        if candidate.is_file() {
            dotenvy::from_path(candidate).map_err(|e| {
                ProcessingError::Config(format!(
                    "Failed to load env file {}: {}",
                    candidate.display(),
                    e
                ))
            })?;
            debug!("Loaded environment from {}", candidate.display());
            return Ok(Some(candidate.to_path_buf()));
        }
    }

    Ok(None)
}
