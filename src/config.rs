use crate::models::SearchCriteria;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors raised while building the run configuration
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid search criteria: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Missing setting: {0}")]
    Missing(String),
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub criteria: SearchCriteria,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub throttle: ThrottleSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which directory implementation serves search and detail calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Http,
    #[default]
    Simulated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySettings {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    #[serde(default = "default_detail_path")]
    pub detail_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            base_url: String::new(),
            api_key: None,
            search_path: default_search_path(),
            detail_path: default_detail_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_search_path() -> String { "/search_people".to_string() }
fn default_detail_path() -> String { "/get_user_profile_by_username".to_string() }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleSettings {
    #[serde(default = "default_search_interval_ms")]
    pub search_interval_ms: u64,
    #[serde(default = "default_enrichment_interval_ms")]
    pub enrichment_interval_ms: u64,
}

impl ThrottleSettings {
    pub fn search_interval(&self) -> Duration {
        Duration::from_millis(self.search_interval_ms)
    }

    pub fn enrichment_interval(&self) -> Duration {
        Duration::from_millis(self.enrichment_interval_ms)
    }
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            search_interval_ms: default_search_interval_ms(),
            enrichment_interval_ms: default_enrichment_interval_ms(),
        }
    }
}

fn default_search_interval_ms() -> u64 { 2000 }
fn default_enrichment_interval_ms() -> u64 { 1000 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Result pages fetched per dimension; 1 means offset 0 only
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
        }
    }
}

fn default_max_pages() -> u32 { 1 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_results_file")]
    pub results_file: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_validation_results_file")]
    pub validation_results_file: String,
    #[serde(default = "default_validation_log_file")]
    pub validation_log_file: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            results_file: default_results_file(),
            log_file: default_log_file(),
            validation_results_file: default_validation_results_file(),
            validation_log_file: default_validation_log_file(),
        }
    }
}

fn default_results_file() -> String { "job_results.json".to_string() }
fn default_log_file() -> String { "search_log.txt".to_string() }
fn default_validation_results_file() -> String { "validation_results.json".to_string() }
fn default_validation_log_file() -> String { "validation_log.txt".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

const LIST_KEYS: [&str; 5] = [
    "criteria.titles",
    "criteria.industries",
    "criteria.locations",
    "criteria.exclude_locations",
    "criteria.preferred_formats",
];

fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix("SCOUT")
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .try_parsing(true),
        |env, key| env.with_list_parse_key(key),
    )
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. An explicit file, when given
    /// 4. Environment variables (prefixed with SCOUT__)
    ///    e.g., SCOUT__THROTTLE__SEARCH_INTERVAL_MS -> throttle.search_interval_ms
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = apply_env_overrides(builder.add_source(environment()).build()?)?;
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a single file, without the default search paths
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Fail fast on anything that would make the run meaningless
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.criteria.validate()?;

        if self.directory.backend == Backend::Http && self.directory.base_url.trim().is_empty() {
            return Err(SettingsError::Missing(
                "directory.base_url is required for the http backend".to_string(),
            ));
        }
        if self.output.results_file.trim().is_empty() {
            return Err(SettingsError::Missing("output.results_file".to_string()));
        }
        if self.output.log_file.trim().is_empty() {
            return Err(SettingsError::Missing("output.log_file".to_string()));
        }

        Ok(())
    }
}

/// Plain environment variables that take precedence over the prefixed ones
///
/// DIRECTORY_API_KEY and DIRECTORY_BASE_URL are the names deployment
/// tooling usually sets for the credentials.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = env::var("DIRECTORY_API_KEY") {
        builder = builder.set_override("directory.api_key", api_key)?;
    }
    if let Ok(base_url) = env::var("DIRECTORY_BASE_URL") {
        builder = builder.set_override("directory.base_url", base_url)?;
    }

    builder.build()
}
