use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Source(#[from] config::ConfigError),
    #[error("{0} nicht gesetzt")]
    Missing(&'static str),
    #[error("SUPABASE_URL must start with http:// or https://, got {0:?}")]
    InvalidUrl(String),
}

/// Hauptkonfiguration; wird injiziert, nie im Code hinterlegt
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub supabase_url: String,
    /// Schreibberechtigter Key, nur für `migrate` nötig
    #[serde(default)]
    pub supabase_service_role_key: Option<String>,
    /// Lese-Key für `verify` / `inspect`
    #[serde(default)]
    pub supabase_publishable_key: Option<String>,
    #[serde(default = "default_source_data_path")]
    pub source_data_path: PathBuf,
    #[serde(default)]
    pub schedule_owners_path: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub supabase_timeout_secs: u64,
}

fn default_source_data_path() -> PathBuf {
    PathBuf::from("data/source.json")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Lade Config aus `.env`, optionaler `safeticket.toml` und Environment Variablen
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("safeticket").required(false))
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        Self::from_settings(settings)
    }

    pub fn from_settings(settings: config::Config) -> Result<Self, ConfigError> {
        let mut config: Config = settings.try_deserialize()?;

        config.supabase_url = config.supabase_url.trim().trim_end_matches('/').to_string();
        if config.supabase_url.is_empty() {
            return Err(ConfigError::Missing("SUPABASE_URL"));
        }
        if !config.supabase_url.starts_with("https://") && !config.supabase_url.starts_with("http://")
        {
            return Err(ConfigError::InvalidUrl(config.supabase_url));
        }

        Ok(config)
    }

    pub fn service_role_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.supabase_service_role_key.as_deref())
            .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))
    }

    /// Publishable Key, sonst der Service Role Key
    pub fn read_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.supabase_publishable_key.as_deref())
            .or_else(|| non_empty(self.supabase_service_role_key.as_deref()))
            .ok_or(ConfigError::Missing("SUPABASE_PUBLISHABLE_KEY"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.supabase_timeout_secs)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
