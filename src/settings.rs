use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Google's ID token introspection endpoint
pub const DEFAULT_TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";

/// Environment variable naming a directory with an overriding Settings.toml
pub const SECRETS_DIR_ENV: &str = "EXCHANGE_SECRETS_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExchangeSettings {
    pub application: ApplicationSettings,
    pub verifier: VerifierSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierSettings {
    pub tokeninfo_url: String,

    /// Registered client id of this application; tokens must carry it as `aud`
    pub client_id: Option<String>,

    /// Name of an environment variable overriding `client_id`
    pub client_id_env: Option<String>,

    /// Upper bound for one verification round trip
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: "http://localhost:3000,http://localhost:8080".to_string(),
        }
    }
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            tokeninfo_url: DEFAULT_TOKENINFO_URL.to_string(),
            client_id: None,
            client_id_env: None,
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ExchangeSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A settings file cannot be read or parsed
    /// - The resulting settings fail validation
    pub fn load() -> Result<Self> {
        Self::load_env_file();

        let secrets_dir = std::env::var(SECRETS_DIR_ENV).ok();
        let mut settings =
            Self::load_base_settings(Path::new("Settings.toml"), secrets_dir.as_deref().map(Path::new))?;

        Self::apply_env_overrides(&mut settings);
        settings.validate()?;

        Ok(settings)
    }

    /// Parse a single Settings.toml file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &Path) -> Result<Self> {
        let toml_content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        basic_toml::from_str(&toml_content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Load base settings from TOML file(s) or use defaults
    ///
    /// Priority (highest to lowest), environment variables being applied
    /// afterwards:
    /// 1. Settings.toml in `secrets_dir` (if given and present)
    /// 2. `default_path` (if present)
    /// 3. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if an existing settings file cannot be parsed
    pub fn load_base_settings(default_path: &Path, secrets_dir: Option<&Path>) -> Result<Self> {
        let mut settings = Self::default();

        if default_path.exists() {
            settings = Self::from_file(default_path)?;
            println!("✓ Loaded base settings from {}", default_path.display());
        }

        if let Some(secrets_dir) = secrets_dir {
            let secrets_path = secrets_dir.join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_file(&secrets_path)?;
                println!("✓ Overriding settings from {}", secrets_path.display());
            } else {
                println!(
                    "ℹ {SECRETS_DIR_ENV} set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_verifier_env_overrides(&mut settings.verifier);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    fn apply_verifier_env_overrides(verifier_settings: &mut VerifierSettings) {
        if let Ok(tokeninfo_url) = std::env::var("TOKENINFO_URL") {
            verifier_settings.tokeninfo_url = tokeninfo_url;
        }
        if let Ok(client_id) = std::env::var("CLIENT_ID") {
            verifier_settings.client_id = Some(client_id);
        }
        Self::apply_numeric_env_override(
            "VERIFIER_TIMEOUT_SECONDS",
            &mut verifier_settings.timeout_seconds,
        );
        Self::apply_numeric_env_override(
            "VERIFIER_CONNECT_TIMEOUT_SECONDS",
            &mut verifier_settings.connect_timeout_seconds,
        );
    }

    fn apply_numeric_env_override(env_var: &str, target: &mut u64) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<u64>() {
                *target = value;
            }
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        Self::load_env_file_from(Path::new(".env"));
    }

    /// Load variables from a dotenv file without replacing ones already set
    pub fn load_env_file_from(path: &Path) {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                if line.trim_start().starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    if key.is_empty() || std::env::var(key).is_ok() {
                        continue;
                    }
                    std::env::set_var(key, unquote(value.trim()));
                }
            }
        }
    }

    /// Check the settings are usable for serving exchanges
    ///
    /// # Errors
    ///
    /// Returns an error if no client id is configured, the tokeninfo URL is
    /// not an http(s) URL, or a timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.verifier.get_client_id().is_none() {
            bail!("no client id configured: set verifier.client_id or CLIENT_ID");
        }

        let url = Url::parse(&self.verifier.tokeninfo_url)
            .with_context(|| format!("invalid tokeninfo_url: {}", self.verifier.tokeninfo_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("tokeninfo_url must use http or https, got {}", url.scheme());
        }

        if self.verifier.timeout_seconds == 0 || self.verifier.connect_timeout_seconds == 0 {
            bail!("verifier timeouts must be greater than zero");
        }

        Ok(())
    }

    /// Initialize `env_logger` with the configured level as default filter
    ///
    /// # Errors
    ///
    /// Returns an error if a logger has already been installed
    pub fn init_logging(&self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.logging.level.as_str()),
        )
        .try_init()
        .context("failed to initialize logger")
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get CORS origins as a vector of strings
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Strip one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

impl VerifierSettings {
    /// Get the client ID, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_id(&self) -> Option<String> {
        if let Some(env_var) = &self.client_id_env {
            if let Ok(value) = std::env::var(env_var) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        self.client_id.clone().filter(|id| !id.is_empty())
    }
}
