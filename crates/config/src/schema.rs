use qrisgate_types::{ProviderId, QrisError};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "QRISGATE_";

fn default_timeout_secs() -> u64 {
    20
}

fn default_level() -> String {
    "info".to_string()
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset (defaults to `info`).
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Credentials for the BNI QRIS API.
#[derive(Debug, Clone, Deserialize)]
pub struct BniConfig {
    /// Base URL, e.g. `https://mom-trxauth.spesandbox.com`.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub client_id: String,
    pub client_secret: SecretString,
    /// Key for the `X-Signature` HMAC.
    pub hmac_key: SecretString,
    pub merchant_id: String,
    pub terminal_id: String,
    /// IANA zone for `qr_expired` wall times. Local time when unset.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl BniConfig {
    /// Parse the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns [`QrisError::Config`] for a name unknown to the tz database.
    pub fn timezone(&self) -> Result<Option<chrono_tz::Tz>, QrisError> {
        parse_timezone("bni", self.timezone.as_deref())
    }
}

/// Credentials for the BRI SNAP QR MPM Dynamic API.
#[derive(Debug, Clone, Deserialize)]
pub struct BriMpmConfig {
    /// Base URL, e.g. `https://sandbox.partner.api.bri.co.id`.
    pub host: String,
    pub client_id: String,
    /// Also the HMAC key for transaction signatures.
    pub client_secret: SecretString,
    pub partner_id: String,
    /// PEM file holding the RSA private key registered with the bank.
    #[serde(default)]
    pub private_key_path: Option<PathBuf>,
    /// Inline PEM alternative to `private_key_path`.
    #[serde(default)]
    pub private_key_pem: Option<SecretString>,
    pub merchant_id: String,
    pub terminal_id: String,
    pub channel_id: String,
    /// IANA zone for `X-TIMESTAMP`, e.g. `Asia/Jakarta`. Local time when unset.
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Where the RSA private key comes from.
#[derive(Debug, Clone)]
pub enum PrivateKeySource {
    Path(PathBuf),
    Pem(SecretString),
}

impl BriMpmConfig {
    /// Resolve the configured key material; inline PEM wins over a path.
    ///
    /// # Errors
    ///
    /// Returns [`QrisError::Config`] if neither field is set.
    pub fn private_key(&self) -> Result<PrivateKeySource, QrisError> {
        if let Some(pem) = &self.private_key_pem {
            return Ok(PrivateKeySource::Pem(pem.clone()));
        }
        self.private_key_path
            .clone()
            .map(PrivateKeySource::Path)
            .ok_or_else(|| {
                QrisError::Config(
                    "bri_mpm: one of private_key_path or private_key_pem is required".into(),
                )
            })
    }

    /// Parse the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns [`QrisError::Config`] for a name unknown to the tz database.
    pub fn timezone(&self) -> Result<Option<chrono_tz::Tz>, QrisError> {
        parse_timezone("bri_mpm", self.timezone.as_deref())
    }
}

fn parse_timezone(section: &str, name: Option<&str>) -> Result<Option<chrono_tz::Tz>, QrisError> {
    match name.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name
            .parse::<chrono_tz::Tz>()
            .map(Some)
            .map_err(|e| QrisError::Config(format!("{section}: invalid timezone {name:?}: {e}"))),
    }
}

/// Values merged underneath every file and environment layer.
#[derive(Serialize)]
struct Defaults {
    timeout_secs: u64,
    log: LogConfig,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            log: LogConfig::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Hard per-call HTTP timeout in seconds (defaults to 20).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub bni: Option<BniConfig>,
    #[serde(default)]
    pub bri_mpm: Option<BriMpmConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            log: LogConfig::default(),
            bni: None,
            bri_mpm: None,
        }
    }
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Defaults::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Defaults::default()))
            .merge(Yaml::file(path))
            .extract()
    }

    /// Loads defaults, then the optional YAML file, then `QRISGATE_*`
    /// environment variables (`__` separates nested keys, e.g.
    /// `QRISGATE_BNI__HOST`).
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if any layer fails to parse or the merged
    /// result does not match the schema.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Defaults::default()));
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading configuration file");
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Returns `true` if credentials for `provider` are present.
    #[must_use]
    pub fn is_configured(&self, provider: ProviderId) -> bool {
        match provider {
            ProviderId::Bni => self.bni.is_some(),
            ProviderId::BriMpmDynamic => self.bri_mpm.is_some(),
        }
    }
}
