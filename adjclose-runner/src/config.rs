//! Run configuration, assembled once at process start.
//!
//! Nothing below this module reads the environment. The CLI builds a
//! `RunConfig` from its flags plus the secrets in the environment and hands
//! it to the pipeline.

use std::fmt;
use std::path::PathBuf;

use adjclose_core::domain::{TickerError, TickerList};
use adjclose_core::TodayPolicy;
use thiserror::Error;

pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";

pub const DEFAULT_FILE_PREFIX: &str = "Adjusted_Close";
pub const DEFAULT_SMTP_RELAY: &str = "smtp.office365.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("invalid ticker list: {0}")]
    Tickers(#[from] TickerError),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Fetch window and table shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Seven-day fetch, one row per ticker for the prior trading day.
    Daily,
    /// Five-year fetch, date × ticker matrix.
    Historical,
}

/// App-only credentials for the Microsoft identity platform.
#[derive(Clone, PartialEq, Eq)]
pub struct GraphCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for GraphCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl GraphCredentials {
    /// Read all three values; the first absent key is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            tenant_id: require(&lookup, ENV_TENANT_ID)?,
            client_id: require(&lookup, ENV_CLIENT_ID)?,
            client_secret: require(&lookup, ENV_CLIENT_SECRET)?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Whose OneDrive receives the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveOwner {
    /// The identity that owns the token (`/me`).
    Me,
    /// A named user (`/users/{upn}`).
    User(String),
}

impl DriveOwner {
    pub fn path_segment(&self) -> String {
        match self {
            DriveOwner::Me => "me".to_string(),
            DriveOwner::User(upn) => format!("users/{upn}"),
        }
    }
}

/// SMTP submission settings. The password is the only secret.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub from: String,
    pub to: Vec<String>,
    pub password: String,
    pub relay: String,
    pub port: u16,
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("password", &"<redacted>")
            .field("relay", &self.relay)
            .field("port", &self.port)
            .finish()
    }
}

impl EmailSettings {
    pub fn from_lookup<F>(from: String, to: Vec<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if from.trim().is_empty() {
            return Err(ConfigError::Invalid("email sender address is empty".into()));
        }
        if to.is_empty() {
            return Err(ConfigError::Invalid("no email recipients".into()));
        }
        Ok(Self {
            from,
            to,
            password: require(&lookup, ENV_EMAIL_PASSWORD)?,
            relay: DEFAULT_SMTP_RELAY.to_string(),
            port: DEFAULT_SMTP_PORT,
        })
    }
}

/// Where the exported file goes after it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Copy into a folder (possibly a mapped share) and append to `task_log.txt`.
    Local { folder: PathBuf },
    /// Upload through Microsoft Graph.
    Cloud {
        credentials: GraphCredentials,
        owner: DriveOwner,
        folder: String,
    },
    /// Send as an attachment over SMTP.
    Email(EmailSettings),
}

impl DeliveryTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryTarget::Local { .. } => "local",
            DeliveryTarget::Cloud { .. } => "cloud",
            DeliveryTarget::Email(_) => "email",
        }
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: RunMode,
    pub tickers: TickerList,
    pub today_policy: TodayPolicy,
    /// Directory the spreadsheet is written to before delivery.
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub delivery: DeliveryTarget,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("file prefix is empty".into()));
        }
        if self
            .file_prefix
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':'))
        {
            return Err(ConfigError::Invalid(format!(
                "file prefix '{}' contains a path separator",
                self.file_prefix
            )));
        }
        Ok(())
    }
}

/// Read a required value; absent and empty are treated alike.
pub fn require<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(key.to_string())),
    }
}
