//! Delivery adapters.
//!
//! One capability, "take this file and deliver it", with three
//! implementations selected per run:
//! - [`LocalFolderDelivery`]: copy into a folder and append to `task_log.txt`
//! - [`GraphUploadDelivery`]: client-credentials token, then a Graph PUT upload
//! - [`EmailDelivery`]: one message with the file attached, over STARTTLS SMTP
//!
//! None of them retry; a failure ends the run.

pub mod email;
pub mod graph;
pub mod local;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::DeliveryTarget;

pub use email::EmailDelivery;
pub use graph::GraphUploadDelivery;
pub use local::LocalFolderDelivery;

/// Errors from delivery. Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact path has no file name: {0}")]
    InvalidArtifact(PathBuf),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned no access_token (HTTP {status}): {body}")]
    TokenRejected { status: u16, body: String },

    #[error("upload failed (HTTP {status}): {body}")]
    UploadFailed { status: u16, body: String },

    #[error("could not build email: {0}")]
    Message(String),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl DeliveryError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DeliveryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The exported file plus the date its content describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryArtifact {
    pub path: PathBuf,
    pub content_date: NaiveDate,
}

impl DeliveryArtifact {
    pub fn new(path: impl Into<PathBuf>, content_date: NaiveDate) -> Self {
        Self {
            path: path.into(),
            content_date,
        }
    }

    pub fn file_name(&self) -> Result<&str, DeliveryError> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DeliveryError::InvalidArtifact(self.path.clone()))
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>, DeliveryError> {
        std::fs::read(&self.path).map_err(|e| DeliveryError::io(&self.path, e))
    }
}

/// Where a delivery ended up, for the confirmation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub location: String,
}

/// Accept a file and deliver it.
pub trait Delivery {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn deliver(&self, artifact: &DeliveryArtifact) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Build the adapter for a configured target.
pub fn build_delivery(target: &DeliveryTarget) -> Result<Box<dyn Delivery>, DeliveryError> {
    Ok(match target {
        DeliveryTarget::Local { folder } => Box::new(LocalFolderDelivery::new(folder.clone())),
        DeliveryTarget::Cloud {
            credentials,
            owner,
            folder,
        } => Box::new(GraphUploadDelivery::new(
            credentials.clone(),
            owner.clone(),
            folder,
        )?),
        DeliveryTarget::Email(settings) => Box::new(EmailDelivery::new(settings.clone())),
    })
}
