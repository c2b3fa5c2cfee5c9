//! Local or mapped-folder delivery with an append-only run log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Delivery, DeliveryArtifact, DeliveryError, DeliveryReceipt};

pub const LOG_FILE_NAME: &str = "task_log.txt";

/// Copies the artifact into `folder` (a local path or a mounted share) and
/// appends one line per run to `task_log.txt` there.
#[derive(Debug, Clone)]
pub struct LocalFolderDelivery {
    folder: PathBuf,
}

impl LocalFolderDelivery {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.folder.join(LOG_FILE_NAME)
    }

    fn append_log(&self, artifact: &DeliveryArtifact) -> Result<(), DeliveryError> {
        let path = self.log_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| DeliveryError::io(&path, e))?;
        writeln!(file, "{}", log_line(artifact, chrono::Local::now().naive_local()))
            .map_err(|e| DeliveryError::io(&path, e))
    }
}

/// `<timestamp> - Saved adjusted closes for <date>`
pub fn log_line(artifact: &DeliveryArtifact, now: chrono::NaiveDateTime) -> String {
    format!(
        "{} - Saved adjusted closes for {}",
        now.format("%Y-%m-%d %H:%M:%S%.6f"),
        artifact.content_date.format("%Y-%m-%d")
    )
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl Delivery for LocalFolderDelivery {
    fn name(&self) -> &str {
        "local"
    }

    fn deliver(&self, artifact: &DeliveryArtifact) -> Result<DeliveryReceipt, DeliveryError> {
        std::fs::create_dir_all(&self.folder).map_err(|e| DeliveryError::io(&self.folder, e))?;

        let target = self.folder.join(artifact.file_name()?);
        if !same_file(&artifact.path, &target) {
            std::fs::copy(&artifact.path, &target).map_err(|e| DeliveryError::io(&target, e))?;
        }

        self.append_log(artifact)?;
        log::info!("appended run to {}", self.log_path().display());

        Ok(DeliveryReceipt {
            location: target.display().to_string(),
        })
    }
}
