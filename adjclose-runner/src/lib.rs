//! Adjclose Runner: export, delivery and the end-to-end run pipeline.
//!
//! This crate builds on `adjclose-core` to provide:
//! - Run configuration assembled once from flags and environment secrets
//! - `.xlsx` export of the long (daily) and wide (historical) tables
//! - Delivery to a local folder, a OneDrive folder, or an email inbox
//! - The single linear pipeline that ties them together

pub mod config;
pub mod delivery;
pub mod export;
pub mod pipeline;

pub use config::{
    ConfigError, DeliveryTarget, DriveOwner, EmailSettings, GraphCredentials, RunConfig, RunMode,
};
pub use delivery::{
    build_delivery, Delivery, DeliveryArtifact, DeliveryError, DeliveryReceipt, EmailDelivery,
    GraphUploadDelivery, LocalFolderDelivery,
};
pub use export::{daily_filename, export_long, export_wide, history_filename, save_table};
pub use pipeline::{run_pipeline, RunOutcome};
