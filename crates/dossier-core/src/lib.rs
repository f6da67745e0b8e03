//! Core types, configuration, and error handling for the dossier pipeline.
//!
//! This crate provides the shared foundation used by all other dossier crates:
//! - [`DossierError`] — unified error type using `thiserror`
//! - [`DossierConfig`] — configuration loaded from `.dossier.toml`
//! - Shared enums: [`ProjectType`], [`ProjectStatus`], [`ActivityLevel`],
//!   [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{DossierConfig, GithubConfig, IngestConfig, LlmConfig};
pub use error::DossierError;
pub use types::{ActivityLevel, OutputFormat, ProjectStatus, ProjectType};

/// A convenience `Result` type for dossier operations.
pub type Result<T> = std::result::Result<T, DossierError>;
