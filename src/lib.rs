pub mod adapters;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{
    azure::{AzureDestination, AzureSettings},
    openai::{OpenAiSettings, OpenAiSource},
    storage::ScratchStorage,
};
pub use crate::core::{
    engine::MigrationEngine,
    migrator::{MigrationOptions, Migrator},
};
pub use crate::domain::model::{MigrationMapping, MigrationReport};
pub use crate::domain::services::resolve_destination_model;
pub use crate::utils::error::{MigrateError, Result};
