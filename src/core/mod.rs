pub mod engine;
pub mod migrator;

pub use crate::domain::model::{AssistantDetails, AssistantRecord, MigrationMapping, MigrationReport};
pub use crate::domain::ports::{DestinationApi, SourceApi, Storage};
pub use crate::utils::error::Result;
