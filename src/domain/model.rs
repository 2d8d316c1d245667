use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An assistant as returned by the source service. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    pub model: String,
    /// Tool definitions are carried as opaque JSON and forwarded verbatim.
    #[serde(default)]
    pub tools: Vec<serde_json::Value>,
    #[serde(default)]
    pub file_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolResources {
    #[serde(default)]
    pub code_interpreter: Option<CodeInterpreterResources>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CodeInterpreterResources {
    #[serde(default)]
    pub file_ids: Vec<String>,
}

impl AssistantRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Every attached file id, legacy `file_ids` first, without duplicates.
    pub fn attached_file_ids(&self) -> Vec<String> {
        let nested = self
            .tool_resources
            .as_ref()
            .and_then(|r| r.code_interpreter.as_ref())
            .map(|c| c.file_ids.as_slice())
            .unwrap_or_default();

        let mut ids: Vec<String> = Vec::new();
        for id in self.file_ids.iter().chain(nested) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Cursor for the following page, if the service reported one.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.last_id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub purpose: Option<String>,
}

/// A source file materialized in scratch storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub id: String,
    pub filename: String,
    pub storage_key: String,
}

#[derive(Debug, Clone)]
pub struct AssistantDetails {
    pub record: AssistantRecord,
    pub files: Vec<FileReference>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateAssistantRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub tools: Vec<serde_json::Value>,
    pub file_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedObject {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub id: String,
}

/// Source id to destination id pairs in the order they were migrated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationMapping {
    entries: Vec<(String, String)>,
}

impl MigrationMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source_id: impl Into<String>, destination_id: impl Into<String>) {
        self.entries.push((source_id.into(), destination_id.into()));
    }

    pub fn get(&self, source_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(src, _)| src == source_id)
            .map(|(_, dst)| dst.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub mapping: MigrationMapping,
    pub failed: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl MigrationReport {
    pub fn attempted(&self) -> usize {
        self.mapping.len() + self.failed.len()
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Migration summary:")?;
        for (source_id, destination_id) in self.mapping.iter() {
            writeln!(f, "- {} → {}", source_id, destination_id)?;
        }
        if !self.failed.is_empty() {
            writeln!(f, "Failed to migrate {} assistants:", self.failed.len())?;
            for source_id in &self.failed {
                writeln!(f, "- {}", source_id)?;
            }
        }
        write!(f, "Successfully migrated {} assistants", self.mapping.len())
    }
}

/// Dry-run preview of what a migration would do for one assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMigration {
    pub source_id: String,
    pub name: Option<String>,
    pub source_model: String,
    pub destination_model: Option<String>,
    pub file_count: usize,
}
