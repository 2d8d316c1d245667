use crate::domain::model::{
    AssistantDetails, AssistantRecord, CreateAssistantRequest, FileReference, MigrationMapping,
    MigrationReport, PlannedMigration,
};
use crate::domain::ports::{DestinationApi, SourceApi, Storage};
use crate::domain::services::{local_filename, resolve_destination_model, storage_key};
use crate::utils::error::{MigrateError, Result};
use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOptions {
    pub page_limit: u32,
    /// Fixed pause between two consecutive assistants.
    pub throttle: Duration,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

/// Lazy walk over every source assistant, one page at a time.
///
/// A failed page request is logged and ends the walk, so a failure on the
/// first page looks like an empty listing. Each id is yielded at most once,
/// and a page with no unseen ids ends the walk.
pub struct AssistantCursor<'a, Src: SourceApi> {
    source: &'a Src,
    limit: u32,
    buffered: VecDeque<AssistantRecord>,
    seen: HashSet<String>,
    after: Option<String>,
    exhausted: bool,
}

impl<'a, Src: SourceApi> AssistantCursor<'a, Src> {
    fn new(source: &'a Src, limit: u32) -> Self {
        Self {
            source,
            limit,
            buffered: VecDeque::new(),
            seen: HashSet::new(),
            after: None,
            exhausted: false,
        }
    }

    pub async fn next(&mut self) -> Option<AssistantRecord> {
        loop {
            if let Some(record) = self.buffered.pop_front() {
                return Some(record);
            }
            if self.exhausted {
                return None;
            }

            let result = self
                .source
                .list_assistants(self.limit, self.after.as_deref())
                .await;
            match result {
                Ok(page) => {
                    let next = page.next_cursor().map(str::to_string);
                    tracing::debug!(
                        "Fetched page of {} assistants (has_more: {})",
                        page.data.len(),
                        page.has_more
                    );
                    let mut unseen = 0;
                    for record in page.data {
                        if self.seen.insert(record.id.clone()) {
                            self.buffered.push_back(record);
                            unseen += 1;
                        } else {
                            tracing::warn!("Assistant {} listed twice, skipping repeat", record.id);
                        }
                    }

                    if next.is_some() && unseen == 0 {
                        tracing::warn!("Listing page held no new assistants, stopping listing");
                        self.exhausted = true;
                    } else {
                        self.exhausted = next.is_none();
                        self.after = next;
                    }
                }
                Err(e) => {
                    tracing::error!("Assistant fetch failed: {}", e);
                    self.exhausted = true;
                }
            }
        }
    }
}

pub struct Migrator<Src: SourceApi, Dst: DestinationApi, St: Storage> {
    source: Src,
    destination: Dst,
    storage: St,
    options: MigrationOptions,
}

impl<Src: SourceApi, Dst: DestinationApi, St: Storage> Migrator<Src, Dst, St> {
    pub fn new(source: Src, destination: Dst, storage: St, options: MigrationOptions) -> Self {
        Self {
            source,
            destination,
            storage,
            options,
        }
    }

    pub async fn check_connections(&self) -> Result<()> {
        let source_name = self.source.service_name().to_string();
        self.source
            .check_connection()
            .await
            .map_err(|e| MigrateError::ConnectionError {
                service: source_name.clone(),
                message: e.to_string(),
            })?;
        tracing::info!("Successfully connected to {} API", source_name);

        let destination_name = self.destination.service_name().to_string();
        self.destination
            .check_connection()
            .await
            .map_err(|e| MigrateError::ConnectionError {
                service: destination_name.clone(),
                message: e.to_string(),
            })?;
        tracing::info!("Successfully connected to {} API", destination_name);

        Ok(())
    }

    pub fn list_source_assistants(&self) -> AssistantCursor<'_, Src> {
        tracing::info!("Fetching assistants from {}...", self.source.service_name());
        AssistantCursor::new(&self.source, self.options.page_limit)
    }

    pub async fn collect_source_assistants(&self) -> Vec<AssistantRecord> {
        let mut cursor = self.list_source_assistants();
        let mut records = Vec::new();
        while let Some(record) = cursor.next().await {
            records.push(record);
        }
        records
    }

    /// Retrieves one assistant and stages its files in scratch storage.
    /// Any failure is logged and yields `None`.
    pub async fn fetch_details(&self, assistant_id: &str) -> Option<AssistantDetails> {
        tracing::info!("Fetching details for assistant {}...", assistant_id);

        let mut staged = Vec::new();
        match self.try_fetch_details(assistant_id, &mut staged).await {
            Ok(record) => Some(AssistantDetails {
                record,
                files: staged,
            }),
            Err(e) => {
                tracing::error!(
                    "Failed to fetch details for assistant {}: {}",
                    assistant_id,
                    e
                );
                self.release_files(&staged).await;
                None
            }
        }
    }

    async fn try_fetch_details(
        &self,
        assistant_id: &str,
        staged: &mut Vec<FileReference>,
    ) -> Result<AssistantRecord> {
        let record = self.source.retrieve_assistant(assistant_id).await?;

        for file_id in record.attached_file_ids() {
            staged.push(self.download_file(&record.id, &file_id).await?);
        }

        Ok(record)
    }

    async fn download_file(&self, assistant_id: &str, file_id: &str) -> Result<FileReference> {
        tracing::info!(
            "Downloading file {} from {}...",
            file_id,
            self.source.service_name()
        );

        let bytes = self.source.download_file(file_id).await?;
        let meta = self.source.retrieve_file(file_id).await?;
        let filename = local_filename(file_id, meta.filename.as_deref());
        let key = storage_key(assistant_id, file_id, &filename);

        self.storage.write_file(&key, &bytes).await?;
        tracing::debug!("Staged {} bytes as {}", bytes.len(), key);

        Ok(FileReference {
            id: file_id.to_string(),
            filename,
            storage_key: key,
        })
    }

    /// Uploads the staged files and creates the destination assistant.
    /// Any failure is logged and yields `None`.
    pub async fn create_destination_assistant(&self, details: &AssistantDetails) -> Option<String> {
        tracing::info!(
            "Creating assistant '{}' on {}...",
            details.record.display_name(),
            self.destination.service_name()
        );

        let result = self.try_create_destination_assistant(details).await;
        self.release_files(&details.files).await;

        match result {
            Ok(id) => {
                tracing::info!("Created {} assistant {}", self.destination.service_name(), id);
                Some(id)
            }
            Err(e) => {
                tracing::error!(
                    "{} assistant creation failed: {}",
                    self.destination.service_name(),
                    e
                );
                None
            }
        }
    }

    async fn try_create_destination_assistant(&self, details: &AssistantDetails) -> Result<String> {
        let mut file_ids = Vec::with_capacity(details.files.len());
        for file in &details.files {
            tracing::info!(
                "Uploading file {} to {}...",
                file.filename,
                self.destination.service_name()
            );
            let data = self.storage.read_file(&file.storage_key).await?;
            let uploaded = self.destination.upload_file(&file.filename, data).await?;
            tracing::info!("File {} uploaded with ID: {}", file.id, uploaded);
            file_ids.push(uploaded);
        }

        let deployments = self.destination.list_deployments().await?;
        let record = &details.record;
        let model = resolve_destination_model(&record.model, &deployments)?;
        if model != record.model {
            tracing::info!(
                "Using {} deployment '{}' instead of '{}'",
                self.destination.service_name(),
                model,
                record.model
            );
        }

        let request = CreateAssistantRequest {
            model,
            name: record.name.clone(),
            instructions: record.instructions.clone(),
            tools: record.tools.clone(),
            file_ids,
        };

        self.destination.create_assistant(&request).await
    }

    async fn release_files(&self, files: &[FileReference]) {
        for file in files {
            if let Err(e) = self.storage.remove_file(&file.storage_key).await {
                tracing::warn!("Could not remove staged file {}: {}", file.storage_key, e);
            }
        }
    }

    pub async fn migrate_all(&self) -> MigrationMapping {
        self.migrate_all_report().await.mapping
    }

    pub async fn migrate_all_report(&self) -> MigrationReport {
        let started_at = Utc::now();
        let mut mapping = MigrationMapping::new();
        let mut failed = Vec::new();

        let mut cursor = self.list_source_assistants();
        let mut first = true;
        while let Some(assistant) = cursor.next().await {
            if !first && !self.options.throttle.is_zero() {
                tokio::time::sleep(self.options.throttle).await;
            }
            first = false;

            tracing::info!("Migrating assistant: {}", assistant.display_name());

            let Some(details) = self.fetch_details(&assistant.id).await else {
                failed.push(assistant.id);
                continue;
            };

            match self.create_destination_assistant(&details).await {
                Some(destination_id) => {
                    tracing::info!(
                        "✅ Successfully migrated {} → {}",
                        assistant.id,
                        destination_id
                    );
                    mapping.record(assistant.id, destination_id);
                }
                None => {
                    tracing::error!("❌ Failed to migrate assistant {}", assistant.id);
                    failed.push(assistant.id);
                }
            }
        }

        MigrationReport {
            mapping,
            failed,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Lists what would be migrated without touching files or creating anything.
    pub async fn plan_all(&self) -> Vec<PlannedMigration> {
        let deployments = match self.destination.list_deployments().await {
            Ok(deployments) => deployments,
            Err(e) => {
                tracing::error!(
                    "Could not list {} deployments: {}",
                    self.destination.service_name(),
                    e
                );
                Vec::new()
            }
        };

        let mut plan = Vec::new();
        let mut cursor = self.list_source_assistants();
        while let Some(record) = cursor.next().await {
            let destination_model = resolve_destination_model(&record.model, &deployments).ok();
            plan.push(PlannedMigration {
                file_count: record.attached_file_ids().len(),
                source_id: record.id,
                name: record.name,
                source_model: record.model,
                destination_model,
            });
        }
        plan
    }
}
