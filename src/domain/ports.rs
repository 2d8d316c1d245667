use crate::domain::model::{AssistantRecord, CreateAssistantRequest, FileMetadata, Page};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// The service assistants are copied from.
#[async_trait]
pub trait SourceApi: Send + Sync {
    fn service_name(&self) -> &str;
    async fn check_connection(&self) -> Result<()>;
    async fn list_assistants(&self, limit: u32, after: Option<&str>)
        -> Result<Page<AssistantRecord>>;
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<AssistantRecord>;
    async fn retrieve_file(&self, file_id: &str) -> Result<FileMetadata>;
    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>>;
}

/// The service assistants are recreated on.
#[async_trait]
pub trait DestinationApi: Send + Sync {
    fn service_name(&self) -> &str;
    async fn check_connection(&self) -> Result<()>;
    async fn list_deployments(&self) -> Result<Vec<String>>;
    async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Result<String>;
    async fn create_assistant(&self, request: &CreateAssistantRequest) -> Result<String>;
}
