use crate::adapters::http::{header_value, ApiClient};
use crate::domain::model::{AssistantRecord, FileMetadata, ModelList, Page};
use crate::domain::ports::SourceApi;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ASSISTANTS_BETA: &str = "assistants=v1";

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: SecretString,
    pub base_url: String,
    pub assistants_beta: String,
}

#[derive(Serialize)]
struct ListQuery<'a> {
    limit: u32,
    order: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<&'a str>,
}

/// Source side of the migration: the OpenAI Assistants API.
#[derive(Debug, Clone)]
pub struct OpenAiSource {
    api: ApiClient,
}

impl OpenAiSource {
    pub fn new(settings: &OpenAiSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", settings.api_key.expose_secret()))?,
        );
        headers.insert(
            HeaderName::from_static("openai-beta"),
            header_value(&settings.assistants_beta)?,
        );

        let api = ApiClient::new("OpenAI", &settings.base_url, headers, Vec::new())?;
        Ok(Self { api })
    }
}

#[async_trait]
impl SourceApi for OpenAiSource {
    fn service_name(&self) -> &str {
        self.api.service()
    }

    async fn check_connection(&self) -> Result<()> {
        let models: ModelList = self.api.get_json("models").await?;
        tracing::debug!("OpenAI lists {} models", models.data.len());
        Ok(())
    }

    async fn list_assistants(
        &self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<Page<AssistantRecord>> {
        let query = ListQuery {
            limit,
            order: "asc",
            after,
        };
        self.api.get_json_with_query("assistants", &query).await
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<AssistantRecord> {
        self.api
            .get_json(&format!("assistants/{}", assistant_id))
            .await
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<FileMetadata> {
        self.api.get_json(&format!("files/{}", file_id)).await
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        self.api
            .get_bytes(&format!("files/{}/content", file_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MigrateError;
    use httpmock::prelude::*;

    fn source(server: &MockServer) -> OpenAiSource {
        OpenAiSource::new(&OpenAiSettings {
            api_key: SecretString::from("sk-test".to_string()),
            base_url: server.url("/v1"),
            assistants_beta: DEFAULT_ASSISTANTS_BETA.to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_check_connection_sends_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/models")
                .header("authorization", "Bearer sk-test")
                .header("openai-beta", "assistants=v1");
            then.status(200)
                .json_body(serde_json::json!({"object": "list", "data": [{"id": "gpt-4"}]}));
        });

        source(&server).check_connection().await.unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_check_connection_rejected_key() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/models");
            then.status(401)
                .json_body(serde_json::json!({"error": {"message": "Incorrect API key"}}));
        });

        let result = source(&server).check_connection().await;

        assert!(matches!(result, Err(MigrateError::ApiError { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_list_assistants_passes_cursor() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/assistants")
                .query_param("limit", "100")
                .query_param("order", "asc")
                .query_param("after", "asst_2");
            then.status(200).json_body(serde_json::json!({
                "object": "list",
                "data": [
                    {"id": "asst_3", "name": "Helper", "model": "gpt-4", "tools": [], "file_ids": []}
                ],
                "first_id": "asst_3",
                "last_id": "asst_3",
                "has_more": false
            }));
        });

        let page = source(&server)
            .list_assistants(100, Some("asst_2"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "asst_3");
        assert_eq!(page.next_cursor(), None);
    }

    #[tokio::test]
    async fn test_retrieve_assistant_keeps_tools_verbatim() {
        let server = MockServer::start();
        let tool = serde_json::json!({
            "type": "function",
            "function": {"name": "lookup", "parameters": {"type": "object", "properties": {}}}
        });
        server.mock(|when, then| {
            when.method(GET).path("/v1/assistants/asst_1");
            then.status(200).json_body(serde_json::json!({
                "id": "asst_1",
                "object": "assistant",
                "name": "Support",
                "instructions": "Answer tickets",
                "model": "gpt-4-1106-preview",
                "tools": [tool.clone()],
                "file_ids": ["file-1"]
            }));
        });

        let record = source(&server).retrieve_assistant("asst_1").await.unwrap();

        assert_eq!(record.name.as_deref(), Some("Support"));
        assert_eq!(record.tools, vec![tool]);
        assert_eq!(record.attached_file_ids(), vec!["file-1"]);
    }

    #[tokio::test]
    async fn test_file_metadata_and_content() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/files/file-1");
            then.status(200).json_body(serde_json::json!({
                "id": "file-1", "object": "file", "bytes": 5, "filename": "notes.txt",
                "purpose": "assistants"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/v1/files/file-1/content");
            then.status(200).body("hello");
        });

        let source = source(&server);
        let meta = source.retrieve_file("file-1").await.unwrap();
        let bytes = source.download_file("file-1").await.unwrap();

        assert_eq!(meta.filename.as_deref(), Some("notes.txt"));
        assert_eq!(bytes, b"hello");
    }
}
