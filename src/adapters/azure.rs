use crate::adapters::http::{header_value, ApiClient};
use crate::domain::model::{CreateAssistantRequest, CreatedObject, ModelList};
use crate::domain::ports::DestinationApi;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_API_VERSION: &str = "2023-12-01-preview";
const FILE_PURPOSE: &str = "assistants";

#[derive(Debug, Clone)]
pub struct AzureSettings {
    pub api_key: SecretString,
    pub endpoint: String,
    pub api_version: String,
}

/// Destination side of the migration: an Azure OpenAI resource.
#[derive(Debug, Clone)]
pub struct AzureDestination {
    api: ApiClient,
}

impl AzureDestination {
    pub fn new(settings: &AzureSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("api-key"),
            header_value(settings.api_key.expose_secret())?,
        );

        let base_url = format!("{}/openai", settings.endpoint.trim_end_matches('/'));
        let api = ApiClient::new(
            "Azure OpenAI",
            &base_url,
            headers,
            vec![("api-version".to_string(), settings.api_version.clone())],
        )?;
        Ok(Self { api })
    }
}

#[async_trait]
impl DestinationApi for AzureDestination {
    fn service_name(&self) -> &str {
        self.api.service()
    }

    async fn check_connection(&self) -> Result<()> {
        self.list_deployments().await.map(|_| ())
    }

    async fn list_deployments(&self) -> Result<Vec<String>> {
        let models: ModelList = self.api.get_json("models").await?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Result<String> {
        let part = Part::bytes(data).file_name(filename.to_string());
        let form = Form::new().text("purpose", FILE_PURPOSE).part("file", part);

        let created: CreatedObject = self.api.post_multipart("files", form).await?;
        Ok(created.id)
    }

    async fn create_assistant(&self, request: &CreateAssistantRequest) -> Result<String> {
        let created: CreatedObject = self.api.post_json("assistants", request).await?;
        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MigrateError;
    use httpmock::prelude::*;

    const VERSION: &str = "2024-05-01-preview";

    fn destination(server: &MockServer) -> AzureDestination {
        AzureDestination::new(&AzureSettings {
            api_key: SecretString::from("az-key".to_string()),
            endpoint: format!("{}/", server.base_url()),
            api_version: VERSION.to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_deployments() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/openai/models")
                .query_param("api-version", VERSION)
                .header("api-key", "az-key");
            then.status(200).json_body(serde_json::json!({
                "data": [{"id": "gpt-35-turbo"}, {"id": "gpt-4o"}]
            }));
        });

        let deployments = destination(&server).list_deployments().await.unwrap();

        mock.assert();
        assert_eq!(deployments, vec!["gpt-35-turbo", "gpt-4o"]);
    }

    #[tokio::test]
    async fn test_upload_file_as_assistants_purpose() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/openai/files")
                .query_param("api-version", VERSION)
                .body_contains("assistants")
                .body_contains("notes.txt")
                .body_contains("hello world");
            then.status(200)
                .json_body(serde_json::json!({"id": "assistant-file-9", "object": "file"}));
        });

        let id = destination(&server)
            .upload_file("notes.txt", b"hello world".to_vec())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(id, "assistant-file-9");
    }

    #[tokio::test]
    async fn test_create_assistant_payload() {
        let server = MockServer::start();
        let request = CreateAssistantRequest {
            model: "gpt-4o".into(),
            name: Some("Support".into()),
            instructions: Some("Answer tickets".into()),
            tools: vec![serde_json::json!({"type": "retrieval"})],
            file_ids: vec!["assistant-file-9".into()],
        };
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/openai/assistants")
                .query_param("api-version", VERSION)
                .json_body(serde_json::json!({
                    "model": "gpt-4o",
                    "name": "Support",
                    "instructions": "Answer tickets",
                    "tools": [{"type": "retrieval"}],
                    "file_ids": ["assistant-file-9"]
                }));
            then.status(200)
                .json_body(serde_json::json!({"id": "asst_az_1", "object": "assistant"}));
        });

        let id = destination(&server).create_assistant(&request).await.unwrap();

        mock.assert();
        assert_eq!(id, "asst_az_1");
    }

    #[tokio::test]
    async fn test_create_assistant_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/openai/assistants");
            then.status(400).json_body(serde_json::json!({
                "error": {"message": "The model `gpt-5` does not exist", "code": "DeploymentNotFound"}
            }));
        });

        let request = CreateAssistantRequest {
            model: "gpt-5".into(),
            name: None,
            instructions: None,
            tools: vec![],
            file_ids: vec![],
        };
        let result = destination(&server).create_assistant(&request).await;

        assert!(matches!(result, Err(MigrateError::ApiError { status: 400, .. })));
    }
}
