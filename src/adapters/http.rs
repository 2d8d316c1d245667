use crate::utils::error::{MigrateError, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Builds a default header value; the offending value is never echoed back.
pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| MigrateError::InvalidConfigValueError {
        field: "header".to_string(),
        value: "<redacted>".to_string(),
        reason: e.to_string(),
    })
}

/// Thin JSON/bytes client bound to one service's base URL and credentials.
#[derive(Debug, Clone)]
pub struct ApiClient {
    service: String,
    base_url: String,
    default_query: Vec<(String, String)>,
    client: Client,
}

impl ApiClient {
    pub fn new(
        service: impl Into<String>,
        base_url: &str,
        headers: HeaderMap,
        default_query: Vec<(String, String)>,
    ) -> Result<Self> {
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            service: service.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_query,
            client,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let url = self.url(route);
        tracing::debug!("{} Request[{}] {}", self.service, method, url);

        let request = self.client.request(method, url);
        if self.default_query.is_empty() {
            request
        } else {
            request.query(&self.default_query)
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("{} Response {} {}", self.service, status.as_str(), response.url());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => envelope.error.message,
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            Err(_) => body,
        };

        Err(MigrateError::ApiError {
            service: self.service.clone(),
            status: status.as_u16(),
            message,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, route)).await?;
        Ok(response.json().await?)
    }

    pub async fn get_json_with_query<Q, T>(&self, route: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, route).query(query);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    pub async fn get_bytes(&self, route: &str) -> Result<Vec<u8>> {
        let response = self.send(self.request(Method::GET, route)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn post_json<B, T>(&self, route: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, route).json(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, route: &str, form: Form) -> Result<T> {
        let response = self
            .send(self.request(Method::POST, route).multipart(form))
            .await?;
        Ok(response.json().await?)
    }
}
