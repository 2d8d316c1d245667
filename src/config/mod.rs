use crate::adapters::azure::{AzureSettings, DEFAULT_API_VERSION};
use crate::adapters::openai::{OpenAiSettings, DEFAULT_ASSISTANTS_BETA, DEFAULT_BASE_URL};
use crate::core::migrator::{MigrationOptions, DEFAULT_PAGE_LIMIT};
use crate::utils::error::{MigrateError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_fields, validate_url, Validate,
};
use clap::Parser;
use secrecy::SecretString;
use std::time::Duration;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const AZURE_OPENAI_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const AZURE_OPENAI_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";

#[derive(Clone, Parser)]
#[command(name = "assistant-migrate")]
#[command(about = "Copy OpenAI assistants, with their files, to Azure OpenAI")]
pub struct CliConfig {
    #[arg(long, env = OPENAI_API_KEY, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = AZURE_OPENAI_API_KEY, hide_env_values = true)]
    pub azure_api_key: Option<String>,

    #[arg(long, env = AZURE_OPENAI_ENDPOINT)]
    pub azure_endpoint: Option<String>,

    #[arg(long, env = "AZURE_OPENAI_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub azure_api_version: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Value of the OpenAI-Beta header sent to the source service
    #[arg(long, env = "OPENAI_ASSISTANTS_BETA", default_value = DEFAULT_ASSISTANTS_BETA)]
    pub assistants_beta: String,

    /// Assistants requested per listing page
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub page_limit: u32,

    /// Pause between two assistants, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub throttle_ms: u64,

    /// List what would be migrated without uploading or creating anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("CliConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("azure_api_key", &redact(&self.azure_api_key))
            .field("azure_endpoint", &self.azure_endpoint)
            .field("azure_api_version", &self.azure_api_version)
            .field("openai_base_url", &self.openai_base_url)
            .field("assistants_beta", &self.assistants_beta)
            .field("page_limit", &self.page_limit)
            .field("throttle_ms", &self.throttle_ms)
            .field("dry_run", &self.dry_run)
            .field("verbose", &self.verbose)
            .field("monitor", &self.monitor)
            .finish()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_required_fields(&[
            (OPENAI_API_KEY, self.openai_api_key.as_deref()),
            (AZURE_OPENAI_API_KEY, self.azure_api_key.as_deref()),
            (AZURE_OPENAI_ENDPOINT, self.azure_endpoint.as_deref()),
        ])?;

        validate_url("azure_endpoint", self.azure_endpoint.as_deref().unwrap_or_default())?;
        validate_url("openai_base_url", &self.openai_base_url)?;
        validate_non_empty_string("azure_api_version", &self.azure_api_version)?;
        validate_range("page_limit", self.page_limit, 1, 100)?;

        Ok(())
    }
}

impl CliConfig {
    fn required(&self, name: &str, value: &Option<String>) -> Result<String> {
        value
            .clone()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| MigrateError::MissingConfigError {
                fields: vec![name.to_string()],
            })
    }

    pub fn openai_settings(&self) -> Result<OpenAiSettings> {
        Ok(OpenAiSettings {
            api_key: SecretString::from(self.required(OPENAI_API_KEY, &self.openai_api_key)?),
            base_url: self.openai_base_url.clone(),
            assistants_beta: self.assistants_beta.clone(),
        })
    }

    pub fn azure_settings(&self) -> Result<AzureSettings> {
        Ok(AzureSettings {
            api_key: SecretString::from(self.required(AZURE_OPENAI_API_KEY, &self.azure_api_key)?),
            endpoint: self.required(AZURE_OPENAI_ENDPOINT, &self.azure_endpoint)?,
            api_version: self.azure_api_version.clone(),
        })
    }

    pub fn migration_options(&self) -> MigrationOptions {
        MigrationOptions {
            page_limit: self.page_limit,
            throttle: Duration::from_millis(self.throttle_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn config() -> CliConfig {
        CliConfig::try_parse_from([
            "assistant-migrate",
            "--openai-api-key",
            "sk-test",
            "--azure-api-key",
            "az-test",
            "--azure-endpoint",
            "https://example.openai.azure.com",
            "--azure-api-version",
            "2024-05-01-preview",
            "--openai-base-url",
            "https://api.openai.com/v1",
            "--assistants-beta",
            "assistants=v1",
        ])
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_limit, 100);
        assert_eq!(config.migration_options().throttle, Duration::from_secs(1));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_missing_values_are_reported_together() {
        let mut config = config();
        config.openai_api_key = None;
        config.azure_endpoint = Some(String::new());

        match config.validate() {
            Err(MigrateError::MissingConfigError { fields }) => {
                assert_eq!(fields, vec![OPENAI_API_KEY, AZURE_OPENAI_ENDPOINT]);
            }
            other => panic!("expected missing config error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_endpoint_and_page_limit() {
        let mut config = config();
        config.azure_endpoint = Some("example.openai.azure.com".to_string());
        assert!(matches!(
            config.validate(),
            Err(MigrateError::InvalidConfigValueError { .. })
        ));

        let mut config = self::config();
        config.page_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_hold_secrets() {
        let config = config();
        let openai = config.openai_settings().unwrap();
        let azure = config.azure_settings().unwrap();

        assert_eq!(openai.api_key.expose_secret(), "sk-test");
        assert_eq!(azure.api_key.expose_secret(), "az-test");
        assert_eq!(azure.api_version, "2024-05-01-preview");
        assert!(!format!("{:?}", config).contains("sk-test"));
        assert!(!format!("{:?}", openai).contains("sk-test"));
    }
}
