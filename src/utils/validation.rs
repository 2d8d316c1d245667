use crate::utils::error::{MigrateError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MigrateError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Collects the names of every unset or blank entry so they can be reported together.
pub fn validate_required_fields(fields: &[(&str, Option<&str>)]) -> Result<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MigrateError::MissingConfigError { fields: missing })
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("azure_endpoint", "https://example.openai.azure.com").is_ok());
        assert!(validate_url("azure_endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("azure_endpoint", "").is_err());
        assert!(validate_url("azure_endpoint", "invalid-url").is_err());
        assert!(validate_url("azure_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_required_fields_reports_all_missing() {
        let result = validate_required_fields(&[
            ("OPENAI_API_KEY", None),
            ("AZURE_OPENAI_API_KEY", Some("key")),
            ("AZURE_OPENAI_ENDPOINT", Some("   ")),
        ]);

        match result {
            Err(MigrateError::MissingConfigError { fields }) => {
                assert_eq!(fields, vec!["OPENAI_API_KEY", "AZURE_OPENAI_ENDPOINT"]);
            }
            other => panic!("expected missing config error, got {:?}", other),
        }

        assert!(validate_required_fields(&[("A", Some("a")), ("B", Some("b"))]).is_ok());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("page_limit", 100, 1, 100).is_ok());
        assert!(validate_range("page_limit", 0, 1, 100).is_err());
        assert!(validate_range("page_limit", 101, 1, 100).is_err());
    }
}
