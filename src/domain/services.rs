use crate::utils::error::{MigrateError, Result};
use std::path::Path;

/// Substring that marks the preferred fallback family on the destination.
pub const PREFERRED_MODEL_FAMILY: &str = "gpt-4";

/// Picks the destination model for `requested`.
///
/// An exact match wins; otherwise the first deployment whose id contains
/// [`PREFERRED_MODEL_FAMILY`]; otherwise the first deployment.
pub fn resolve_destination_model(requested: &str, available: &[String]) -> Result<String> {
    if available.iter().any(|id| id == requested) {
        return Ok(requested.to_string());
    }

    available
        .iter()
        .find(|id| id.contains(PREFERRED_MODEL_FAMILY))
        .or_else(|| available.first())
        .cloned()
        .ok_or(MigrateError::NoDestinationModel)
}

/// Filename to use locally and on upload. Directory components are stripped.
pub fn local_filename(file_id: &str, remote_name: Option<&str>) -> String {
    remote_name
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.bin", file_id))
}

pub fn storage_key(assistant_id: &str, file_id: &str, filename: &str) -> String {
    format!("{}/{}-{}", assistant_id, file_id, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_exact_match_wins() {
        let model = resolve_destination_model("gpt-4", &ids(&["gpt-4", "gpt-3.5"])).unwrap();
        assert_eq!(model, "gpt-4");

        let model = resolve_destination_model("gpt-35", &ids(&["gpt-4o", "gpt-35"])).unwrap();
        assert_eq!(model, "gpt-35");
    }

    #[test]
    fn test_substring_fallback() {
        let model =
            resolve_destination_model("gpt-5-preview", &ids(&["gpt-3.5", "gpt-4-turbo"])).unwrap();
        assert_eq!(model, "gpt-4-turbo");
    }

    #[test]
    fn test_first_deployment_fallback() {
        let model = resolve_destination_model("o1", &ids(&["mistral", "llama"])).unwrap();
        assert_eq!(model, "mistral");
    }

    #[test]
    fn test_no_deployments() {
        let result = resolve_destination_model("x", &[]);
        assert!(matches!(result, Err(MigrateError::NoDestinationModel)));
    }

    #[test]
    fn test_local_filename() {
        assert_eq!(local_filename("file-1", Some("notes.pdf")), "notes.pdf");
        assert_eq!(local_filename("file-1", Some("../../etc/passwd")), "passwd");
        assert_eq!(local_filename("file-1", Some("")), "file-1.bin");
        assert_eq!(local_filename("file-1", None), "file-1.bin");
        assert_eq!(
            storage_key("asst_1", "file-1", "notes.pdf"),
            "asst_1/file-1-notes.pdf"
        );
    }
}
