use crate::domain::ports::Storage;
use crate::utils::error::{MigrateError, Result};
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;

/// Scratch space for downloaded files. The directory is deleted on drop.
#[derive(Debug)]
pub struct ScratchStorage {
    dir: TempDir,
}

impl ScratchStorage {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("assistant-migrate-")
            .tempdir()?;
        tracing::debug!("Scratch directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(MigrateError::processing(format!(
                "Storage key '{}' must be a plain relative path",
                key
            )));
        }
        Ok(self.dir.path().join(relative))
    }
}

impl Storage for ScratchStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path)?;
        Ok(tokio::fs::read(full_path).await?)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        match tokio::fs::remove_file(full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
