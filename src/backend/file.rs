//! JSON file backend.
//!
//! The mapping is stored as a single pretty-printed JSON object (`{"code": "target", ...}`).
//! Saves go to a uniquely named sibling temp file which is flushed and then renamed over the
//! destination, so readers see either the previous or the next mapping and never a torn write.

use super::{AliasMap, Backend, BackendError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

/// Backend persisting the mapping to a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend rooted at `path`. The file and its parent directory are created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> BackendError {
        BackendError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "links.json".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl Backend for JsonFileBackend {
    async fn load(&self) -> Result<AliasMap, BackendError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Links file missing; starting empty");
                return Ok(AliasMap::new());
            }
            Err(error) => return Err(self.io_error(error)),
        };

        if contents.trim().is_empty() {
            return Ok(AliasMap::new());
        }

        serde_json::from_str(&contents).map_err(|source| BackendError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, links: &AliasMap) -> Result<(), BackendError> {
        let body = serde_json::to_vec_pretty(links)?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|error| self.io_error(error))?;
        }

        let temp_path = self.temp_path();
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&body).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(error) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "Failed to remove temp file"
                    );
                }
            }
            return Err(self.io_error(error));
        }

        tracing::debug!(path = %self.path.display(), links = links.len(), "Links file written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> AliasMap {
        let mut links = AliasMap::new();
        links.insert("ex1".into(), "https://example.com".into());
        links.insert("docs".into(), "https://docs.rs".into());
        links
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_mapping() {
        let dir = tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("absent.json"));
        assert!(backend.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_file_loads_as_empty_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("link.json");
        std::fs::write(&path, "  \n").unwrap();
        let backend = JsonFileBackend::new(path);
        assert!(backend.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_preserves_pairs_and_creates_parent() {
        let dir = tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("data").join("link.json"));
        backend.save(&sample()).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), sample());
    }

    #[tokio::test]
    async fn reads_compact_json_written_by_other_tools() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("link.json");
        std::fs::write(&path, r#"{"ex1":"https://example.com","docs":"https://docs.rs"}"#)
            .unwrap();
        let backend = JsonFileBackend::new(path);
        let loaded = backend.load().await.unwrap();
        assert_eq!(loaded, sample());

        // Re-saving changes formatting only.
        backend.save(&loaded).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), sample());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_not_an_empty_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("link.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let backend = JsonFileBackend::new(path);
        let error = backend.load().await.unwrap_err();
        assert!(matches!(error, BackendError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn unreadable_path_surfaces_io_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be cannot be read as a string.
        let backend = JsonFileBackend::new(dir.path());
        let error = backend.load().await.unwrap_err();
        assert!(matches!(error, BackendError::Io { .. }));
    }

    #[tokio::test]
    async fn save_leaves_no_temp_files_behind() {
        let dir = tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("link.json"));
        backend.save(&sample()).await.unwrap();
        backend.save(&AliasMap::new()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["link.json".to_string()]);
    }
}
