use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::future::join_all;
use tokio::fs;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    validators::multipart::UploadedFile,
};

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Object storage backend. Injected through `AppState`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, folder: &str, file: &UploadedFile) -> Result<StoredObject>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Reverse of the URL produced by `upload`, for objects this backend owns.
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// Stores objects on disk and serves them from `{public_base_url}/uploads`.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn url_prefix(&self) -> String {
        format!("{}/uploads/", self.public_base_url)
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(Error::InvalidInput {
                reason: format!("Invalid storage key: {key}"),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, folder: &str, file: &UploadedFile) -> Result<StoredObject> {
        let extension = file.extension().unwrap_or_else(|| "bin".to_string());
        let key = format!("{}/{}.{}", folder, Uuid::new_v4(), extension);
        let path = self.path_for(&key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::UploadFailed(e.to_string()))?;
        }
        fs::write(&path, &file.bytes)
            .await
            .map_err(|e| Error::UploadFailed(e.to_string()))?;

        tracing::debug!(key = %key, bytes = file.bytes.len(), "stored object");

        Ok(StoredObject {
            url: format!("{}{}", self.url_prefix(), key),
            key,
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.url_prefix()).map(str::to_string)
    }
}

/// Upload orchestration on top of an `ObjectStorage`.
pub struct StorageService;

impl StorageService {
    /// Uploads `files` in order. If one fails, the objects already stored are
    /// deleted before the error is returned, so nothing is left behind.
    pub async fn upload_all(
        storage: &dyn ObjectStorage,
        files: &[(&str, &UploadedFile)],
    ) -> Result<Vec<StoredObject>> {
        let mut stored = Vec::with_capacity(files.len());

        for (folder, file) in files {
            match storage.upload(folder, file).await {
                Ok(object) => stored.push(object),
                Err(err) => {
                    tracing::warn!(folder = %folder, error = ?err, "upload failed, discarding earlier uploads");
                    Self::discard(storage, &stored).await;
                    return Err(err);
                }
            }
        }

        Ok(stored)
    }

    /// Best-effort concurrent deletion; failures are only logged.
    pub async fn discard(storage: &dyn ObjectStorage, objects: &[StoredObject]) {
        let deletions = objects.iter().map(|object| async move {
            if let Err(err) = storage.delete(&object.key).await {
                tracing::warn!(key = %object.key, error = ?err, "could not delete stored object");
            }
        });
        join_all(deletions).await;
    }

    /// Best-effort deletion of objects referenced by URL. Foreign URLs are skipped.
    pub async fn discard_urls(storage: &dyn ObjectStorage, urls: &[&str]) {
        let objects: Vec<StoredObject> = urls
            .iter()
            .filter_map(|url| {
                storage.key_for_url(url).map(|key| StoredObject {
                    key,
                    url: url.to_string(),
                })
            })
            .collect();
        Self::discard(storage, &objects).await;
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory backend for tests. Can be told to fail the n-th upload.
    #[derive(Default)]
    pub struct MemoryObjectStorage {
        objects: Mutex<HashMap<String, usize>>,
        uploads: Mutex<usize>,
        fail_on_upload: Option<usize>,
    }

    impl MemoryObjectStorage {
        pub fn failing_on(upload_number: usize) -> Self {
            Self {
                fail_on_upload: Some(upload_number),
                ..Default::default()
            }
        }

        pub fn keys(&self) -> Vec<String> {
            let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
            keys.sort();
            keys
        }
    }

    #[async_trait]
    impl ObjectStorage for MemoryObjectStorage {
        async fn upload(&self, folder: &str, file: &UploadedFile) -> Result<StoredObject> {
            let number = {
                let mut uploads = self.uploads.lock().unwrap();
                *uploads += 1;
                *uploads
            };
            if self.fail_on_upload == Some(number) {
                return Err(Error::UploadFailed("storage unavailable".to_string()));
            }

            let key = format!("{folder}/{number}-{}", file.file_name);
            self.objects
                .lock()
                .unwrap()
                .insert(key.clone(), file.bytes.len());
            Ok(StoredObject {
                url: format!("memory://{key}"),
                key,
            })
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }

        fn key_for_url(&self, url: &str) -> Option<String> {
            url.strip_prefix("memory://").map(str::to_string)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryObjectStorage;
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile::new(name, "audio/mpeg", vec![0u8; 16])
    }

    #[tokio::test]
    async fn test_upload_all_stores_every_file() {
        let storage = MemoryObjectStorage::default();
        let (audio, cover) = (file("a.mp3"), file("c.png"));

        let stored = StorageService::upload_all(&storage, &[("audio", &audio), ("covers", &cover)])
            .await
            .unwrap();

        assert_eq!(stored.len(), 2);
        assert_eq!(storage.keys(), vec!["audio/1-a.mp3", "covers/2-c.png"]);
    }

    #[tokio::test]
    async fn test_second_upload_failure_removes_the_first() {
        let storage = MemoryObjectStorage::failing_on(2);
        let (audio, cover) = (file("a.mp3"), file("c.png"));

        let err = StorageService::upload_all(&storage, &[("audio", &audio), ("covers", &cover)])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UploadFailed(_)));
        assert!(storage.keys().is_empty());
    }

    #[tokio::test]
    async fn test_discard_urls_skips_foreign_urls() {
        let storage = MemoryObjectStorage::default();
        let stored = storage.upload("covers", &file("c.png")).await.unwrap();

        StorageService::discard_urls(&storage, &[stored.url.as_str(), "https://elsewhere.example/x.png"])
            .await;

        assert!(storage.keys().is_empty());
    }

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let root = std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4()));
        let storage = LocalObjectStorage::new(root.clone(), "http://localhost:8080/".to_string());
        storage.initialize().await.unwrap();

        let stored = storage.upload("songs/audio", &file("a.mp3")).await.unwrap();
        assert!(stored.url.starts_with("http://localhost:8080/uploads/songs/audio/"));
        assert!(stored.url.ends_with(".mp3"));
        assert_eq!(storage.key_for_url(&stored.url).as_deref(), Some(stored.key.as_str()));
        assert!(storage.root().join(&stored.key).exists());

        storage.delete(&stored.key).await.unwrap();
        assert!(!storage.root().join(&stored.key).exists());
        // Deleting twice is fine.
        storage.delete(&stored.key).await.unwrap();

        assert!(storage.delete("../etc/passwd").await.is_err());

        let _ = std::fs::remove_dir_all(root);
    }
}
