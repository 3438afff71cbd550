//! # Pod Image Store
//!
//! A small directory-backed key-value store holding the original photo and the cartoon
//! version for each plant pod. Entries are keyed `<kind>-<pod id>` and stored as
//! `<kind>-<pod id>.<ext>` under the store root, where the extension follows the sniffed
//! image format (`png`, `jpg`, or `bin` for anything else).

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

const EXTENSIONS: [&str; 3] = ["png", "jpg", "bin"];

/// Which version of a pod's photo an entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Original,
    Cartoon,
}

impl ImageKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ImageKind::Original => "original",
            ImageKind::Cartoon => "cartoon",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "original" => Some(ImageKind::Original),
            "cartoon" => Some(ImageKind::Cartoon),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A stored image and its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub id: String,
    pub pod_id: String,
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
    pub saved_at: DateTime<Utc>,
}

/// Directory-backed store of pod images
#[derive(Debug, Clone)]
pub struct PodImageStore {
    root: PathBuf,
}

impl PodImageStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entry id for a pod image, e.g. `cartoon-pod-3`
    pub fn entry_id(pod_id: &str, kind: ImageKind) -> String {
        format!("{}-{}", kind.prefix(), pod_id)
    }

    /// Save (or overwrite) an image for a pod
    pub async fn save(&self, pod_id: &str, kind: ImageKind, bytes: &[u8]) -> Result<StoredImage> {
        validate_pod_id(pod_id)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| operation_failed("create store directory", e))?;

        // A new format for the same entry must not leave the old file behind
        self.remove_entry(pod_id, kind).await?;

        let path = self.path_for(pod_id, kind, extension_for(bytes));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| operation_failed("save", e))?;

        info!("Saved {} image for pod {}", kind, pod_id);
        self.read_entry(&path, pod_id, kind).await
    }

    /// Fetch an image for a pod, or `None` if nothing is stored
    pub async fn get(&self, pod_id: &str, kind: ImageKind) -> Result<Option<StoredImage>> {
        validate_pod_id(pod_id)?;

        for extension in EXTENSIONS {
            let path = self.path_for(pod_id, kind, extension);
            if tokio::fs::try_exists(&path)
                .await
                .map_err(|e| operation_failed("get", e))?
            {
                return self.read_entry(&path, pod_id, kind).await.map(Some);
            }
        }

        debug!("No {} image found for pod {}", kind, pod_id);
        Ok(None)
    }

    /// All stored images, ordered by entry id
    pub async fn list(&self) -> Result<Vec<StoredImage>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(operation_failed("list", e).into()),
        };

        let mut images = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| operation_failed("list", e))?
        {
            let path = entry.path();
            let Some((kind, pod_id)) = parse_file_name(&path) else {
                continue;
            };
            images.push(self.read_entry(&path, &pod_id, kind).await?);
        }

        images.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(images)
    }

    /// Remove an image; returns whether anything was deleted
    pub async fn delete(&self, pod_id: &str, kind: ImageKind) -> Result<bool> {
        validate_pod_id(pod_id)?;

        let deleted = self.remove_entry(pod_id, kind).await?;
        if deleted {
            info!("Deleted {} image for pod {}", kind, pod_id);
        }
        Ok(deleted)
    }

    /// Remove every stored image; returns how many were deleted
    pub async fn clear(&self) -> Result<usize> {
        let images = self.list().await?;
        for image in &images {
            self.remove_entry(&image.pod_id, image.kind).await?;
        }

        info!("Cleared {} stored images", images.len());
        Ok(images.len())
    }

    fn path_for(&self, pod_id: &str, kind: ImageKind, extension: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", Self::entry_id(pod_id, kind), extension))
    }

    async fn remove_entry(&self, pod_id: &str, kind: ImageKind) -> Result<bool> {
        let mut removed = false;
        for extension in EXTENSIONS {
            match tokio::fs::remove_file(self.path_for(pod_id, kind, extension)).await {
                Ok(()) => removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(operation_failed("delete", e).into()),
            }
        }
        Ok(removed)
    }

    async fn read_entry(&self, path: &Path, pod_id: &str, kind: ImageKind) -> Result<StoredImage> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| operation_failed("read", e))?;
        let modified = tokio::fs::metadata(path)
            .await
            .and_then(|metadata| metadata.modified())
            .map_err(|e| operation_failed("read metadata", e))?;

        Ok(StoredImage {
            id: Self::entry_id(pod_id, kind),
            pod_id: pod_id.to_string(),
            kind,
            bytes,
            saved_at: DateTime::<Utc>::from(modified),
        })
    }
}

fn validate_pod_id(pod_id: &str) -> Result<()> {
    let valid = !pod_id.is_empty()
        && pod_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidPodId { pod_id: pod_id.to_string() }.into())
    }
}

fn extension_for(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "png",
        Ok(ImageFormat::Jpeg) => "jpg",
        _ => "bin",
    }
}

fn parse_file_name(path: &Path) -> Option<(ImageKind, String)> {
    if !EXTENSIONS.contains(&path.extension()?.to_str()?) {
        return None;
    }

    let stem = path.file_stem()?.to_str()?;
    let (prefix, pod_id) = stem.split_once('-')?;
    let kind = ImageKind::from_prefix(prefix)?;
    validate_pod_id(pod_id).ok()?;
    Some((kind, pod_id.to_string()))
}

fn operation_failed(operation: &str, err: std::io::Error) -> StoreError {
    StoreError::OperationFailed {
        operation: operation.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_get_delete() {
        let dir = tempdir().unwrap();
        let store = PodImageStore::new(dir.path().join("images"));

        let saved = store.save("pod-1", ImageKind::Cartoon, b"cartoon bytes").await.unwrap();
        assert_eq!(saved.id, "cartoon-pod-1");

        let fetched = store.get("pod-1", ImageKind::Cartoon).await.unwrap().unwrap();
        assert_eq!(fetched.bytes, b"cartoon bytes".to_vec());
        assert_eq!(fetched.kind, ImageKind::Cartoon);

        assert!(store.get("pod-1", ImageKind::Original).await.unwrap().is_none());

        assert!(store.delete("pod-1", ImageKind::Cartoon).await.unwrap());
        assert!(!store.delete("pod-1", ImageKind::Cartoon).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_clear() {
        let dir = tempdir().unwrap();
        let store = PodImageStore::new(dir.path());

        store.save("basil", ImageKind::Original, b"a").await.unwrap();
        store.save("basil", ImageKind::Cartoon, b"b").await.unwrap();
        store.save("mint_2", ImageKind::Original, b"c").await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["cartoon-basil", "original-basil", "original-mint_2"]);

        assert_eq!(store.clear().await.unwrap(), 3);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_extension_follows_format() {
        const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

        let dir = tempdir().unwrap();
        let store = PodImageStore::new(dir.path());

        store.save("kale", ImageKind::Original, JPEG).await.unwrap();
        assert!(dir.path().join("original-kale.jpg").exists());
        assert!(!dir.path().join("original-kale.png").exists());

        store.save("kale", ImageKind::Original, PNG).await.unwrap();
        assert!(dir.path().join("original-kale.png").exists());
        assert!(!dir.path().join("original-kale.jpg").exists());

        let fetched = store.get("kale", ImageKind::Original).await.unwrap().unwrap();
        assert_eq!(fetched.bytes, PNG.to_vec());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_root_lists_nothing() {
        let dir = tempdir().unwrap();
        let store = PodImageStore::new(dir.path().join("never-created"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_like_pod_ids() {
        let dir = tempdir().unwrap();
        let store = PodImageStore::new(dir.path());
        assert!(store.save("../escape", ImageKind::Original, b"x").await.is_err());
        assert!(store.get("", ImageKind::Original).await.is_err());
    }
}
