//! Certification photos stored on the local filesystem and served under
//! `/photos`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use goalie_core::photos::{validate_upload, PhotoStoreTrait, PhotoUpload, StoredPhoto};
use goalie_core::{Error, Result};
use uuid::Uuid;

/// Route prefix the photo directory is mounted on.
pub const PHOTO_ROUTE: &str = "/photos";

pub struct FsPhotoStore {
    root: PathBuf,
    public_url: String,
    max_bytes: usize,
}

impl FsPhotoStore {
    pub fn new(root: impl Into<PathBuf>, public_url: &str, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}{}/{}", self.public_url, PHOTO_ROUTE, key)
    }

    /// Resolves a public URL or a bare key to a path under the root.
    fn path_for(&self, url_or_key: &str) -> Result<PathBuf> {
        let prefix = format!("{}{}/", self.public_url, PHOTO_ROUTE);
        let key = url_or_key.strip_prefix(&prefix).unwrap_or(url_or_key);
        let relative = Path::new(key);
        if key.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(Error::invalid_input(format!("Invalid photo key '{}'", key)));
        }
        Ok(self.root.join(relative))
    }
}

fn validate_owner(owner_id: &str) -> Result<()> {
    let valid = !owner_id.is_empty()
        && owner_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "Owner id '{}' cannot be used as a photo folder",
            owner_id
        )))
    }
}

#[async_trait]
impl PhotoStoreTrait for FsPhotoStore {
    async fn put(&self, owner_id: &str, upload: PhotoUpload) -> Result<StoredPhoto> {
        let kind = validate_upload(&upload, self.max_bytes)?;
        validate_owner(owner_id)?;

        let key = format!("{}/{}.{}", owner_id, Uuid::new_v4(), kind.extension());
        let path = self.root.join(&key);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::PhotoStorage(format!("Failed to create {:?}: {}", dir, e)))?;
        }
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| Error::PhotoStorage(format!("Failed to write {:?}: {}", path, e)))?;

        tracing::debug!("Stored photo {} ({} bytes)", key, upload.bytes.len());
        Ok(StoredPhoto {
            url: self.url_for(&key),
            key,
        })
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let path = self.path_for(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::PhotoStorage(format!(
                "Failed to delete {:?}: {}",
                path, e
            ))),
        }
    }
}
