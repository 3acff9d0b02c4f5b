//! # prospect-transfer
//!
//! Moves text notes and files between devices through an object store.
//! The blob goes up through the [`ObjectStore`] seam; a record of it
//! lands in the store so the other device can list and fetch it.

use async_trait::async_trait;
use chrono::Utc;
use prospect_core::{
    record::{TransferItem, TransferKind},
    shellexpand,
    traits::{ObjectStore, ProgressFn},
    ProspectError,
};
use prospect_store::Store;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

/// Notes are capped small — they are meant for snippets, not documents.
pub const MAX_NOTE_BYTES: u64 = 10 * 1024;

/// File size cap.
pub const MAX_FILE_BYTES: u64 = 25 * 1024 * 1024;

/// Object store rooted in a local directory.
///
/// Blobs are plain files under the configured root; the returned URL is
/// the `file://` path another device can reach over a synced mount.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(dir: &str) -> Self {
        Self {
            root: PathBuf::from(shellexpand(dir)),
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn upload(
        &self,
        name: &str,
        bytes: &[u8],
        progress: Option<ProgressFn>,
    ) -> Result<String, ProspectError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let dest = self.root.join(name);

        let total = bytes.len() as u64;
        let mut written: u64 = 0;
        let mut file = tokio::fs::File::create(&dest).await?;
        for chunk in bytes.chunks(64 * 1024) {
            file.write_all(chunk).await?;
            written += chunk.len() as u64;
            if let Some(ref cb) = progress {
                cb(written, total);
            }
        }
        file.flush().await?;

        Ok(format!("file://{}", dest.display()))
    }
}

/// Upload + record façade for the transfer feature.
pub struct TransferService<S: ObjectStore> {
    store: Store,
    objects: S,
    user_id: String,
}

impl<S: ObjectStore> TransferService<S> {
    pub fn new(store: Store, objects: S, user_id: impl Into<String>) -> Self {
        Self {
            store,
            objects,
            user_id: user_id.into(),
        }
    }

    /// Upload a text note and record it.
    pub async fn send_note(&self, text: &str) -> Result<TransferItem, ProspectError> {
        let bytes = text.as_bytes();
        if bytes.len() as u64 > MAX_NOTE_BYTES {
            return Err(ProspectError::TransferTooLarge {
                limit: MAX_NOTE_BYTES,
            });
        }

        let name = format!("note-{}.txt", short_id());
        let url = self.objects.upload(&name, bytes, None).await?;
        self.record(TransferKind::Note, &name, &url, bytes.len() as u64)
            .await
    }

    /// Upload a file and record it, reporting progress if asked.
    pub async fn send_file(
        &self,
        path: &Path,
        progress: Option<ProgressFn>,
    ) -> Result<TransferItem, ProspectError> {
        let meta = tokio::fs::metadata(path).await?;
        if meta.len() > MAX_FILE_BYTES {
            return Err(ProspectError::TransferTooLarge {
                limit: MAX_FILE_BYTES,
            });
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");
        // Prefix with a short id so two devices can send same-named files.
        let name = format!("{}-{file_name}", short_id());

        let bytes = tokio::fs::read(path).await?;
        let url = self.objects.upload(&name, &bytes, progress).await?;
        self.record(TransferKind::File, file_name, &url, bytes.len() as u64)
            .await
    }

    /// This user's transfers, newest first.
    pub async fn list(&self) -> Result<Vec<TransferItem>, ProspectError> {
        self.store.list_transfers(&self.user_id).await
    }

    /// Drop one transfer record. The blob itself is left for the object
    /// store's own retention.
    pub async fn delete(&self, id: &str) -> Result<bool, ProspectError> {
        self.store.delete_transfer(id, &self.user_id).await
    }

    async fn record(
        &self,
        kind: TransferKind,
        name: &str,
        url: &str,
        size_bytes: u64,
    ) -> Result<TransferItem, ProspectError> {
        let item = TransferItem {
            id: Uuid::new_v4().to_string(),
            user_id: self.user_id.clone(),
            kind,
            name: name.to_string(),
            url: url.to_string(),
            size_bytes,
            created_at: Utc::now(),
        };
        self.store.record_transfer(&item).await?;
        info!("transfer recorded: {} {} ({size_bytes} bytes)", kind.as_str(), item.name);
        Ok(item)
    }
}

fn short_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_core::config::StoreConfig;
    use std::sync::{Arc, Mutex};

    async fn service(dir: &Path) -> TransferService<FsObjectStore> {
        let store = Store::new(&StoreConfig {
            db_path: dir.join("transfer.db").display().to_string(),
        })
        .await
        .unwrap();
        let objects = FsObjectStore::new(&dir.join("objects").display().to_string());
        TransferService::new(store, objects, "user-1")
    }

    #[tokio::test]
    async fn test_note_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let item = svc.send_note("shared snippet").await.unwrap();
        assert_eq!(item.kind, TransferKind::Note);
        assert_eq!(item.size_bytes, 14);

        let blob_path = item.url.strip_prefix("file://").unwrap();
        let content = std::fs::read_to_string(blob_path).unwrap();
        assert_eq!(content, "shared snippet");

        let listed = svc.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, item.id);
    }

    #[tokio::test]
    async fn test_oversize_note_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let big = "x".repeat((MAX_NOTE_BYTES + 1) as usize);
        let err = svc.send_note(&big).await.unwrap_err();
        assert!(matches!(err, ProspectError::TransferTooLarge { .. }));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_upload_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let src = dir.path().join("report.pdf");
        std::fs::write(&src, vec![7u8; 200_000]).unwrap();

        let seen: Arc<Mutex<Vec<(u64, u64)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let item = svc
            .send_file(
                &src,
                Some(Box::new(move |done, total| {
                    sink.lock().unwrap().push((done, total));
                })),
            )
            .await
            .unwrap();

        assert_eq!(item.kind, TransferKind::File);
        assert_eq!(item.name, "report.pdf");
        assert_eq!(item.size_bytes, 200_000);

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        let (done, total) = *seen.last().unwrap();
        assert_eq!((done, total), (200_000, 200_000));
    }

    #[tokio::test]
    async fn test_delete_removes_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let item = svc.send_note("bye").await.unwrap();
        assert!(svc.delete(&item.id).await.unwrap());
        assert!(!svc.delete(&item.id).await.unwrap());
        assert!(svc.list().await.unwrap().is_empty());
    }
}
