use crate::{
    error::ProspectError,
    record::{Contact, SendKind, SendRecord},
};
use async_trait::async_trait;

/// Host seam for opening an outbound link.
///
/// The production implementation hands the URL to the platform opener;
/// tests substitute a recording fake. An `Err` means the host refused
/// the open (the pop-up-blocked condition) and halts a running batch.
#[async_trait]
pub trait LinkOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), ProspectError>;
}

/// Append-only send history log.
///
/// The scheduler records every opened link through this seam. Recording
/// failures must not block or roll back the send itself.
#[async_trait]
pub trait SendLog: Send + Sync {
    async fn record_send(
        &self,
        user_id: &str,
        phone_number: &str,
        message: &str,
        kind: SendKind,
        contact_name: Option<&str>,
        contact_email: Option<&str>,
    ) -> Result<SendRecord, ProspectError>;
}

/// Destination for structured contact records (the CRM).
#[async_trait]
pub trait ContactSink: Send + Sync {
    async fn send_contact(&self, contact: &Contact) -> Result<(), ProspectError>;
}

/// Progress callback for uploads: `(bytes_done, bytes_total)`.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Blob storage for the transfer feature.
///
/// Accepts an upload with an optional progress callback and returns a
/// URL the content can be fetched from on another device.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        name: &str,
        bytes: &[u8],
        progress: Option<ProgressFn>,
    ) -> Result<String, ProspectError>;
}
