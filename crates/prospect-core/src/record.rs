use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the send history log.
///
/// Created at the moment a deep link is opened or a CRM submission
/// succeeds. Never mutated afterwards by this codebase; status
/// transitions, if any, happen externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRecord {
    pub id: String,
    pub user_id: String,
    pub phone_number: String,
    pub message: String,
    pub kind: SendKind,
    pub status: SendStatus,
    /// Contact name, for CRM submissions.
    pub contact_name: Option<String>,
    /// Contact email, for CRM submissions.
    pub contact_email: Option<String>,
    pub sent_at: DateTime<Utc>,
}

/// Which outbound path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendKind {
    WhatsApp,
    RdStation,
}

impl SendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsApp => "whatsapp",
            Self::RdStation => "rdstation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "whatsapp" => Some(Self::WhatsApp),
            "rdstation" => Some(Self::RdStation),
            _ => None,
        }
    }
}

/// Delivery status of a record.
///
/// `Sent` means "the link was opened" — actual delivery is unknowable
/// from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Sent,
    Delivered,
    Read,
    Failed,
}

impl SendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "read" => Some(Self::Read),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A contact to forward to the CRM.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub company: Option<String>,
    pub cnpj: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

/// Progress of a bulk send, advanced once per opened link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkProgress {
    pub total: usize,
    pub processed: usize,
    pub phase: SendPhase,
}

impl BulkProgress {
    pub fn idle() -> Self {
        Self {
            total: 0,
            processed: 0,
            phase: SendPhase::Idle,
        }
    }
}

impl Default for BulkProgress {
    fn default() -> Self {
        Self::idle()
    }
}

/// Scheduler state machine.
///
/// Batch path: `Idle → Confirming → Sending → Idle`.
/// Manual path: `Idle → AwaitingManualTaps → Idle` once every number has
/// been individually triggered. Any mutation of the active phone list
/// resets to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    Confirming,
    Sending,
    AwaitingManualTaps,
}

/// A note or file moved between devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferItem {
    pub id: String,
    pub user_id: String,
    pub kind: TransferKind,
    pub name: String,
    pub url: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// What a transfer item holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Note,
    File,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::File => "file",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "note" => Some(Self::Note),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}
