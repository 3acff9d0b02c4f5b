//! # prospect-send
//!
//! Outbound WhatsApp deep links and the bulk send scheduler.

mod link;
mod opener;
mod scheduler;

pub use link::wa_me_link;
pub use opener::{graphical_session_available, SystemOpener};
pub use scheduler::{BulkSender, CancelFlag, ManualBatch, ManualLink};

/// How a batch of links gets opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// Auto-open every link, staggered, after one confirmation.
    Batch,
    /// Build all links up front; the user triggers each one.
    Manual,
}

/// Pick the execution mode for this host.
///
/// Batch mode needs somewhere to open a browser window; without a
/// graphical session every open would fail, so fall back to presenting
/// the links for manual triggering.
pub fn detect_mode(force_manual: bool) -> SendMode {
    if force_manual || !graphical_session_available() {
        SendMode::Manual
    } else {
        SendMode::Batch
    }
}
