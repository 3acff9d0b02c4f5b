//! Bulk send scheduling.
//!
//! Batch mode opens one link per number with a fixed stagger so the
//! host's pop-up heuristics see one request at a time. Manual mode
//! builds every link up front and waits for the user to trigger each
//! one; it never auto-advances.

use crate::link::wa_me_link;
use prospect_core::{
    record::{BulkProgress, SendKind, SendPhase},
    traits::{LinkOpener, SendLog},
    ProspectError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Cooperative cancellation handle for a running batch.
///
/// The scheduler checks the flag before each per-item open fires, so
/// cancelling stops pending opens deterministically. Already-opened
/// links are not retracted.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Staggered batch sender.
///
/// Owns the cancellation flag and the progress counters for one batch
/// at a time; `send_all` drives the whole schedule on the caller's task.
pub struct BulkSender<O, L> {
    opener: O,
    log: L,
    user_id: String,
    stagger: Duration,
    cancel: CancelFlag,
    progress: BulkProgress,
}

impl<O: LinkOpener, L: SendLog> BulkSender<O, L> {
    pub fn new(opener: O, log: L, user_id: impl Into<String>) -> Self {
        Self {
            opener,
            log,
            user_id: user_id.into(),
            stagger: Duration::from_secs(1),
            cancel: CancelFlag::new(),
            progress: BulkProgress::idle(),
        }
    }

    /// Override the inter-open delay (default one second).
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// A handle that cancels this sender's pending opens.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn progress(&self) -> BulkProgress {
        self.progress
    }

    /// Enter the confirmation phase for a batch of `total` links.
    pub fn begin_confirmation(&mut self, total: usize) {
        self.progress = BulkProgress {
            total,
            processed: 0,
            phase: SendPhase::Confirming,
        };
    }

    /// Reset to idle, zeroing counters. Called whenever the active
    /// phone list changes.
    pub fn reset(&mut self) {
        self.progress = BulkProgress::idle();
    }

    /// Open one link per number, staggered, recording each open.
    ///
    /// Returns the number of links opened. A refused open halts the
    /// remaining schedule with `PopupBlocked` naming the number; the
    /// stopped batch is only resumable from scratch. Cancellation
    /// between ticks ends the run early without error. A history
    /// append failure is logged and never blocks the send.
    pub async fn send_all(
        &mut self,
        numbers: &[String],
        message: &str,
    ) -> Result<usize, ProspectError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ProspectError::EmptyMessage);
        }

        self.progress = BulkProgress {
            total: numbers.len(),
            processed: 0,
            phase: SendPhase::Sending,
        };

        for (i, number) in numbers.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.stagger).await;
            }
            if self.cancel.is_cancelled() {
                info!(
                    "bulk send cancelled after {}/{} opens",
                    self.progress.processed, self.progress.total
                );
                break;
            }

            let url = wa_me_link(number, message);
            if let Err(e) = self.opener.open(&url).await {
                warn!("host refused to open link for {number}: {e}");
                self.progress.phase = SendPhase::Idle;
                return Err(ProspectError::PopupBlocked {
                    number: number.clone(),
                });
            }

            if let Err(e) = self
                .log
                .record_send(&self.user_id, number, message, SendKind::WhatsApp, None, None)
                .await
            {
                warn!("history append failed for {number}: {e}");
            }
            self.progress.processed += 1;
        }

        let processed = self.progress.processed;
        self.progress.phase = SendPhase::Idle;
        Ok(processed)
    }
}

/// One pre-built link awaiting its manual trigger.
#[derive(Debug, Clone)]
pub struct ManualLink {
    pub number: String,
    pub url: String,
    pub opened: bool,
}

/// Manual-tap batch: all links built up front, none auto-opened.
#[derive(Debug)]
pub struct ManualBatch {
    message: String,
    links: Vec<ManualLink>,
    progress: BulkProgress,
}

impl ManualBatch {
    pub fn new(numbers: &[String], message: &str) -> Result<Self, ProspectError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ProspectError::EmptyMessage);
        }
        let links = numbers
            .iter()
            .map(|n| ManualLink {
                number: n.clone(),
                url: wa_me_link(n, message),
                opened: false,
            })
            .collect::<Vec<_>>();
        Ok(Self {
            message: message.to_string(),
            progress: BulkProgress {
                total: links.len(),
                processed: 0,
                phase: SendPhase::AwaitingManualTaps,
            },
            links,
        })
    }

    pub fn links(&self) -> &[ManualLink] {
        &self.links
    }

    pub fn progress(&self) -> BulkProgress {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.links.iter().all(|l| l.opened)
    }

    /// Open the link at `idx` and mark that number processed.
    ///
    /// On the last trigger the batch returns to idle. A refused open
    /// leaves the number unmarked; the other triggers stay available.
    pub async fn trigger<O: LinkOpener, L: SendLog>(
        &mut self,
        idx: usize,
        opener: &O,
        log: &L,
        user_id: &str,
    ) -> Result<(), ProspectError> {
        let link = match self.links.get_mut(idx) {
            Some(l) if !l.opened => l,
            _ => return Ok(()),
        };

        if let Err(e) = opener.open(&link.url).await {
            warn!("host refused to open link for {}: {e}", link.number);
            return Err(ProspectError::PopupBlocked {
                number: link.number.clone(),
            });
        }
        link.opened = true;
        self.progress.processed += 1;

        if let Err(e) = log
            .record_send(
                user_id,
                &self.links[idx].number,
                &self.message,
                SendKind::WhatsApp,
                None,
                None,
            )
            .await
        {
            warn!("history append failed: {e}");
        }

        if self.is_complete() {
            self.progress.phase = SendPhase::Idle;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prospect_core::record::{SendRecord, SendStatus};
    use std::sync::Mutex;

    /// Opener that records every URL; refuses opens past a cutoff.
    #[derive(Default)]
    struct FakeOpener {
        opened: Arc<Mutex<Vec<String>>>,
        block_from: Option<usize>,
    }

    #[async_trait]
    impl LinkOpener for FakeOpener {
        async fn open(&self, url: &str) -> Result<(), ProspectError> {
            let mut opened = self.opened.lock().unwrap();
            if let Some(limit) = self.block_from {
                if opened.len() >= limit {
                    return Err(std::io::Error::other("blocked").into());
                }
            }
            opened.push(url.to_string());
            Ok(())
        }
    }

    /// In-memory send log.
    #[derive(Default)]
    struct FakeLog {
        records: Arc<Mutex<Vec<(String, String, SendKind)>>>,
    }

    #[async_trait]
    impl SendLog for FakeLog {
        async fn record_send(
            &self,
            user_id: &str,
            phone_number: &str,
            message: &str,
            kind: SendKind,
            contact_name: Option<&str>,
            contact_email: Option<&str>,
        ) -> Result<SendRecord, ProspectError> {
            self.records.lock().unwrap().push((
                phone_number.to_string(),
                message.to_string(),
                kind,
            ));
            Ok(SendRecord {
                id: "test".to_string(),
                user_id: user_id.to_string(),
                phone_number: phone_number.to_string(),
                message: message.to_string(),
                kind,
                status: SendStatus::Sent,
                contact_name: contact_name.map(str::to_string),
                contact_email: contact_email.map(str::to_string),
                sent_at: chrono::Utc::now(),
            })
        }
    }

    fn numbers() -> Vec<String> {
        vec!["+5511999990000".to_string(), "+5511999990001".to_string()]
    }

    #[tokio::test]
    async fn test_batch_opens_every_link_and_records_history() {
        let opener = FakeOpener::default();
        let opened = opener.opened.clone();
        let log = FakeLog::default();
        let records = log.records.clone();

        let mut sender =
            BulkSender::new(opener, log, "user-1").with_stagger(Duration::from_millis(1));
        let sent = sender.send_all(&numbers(), "Hello").await.unwrap();

        assert_eq!(sent, 2);
        let opened = opened.lock().unwrap();
        assert_eq!(opened.len(), 2);
        assert!(opened.iter().all(|u| u.contains("text=Hello")));
        assert!(opened[0].contains("+5511999990000"));
        assert!(opened[1].contains("+5511999990001"));

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|(_, _, k)| *k == SendKind::WhatsApp));
        assert_eq!(sender.progress().phase, SendPhase::Idle);
    }

    #[tokio::test]
    async fn test_empty_message_sends_nothing() {
        let opener = FakeOpener::default();
        let opened = opener.opened.clone();
        let mut sender = BulkSender::new(opener, FakeLog::default(), "user-1");

        let err = sender.send_all(&numbers(), "   ").await.unwrap_err();
        assert!(matches!(err, ProspectError::EmptyMessage));
        assert!(opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blocked_open_halts_batch_and_names_number() {
        let opener = FakeOpener {
            block_from: Some(1),
            ..Default::default()
        };
        let opened = opener.opened.clone();
        let log = FakeLog::default();
        let records = log.records.clone();

        let mut sender =
            BulkSender::new(opener, log, "user-1").with_stagger(Duration::from_millis(1));
        let err = sender.send_all(&numbers(), "Hello").await.unwrap_err();

        match err {
            ProspectError::PopupBlocked { number } => assert_eq!(number, "+5511999990001"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(opened.lock().unwrap().len(), 1);
        assert_eq!(records.lock().unwrap().len(), 1);
        assert_eq!(sender.progress().phase, SendPhase::Idle);
    }

    #[tokio::test]
    async fn test_cancellation_stops_pending_opens() {
        let opener = FakeOpener::default();
        let opened = opener.opened.clone();
        let mut sender = BulkSender::new(opener, FakeLog::default(), "user-1")
            .with_stagger(Duration::from_millis(5));

        // The flag is checked before each open fires: cancelling up
        // front means not a single link opens.
        sender.cancel_flag().cancel();
        let sent = sender.send_all(&numbers(), "Hello").await.unwrap();
        assert_eq!(sent, 0);
        assert!(opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let mut sender = BulkSender::new(FakeOpener::default(), FakeLog::default(), "u");
        sender.begin_confirmation(5);
        assert_eq!(sender.progress().phase, SendPhase::Confirming);
        assert_eq!(sender.progress().total, 5);

        sender.reset();
        let p = sender.progress();
        assert_eq!(p.phase, SendPhase::Idle);
        assert_eq!((p.total, p.processed), (0, 0));
    }

    #[tokio::test]
    async fn test_manual_batch_builds_links_without_opening() {
        let batch = ManualBatch::new(&numbers(), "Hi").unwrap();
        assert_eq!(batch.links().len(), 2);
        assert!(batch.links().iter().all(|l| !l.opened));
        assert_eq!(batch.progress().phase, SendPhase::AwaitingManualTaps);
    }

    #[tokio::test]
    async fn test_manual_triggers_complete_one_by_one() {
        let opener = FakeOpener::default();
        let log = FakeLog::default();
        let records = log.records.clone();
        let mut batch = ManualBatch::new(&numbers(), "Hi").unwrap();

        batch.trigger(0, &opener, &log, "user-1").await.unwrap();
        assert!(batch.links()[0].opened);
        assert!(!batch.is_complete());
        assert_eq!(batch.progress().phase, SendPhase::AwaitingManualTaps);

        // Re-triggering an opened link is a no-op.
        batch.trigger(0, &opener, &log, "user-1").await.unwrap();
        assert_eq!(records.lock().unwrap().len(), 1);

        batch.trigger(1, &opener, &log, "user-1").await.unwrap();
        assert!(batch.is_complete());
        assert_eq!(batch.progress().phase, SendPhase::Idle);
        assert_eq!(records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_manual_empty_message_is_rejected() {
        let err = ManualBatch::new(&numbers(), "").unwrap_err();
        assert!(matches!(err, ProspectError::EmptyMessage));
    }
}
