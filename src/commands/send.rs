//! Bulk send: batch mode with stagger, or manual-tap mode.

use super::AppContext;
use anyhow::bail;
use async_trait::async_trait;
use prospect_core::{
    record::{Contact, SendKind},
    traits::{ContactSink, LinkOpener},
    ProspectError,
};
use prospect_crm::RdStationClient;
use prospect_send::{detect_mode, BulkSender, ManualBatch, SendMode, SystemOpener};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub struct SendArgs {
    pub message: Option<String>,
    pub message_file: Option<PathBuf>,
    pub manual: bool,
    pub crm: bool,
    pub yes: bool,
}

/// `prospect send`
pub async fn run(ctx: &AppContext, args: SendArgs) -> anyhow::Result<()> {
    let message = resolve_message(&args)?;
    if message.trim().is_empty() {
        bail!("{}", ProspectError::EmptyMessage);
    }

    let numbers = ctx.store.list_prospects().await?;
    if numbers.is_empty() {
        println!("The list is empty; nothing to send. Use `prospect add` or `prospect import`.");
        return Ok(());
    }

    let mode = detect_mode(args.manual || ctx.cfg.send.force_manual);
    match mode {
        SendMode::Batch => run_batch(ctx, &numbers, &message, args.yes).await?,
        SendMode::Manual => run_manual(ctx, &numbers, &message).await?,
    }

    if args.crm {
        forward_to_crm(ctx, &numbers).await?;
    }
    Ok(())
}

async fn run_batch(
    ctx: &AppContext,
    numbers: &[String],
    message: &str,
    yes: bool,
) -> anyhow::Result<()> {
    let stagger = Duration::from_secs(ctx.cfg.send.stagger_secs);
    let mut sender = BulkSender::new(SystemOpener, ctx.store.clone(), ctx.user_id())
        .with_stagger(stagger);

    sender.begin_confirmation(numbers.len());
    if !yes {
        let confirmed: bool = cliclack::confirm(format!(
            "Open {} WhatsApp link(s), one every {}s? Your browser may warn about pop-ups.",
            numbers.len(),
            stagger.as_secs()
        ))
        .initial_value(true)
        .interact()?;
        if !confirmed {
            sender.reset();
            println!("Send cancelled.");
            return Ok(());
        }
    }

    // Ctrl-C flips the cancellation flag; pending opens stop at the
    // next tick, links already opened stay open.
    let cancel = sender.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match sender.send_all(numbers, message).await {
        Ok(sent) => {
            println!("Opened {sent} of {} link(s).", numbers.len());
            Ok(())
        }
        Err(e @ ProspectError::PopupBlocked { .. }) => {
            let progress = sender.progress();
            println!(
                "Opened {} of {} link(s) before the host refused one.",
                progress.processed, progress.total
            );
            bail!("{e}");
        }
        Err(e) => bail!("{e}"),
    }
}

/// Emits the link into the terminal; "opening" in manual mode means
/// handing the URL to the user to tap.
struct PrintOpener;

#[async_trait]
impl LinkOpener for PrintOpener {
    async fn open(&self, url: &str) -> Result<(), ProspectError> {
        println!("    {url}");
        Ok(())
    }
}

async fn run_manual(ctx: &AppContext, numbers: &[String], message: &str) -> anyhow::Result<()> {
    let mut batch = ManualBatch::new(numbers, message)?;
    println!(
        "{} — no link opens by itself; trigger each number below.",
        ctx.accent().apply_to("Manual mode")
    );

    for idx in 0..batch.links().len() {
        let number = batch.links()[idx].number.clone();
        let send_now: bool = cliclack::confirm(format!("Send to {number}?"))
            .initial_value(true)
            .interact()?;
        if !send_now {
            println!("  skipped {number}");
            continue;
        }
        batch
            .trigger(idx, &PrintOpener, &ctx.store, ctx.user_id())
            .await?;
    }

    let progress = batch.progress();
    println!(
        "Done: {} of {} number(s) triggered.",
        progress.processed, progress.total
    );
    Ok(())
}

/// Forward every number on the list to RD Station as a bare contact.
async fn forward_to_crm(ctx: &AppContext, numbers: &[String]) -> anyhow::Result<()> {
    if !ctx.settings.rdstation_enabled || ctx.settings.rdstation_token.is_empty() {
        println!("RD Station is not configured; skipping CRM forwarding.");
        return Ok(());
    }

    let client = RdStationClient::new(
        ctx.cfg.rdstation.api_url.clone(),
        ctx.settings.rdstation_token.clone(),
    );

    let mut forwarded = 0;
    for number in numbers {
        let contact = Contact {
            phone: number.clone(),
            ..Default::default()
        };
        match ContactSink::send_contact(&client, &contact).await {
            Ok(()) => {
                forwarded += 1;
                if let Err(e) = ctx
                    .store
                    .append_send(
                        ctx.user_id(),
                        number,
                        "Contact added via Prospect",
                        SendKind::RdStation,
                        None,
                        None,
                    )
                    .await
                {
                    warn!("history append failed for {number}: {e}");
                }
            }
            Err(e) => warn!("CRM forward failed for {number}: {e}"),
        }
    }
    println!("Forwarded {forwarded} of {} contact(s) to RD Station.", numbers.len());
    Ok(())
}

fn resolve_message(args: &SendArgs) -> anyhow::Result<String> {
    if let Some(ref m) = args.message {
        return Ok(m.clone());
    }
    if let Some(ref path) = args.message_file {
        return Ok(std::fs::read_to_string(path)?);
    }
    bail!("{}", ProspectError::EmptyMessage);
}
