//! Note and file transfer commands.

use super::AppContext;
use anyhow::bail;
use prospect_transfer::{FsObjectStore, TransferService};
use std::path::Path;

fn service(ctx: &AppContext) -> TransferService<FsObjectStore> {
    TransferService::new(
        ctx.store.clone(),
        FsObjectStore::new(&ctx.cfg.transfer.objects_dir),
        ctx.user_id(),
    )
}

/// `prospect transfer note <text...>`
pub async fn run_note(ctx: &AppContext, text: &str) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        bail!("the note is empty");
    }
    let item = service(ctx).send_note(text).await?;
    println!("Note stored ({} bytes): {}", item.size_bytes, item.url);
    Ok(())
}

/// `prospect transfer file <path>`
pub async fn run_file(ctx: &AppContext, path: &Path) -> anyhow::Result<()> {
    let bar = std::sync::Arc::new(cliclack::progress_bar(100));
    bar.start(format!("Uploading {}", path.display()));

    let reporter = bar.clone();
    let last_pct = std::sync::atomic::AtomicU64::new(0);
    let item = service(ctx)
        .send_file(
            path,
            Some(Box::new(move |done, total| {
                if total == 0 {
                    return;
                }
                let pct = done * 100 / total;
                let prev = last_pct.swap(pct, std::sync::atomic::Ordering::Relaxed);
                if pct > prev {
                    reporter.inc(pct - prev);
                }
            })),
        )
        .await?;

    bar.stop(format!(
        "Uploaded {} ({} bytes): {}",
        item.name, item.size_bytes, item.url
    ));
    Ok(())
}

/// `prospect transfer list`
pub async fn run_list(ctx: &AppContext) -> anyhow::Result<()> {
    let items = service(ctx).list().await?;
    if items.is_empty() {
        println!("No transfers yet.");
        return Ok(());
    }

    println!("{}:", ctx.accent().apply_to("Transfers"));
    for item in items {
        println!(
            "  {} {:4} {:30} {:>10}  {}",
            ctx.dim().apply_to(item.created_at.format("%Y-%m-%d %H:%M")),
            item.kind.as_str(),
            item.name,
            format!("{} B", item.size_bytes),
            ctx.dim().apply_to(&item.id)
        );
    }
    Ok(())
}

/// `prospect transfer delete <id>`
pub async fn run_delete(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    if service(ctx).delete(id).await? {
        println!("Transfer {id} deleted.");
    } else {
        println!("No transfer with id {id}.");
    }
    Ok(())
}
