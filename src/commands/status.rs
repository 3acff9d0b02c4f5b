//! `prospect status` — one-screen overview.

use super::AppContext;

pub async fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let numbers = ctx.store.list_prospects().await?;
    let history = ctx.store.get_history(ctx.user_id(), 1).await?;

    println!("{}", ctx.accent().apply_to("Prospect — status"));
    println!("  user: {}", ctx.user_id());
    println!("  database: {}", ctx.cfg.store.db_path);
    println!("  theme: {}", ctx.settings.theme);
    println!();
    println!("  numbers on the list: {}", numbers.len());
    match history.first() {
        Some(last) => println!(
            "  last send: {} via {}",
            last.sent_at.format("%Y-%m-%d %H:%M"),
            last.kind.as_str()
        ),
        None => println!("  last send: never"),
    }
    println!();
    println!(
        "  rd station: {}",
        match (
            ctx.settings.rdstation_enabled,
            !ctx.settings.rdstation_token.is_empty(),
        ) {
            (true, true) => "enabled",
            (true, false) => "enabled but missing token",
            (false, true) => "disabled (token stored)",
            (false, false) => "not configured",
        }
    );
    println!(
        "  send mode: {}",
        match prospect_send::detect_mode(ctx.cfg.send.force_manual) {
            prospect_send::SendMode::Batch => "batch (graphical session found)",
            prospect_send::SendMode::Manual => "manual (no graphical session)",
        }
    );
    Ok(())
}
