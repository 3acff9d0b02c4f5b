//! Send history rendering and clearing.

use super::AppContext;
use prospect_core::record::SendKind;

/// `prospect history`
pub async fn run(ctx: &AppContext, limit: i64, clear: bool) -> anyhow::Result<()> {
    if clear {
        let confirmed: bool = cliclack::confirm("Delete the whole send history?")
            .initial_value(false)
            .interact()?;
        if !confirmed {
            println!("History kept.");
            return Ok(());
        }
        let removed = ctx.store.clear_history(ctx.user_id()).await?;
        println!("Deleted {removed} record(s).");
        return Ok(());
    }

    let records = ctx.store.get_history(ctx.user_id(), limit).await?;
    if records.is_empty() {
        println!("No messages sent yet.");
        return Ok(());
    }

    println!("{}:", ctx.accent().apply_to("Message history"));
    for record in records {
        let when = record.sent_at.format("%Y-%m-%d %H:%M");
        let target = match record.kind {
            SendKind::WhatsApp => record.phone_number.clone(),
            SendKind::RdStation => record
                .contact_email
                .clone()
                .unwrap_or_else(|| record.phone_number.clone()),
        };
        println!(
            "  {} {:9} {:10} {:18} {}",
            ctx.dim().apply_to(when),
            record.kind.as_str(),
            record.status.as_str(),
            target,
            truncate(&record.message, 48)
        );
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn test_truncate_short_passes_through() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_adds_ellipsis() {
        assert_eq!(truncate("hello world", 5), "hello…");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Olá, tudo bem?", 4), "Olá,…");
    }
}
