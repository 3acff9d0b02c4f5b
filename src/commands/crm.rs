//! RD Station integration commands.

use super::AppContext;
use anyhow::bail;
use prospect_core::{
    phone,
    record::{Contact, SendKind},
    ProspectError,
};
use prospect_crm::RdStationClient;

pub struct ContactArgs {
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub cnpj: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

/// `prospect crm status`
pub async fn run_status(ctx: &AppContext) -> anyhow::Result<()> {
    println!("{}", ctx.accent().apply_to("RD Station"));
    println!(
        "  integration: {}",
        if ctx.settings.rdstation_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  token: {}",
        if ctx.settings.rdstation_token.is_empty() {
            "not configured"
        } else {
            "configured"
        }
    );
    println!("  endpoint: {}", ctx.cfg.rdstation.api_url);
    Ok(())
}

/// `prospect crm token <token>`
pub async fn run_token(ctx: &AppContext, token: &str) -> anyhow::Result<()> {
    ctx.store.set_rdstation_token(token).await?;
    if token.is_empty() {
        println!("Token cleared.");
    } else {
        println!("Token stored; integration enabled.");
    }
    Ok(())
}

/// `prospect crm enable` / `prospect crm disable`
pub async fn run_set_enabled(ctx: &AppContext, enabled: bool) -> anyhow::Result<()> {
    if enabled && ctx.settings.rdstation_token.is_empty() {
        bail!("{}", ProspectError::CrmNotConfigured);
    }
    ctx.store.set_rdstation_enabled(enabled).await?;
    println!(
        "RD Station integration {}.",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

/// `prospect crm send <phone> [...]`
pub async fn run_send(ctx: &AppContext, args: ContactArgs) -> anyhow::Result<()> {
    if ctx.settings.rdstation_token.is_empty() {
        bail!("{}", ProspectError::CrmNotConfigured);
    }

    let contact = Contact {
        phone: phone::canonicalize(&args.phone),
        name: args.name,
        email: args.email,
        company: args.company,
        cnpj: args.cnpj,
        tags: args.tags,
        notes: args.notes,
    };
    if contact.phone.is_empty() {
        bail!("not a phone number: {}", args.phone);
    }

    let client = RdStationClient::new(
        ctx.cfg.rdstation.api_url.clone(),
        ctx.settings.rdstation_token.clone(),
    );
    client.send_contact(&contact).await?;

    ctx.store
        .append_send(
            ctx.user_id(),
            &contact.phone,
            contact.notes.as_deref().unwrap_or("Contact added via Prospect"),
            SendKind::RdStation,
            contact.name.as_deref(),
            contact.email.as_deref(),
        )
        .await?;

    println!("Contact {} sent to RD Station.", contact.phone);
    Ok(())
}
