//! Phone list management: import, add, remove, list, clear.

use super::AppContext;
use prospect_core::phone;
use std::path::Path;

/// `prospect import <file>`
pub async fn run_import(ctx: &AppContext, file: &Path) -> anyhow::Result<()> {
    let existing = ctx.store.list_prospects().await?;
    let outcome = prospect_import::import_file(file, &existing)?;

    if outcome.nothing_new() {
        println!(
            "No new number to add. The file's valid numbers are already on the list \
             or normalized into numbers that are."
        );
        return Ok(());
    }

    let added = ctx.store.add_prospects(&outcome.added).await?;
    println!("{added} new number(s) imported.");
    Ok(())
}

/// `prospect add <number>`
///
/// Manual entry takes anything with at least one digit; the import
/// viability threshold applies to files only.
pub async fn run_add(ctx: &AppContext, number: &str) -> anyhow::Result<()> {
    let canonical = phone::canonicalize(number);
    if canonical.is_empty() {
        println!("Not a phone number: {number}");
        return Ok(());
    }

    if ctx.store.add_prospect(&canonical).await? {
        println!("Added {canonical}.");
    } else {
        println!("{canonical} is already on the list.");
    }
    Ok(())
}

/// `prospect remove <number>`
pub async fn run_remove(ctx: &AppContext, number: &str) -> anyhow::Result<()> {
    let canonical = phone::canonicalize(number);
    if ctx.store.remove_prospect(&canonical).await? {
        println!("Removed {canonical}.");
    } else {
        println!("{canonical} is not on the list.");
    }
    Ok(())
}

/// `prospect list`
pub async fn run_list(ctx: &AppContext) -> anyhow::Result<()> {
    let numbers = ctx.store.list_prospects().await?;
    if numbers.is_empty() {
        println!("The list is empty. Use `prospect add` or `prospect import`.");
        return Ok(());
    }

    println!(
        "{} ({}):",
        ctx.accent().apply_to("Numbers added"),
        numbers.len()
    );
    for number in numbers {
        println!("  {number}");
    }
    Ok(())
}

/// `prospect clear`
pub async fn run_clear(ctx: &AppContext, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let confirmed: bool = cliclack::confirm("Remove every number from the list?")
            .initial_value(false)
            .interact()?;
        if !confirmed {
            println!("Nothing removed.");
            return Ok(());
        }
    }

    let removed = ctx.store.clear_prospects().await?;
    println!("Removed {removed} number(s). Any in-flight batch is reset.");
    Ok(())
}
