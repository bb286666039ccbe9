//! Allergen selection management

use crate::context::AppContext;
use anyhow::Result;
use labelcheck_cli::output::{self, format_count};
use labelcheck_cli::render::{self, AllergenListing};
use labelcheck_cli::Status;
use labelcheck_core::allergens::{self, AllergenEntry};
use labelcheck_core::Error;
use std::collections::BTreeSet;
use std::process::ExitCode;

/// Resolve user input to catalog entries, rejecting the whole batch on any unknown code
fn resolve_all(inputs: &[String]) -> labelcheck_core::Result<Vec<&'static AllergenEntry>> {
    inputs
        .iter()
        .map(|input| allergens::resolve(input).ok_or_else(|| Error::unknown_allergen(input)))
        .collect()
}

fn print_listing(ctx: &AppContext, selected: &BTreeSet<String>) -> Result<()> {
    if ctx.format.is_json() {
        let enabled = ctx.store.allergens_enabled()?;
        output::print_json(&AllergenListing::new(selected, enabled, ctx.locale))?;
    } else {
        println!("{}", render::allergen_list(selected, ctx.locale));
    }
    Ok(())
}

/// `allergens list`
pub fn list(ctx: &AppContext) -> Result<ExitCode> {
    let selected = ctx.store.get_selected()?;
    print_listing(ctx, &selected)?;
    Ok(ExitCode::SUCCESS)
}

/// `allergens toggle <code>...`
pub fn toggle(ctx: &AppContext, codes: &[String]) -> Result<ExitCode> {
    let entries = resolve_all(codes)?;

    let mut selected = ctx.store.get_selected()?;
    for entry in &entries {
        selected = ctx.store.toggle(entry.code)?;
        if !ctx.format.is_json() {
            let action = if selected.contains(entry.code) { "Selected" } else { "Removed" };
            Status::success(&format!(
                "{action} {} ({})",
                entry.display_name(ctx.locale),
                entry.code
            ));
        }
    }

    if ctx.format.is_json() {
        print_listing(ctx, &selected)?;
    } else {
        println!("{}", render::selection_summary(&selected, ctx.locale));
    }
    Ok(ExitCode::SUCCESS)
}

/// `allergens set <code>...`
pub fn set(ctx: &AppContext, codes: &[String]) -> Result<ExitCode> {
    let selected: BTreeSet<String> = resolve_all(codes)?
        .into_iter()
        .map(|entry| entry.code.to_string())
        .collect();

    ctx.store.set_selected(&selected)?;

    if ctx.format.is_json() {
        print_listing(ctx, &selected)?;
    } else {
        Status::success(&format!(
            "Saved {}",
            format_count(selected.len(), "allergen", "allergens")
        ));
        println!("{}", render::selection_summary(&selected, ctx.locale));
    }
    Ok(ExitCode::SUCCESS)
}

/// `allergens clear`
pub fn clear(ctx: &AppContext) -> Result<ExitCode> {
    ctx.store.clear()?;

    if ctx.format.is_json() {
        print_listing(ctx, &BTreeSet::new())?;
    } else {
        Status::success("Removed all allergens");
    }
    Ok(ExitCode::SUCCESS)
}

/// `allergens enable` / `allergens disable`
pub fn set_enabled(ctx: &AppContext, enabled: bool) -> Result<ExitCode> {
    ctx.store.set_allergens_enabled(enabled)?;

    if ctx.format.is_json() {
        output::print_json(&serde_json::json!({ "allergens_enabled": enabled }))?;
    } else if enabled {
        Status::success("Allergen checking enabled");
    } else {
        Status::success("Allergen checking disabled");
    }
    Ok(ExitCode::SUCCESS)
}
