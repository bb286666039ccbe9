//! Offline evaluation of allergen tags

use crate::context::AppContext;
use anyhow::Result;
use labelcheck_cli::{output, render};
use labelcheck_core::safety;
use std::process::ExitCode;

/// Evaluate tags against the stored selection
pub fn run(ctx: &AppContext, tags: &[String]) -> Result<ExitCode> {
    let selected = ctx.selected();
    let verdict = safety::evaluate(Some(tags), &selected);

    if ctx.format.is_json() {
        output::print_json(&verdict)?;
    } else {
        println!("{}", render::verdict(&verdict, ctx.locale));
    }

    Ok(ExitCode::SUCCESS)
}
