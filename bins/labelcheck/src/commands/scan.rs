//! Single product lookup

use crate::context::AppContext;
use anyhow::Result;
use labelcheck_cli::{Messages, output, progress, render};
use labelcheck_core::session::{ScanSession, ScanState};
use std::process::ExitCode;

/// Look up one barcode, print the outcome, exit 1 if no product was found
pub async fn run(ctx: &AppContext, barcode: &str) -> Result<ExitCode> {
    let client = ctx.client()?;
    let barcode = barcode.trim();

    let mut session = ScanSession::new();
    let token = session.begin(barcode);

    let spinner = if ctx.format.is_json() {
        progress::hidden()
    } else {
        progress::spinner(Messages::for_locale(ctx.locale).searching)
    };
    let result = client.products().fetch_by_barcode(barcode).await;
    progress::finish(&spinner);

    session.complete(token, result, &ctx.selected());
    let state = session.state();

    if ctx.format.is_json() {
        output::print_json(state)?;
    } else if let Some(text) = render::state(state, ctx.locale) {
        println!("{text}");
    }

    Ok(match state {
        ScanState::Loaded { .. } => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
