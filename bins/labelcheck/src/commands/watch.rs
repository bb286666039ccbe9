//! Continuous scanning from standard input
//!
//! Hardware barcode scanners type the code followed by Enter, so every
//! non-empty line starts a new scan. Lookups run on spawned tasks and report
//! back over a channel; the session drops any result whose scan has since
//! been superseded.

use crate::context::AppContext;
use anyhow::Result;
use labelcheck_api_client::OpenFoodFactsClient;
use labelcheck_cli::{Status, render};
use labelcheck_core::allergens;
use labelcheck_core::session::{ScanSession, ScanToken};
use labelcheck_core::{Error, LookupError, ProductRecord};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

type Completion = (ScanToken, Result<ProductRecord, LookupError>);

/// A line read from stdin
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Barcode(&'a str),
    Clear,
    Retry,
    Toggle(&'a str),
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Option<Input<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(command) = line.strip_prefix(':') else {
        return Some(Input::Barcode(line));
    };

    let mut parts = command.split_whitespace();
    Some(match (parts.next(), parts.next()) {
        (Some("clear"), None) => Input::Clear,
        (Some("retry"), None) => Input::Retry,
        (Some("toggle"), Some(code)) => Input::Toggle(code),
        _ => Input::Unknown(line),
    })
}

struct Watcher<'a> {
    ctx: &'a AppContext,
    client: OpenFoodFactsClient,
    session: ScanSession,
    last_barcode: Option<String>,
    tx: mpsc::UnboundedSender<Completion>,
}

impl Watcher<'_> {
    fn start(&mut self, barcode: &str) -> Result<()> {
        let token = self.session.begin(barcode);
        self.last_barcode = Some(barcode.to_string());
        self.show()?;

        let client = self.client.clone();
        let tx = self.tx.clone();
        let barcode = barcode.to_string();
        tokio::spawn(async move {
            let result = client.products().fetch_by_barcode(&barcode).await;
            // Receiver gone means we are shutting down
            let _ = tx.send((token, result));
        });
        Ok(())
    }

    fn finish(&mut self, (token, result): Completion) -> Result<()> {
        let selected = self.ctx.selected();
        if self.session.complete(token, result, &selected) {
            self.show()?;
        } else {
            debug!(token = %token, "Ignored result of a superseded scan");
        }
        Ok(())
    }

    fn toggle(&mut self, input: &str) -> Result<()> {
        let entry = allergens::resolve(input).ok_or_else(|| Error::unknown_allergen(input))?;
        let selected = self.ctx.store.toggle(entry.code)?;

        if !self.ctx.format.is_json() {
            let action = if selected.contains(entry.code) { "Selected" } else { "Removed" };
            Status::success(&format!("{action} {}", entry.display_name(self.ctx.locale)));
        }

        self.session.reevaluate(&selected);
        if self.session.state().token().is_some() && !self.session.state().is_loading() {
            self.show()?;
        }
        Ok(())
    }

    fn handle(&mut self, input: Input<'_>) -> Result<()> {
        match input {
            Input::Barcode(barcode) => self.start(barcode)?,
            Input::Clear => {
                self.session.clear();
                self.show()?;
                if !self.ctx.format.is_json() {
                    Status::info("Ready for the next product");
                }
            }
            Input::Retry => match self.last_barcode.clone() {
                Some(barcode) => self.start(&barcode)?,
                None => Status::warning("Nothing to retry yet"),
            },
            Input::Toggle(code) => {
                // A typo should not end the session
                if let Err(e) = self.toggle(code) {
                    Status::error(&e.to_string());
                }
            }
            Input::Unknown(line) => {
                Status::warning(&format!("Unknown command: {line} (try :clear, :retry, :toggle <code>)"));
            }
        }
        Ok(())
    }

    fn show(&self) -> Result<()> {
        let state = self.session.state();
        if self.ctx.format.is_json() {
            // One document per line so the stream stays parseable
            println!("{}", serde_json::to_string(state)?);
        } else if let Some(text) = render::state(state, self.ctx.locale) {
            println!("{text}");
            if !state.is_loading() {
                println!();
            }
        }
        Ok(())
    }
}

/// Scan barcodes from stdin until EOF
pub async fn run(ctx: &AppContext) -> Result<ExitCode> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut watcher = Watcher {
        ctx,
        client: ctx.client()?,
        session: ScanSession::new(),
        last_barcode: None,
        tx,
    };

    if !ctx.format.is_json() {
        Status::info("Scan a barcode (one per line, Ctrl-D to quit)");
        println!("{}", render::selection_summary(&ctx.selected(), ctx.locale));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    if let Some(input) = parse_line(&line) {
                        watcher.handle(input)?;
                    }
                }
                None => stdin_open = false,
            },
            Some(completion) = rx.recv() => watcher.finish(completion)?,
        }

        // After EOF, wait only for the scan still on screen
        if !stdin_open && !watcher.session.state().is_loading() {
            break;
        }
    }

    Ok(ExitCode::SUCCESS)
}
