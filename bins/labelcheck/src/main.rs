//! labelcheck - allergen check for scanned food products
//!
//! Looks products up in Open Food Facts by barcode and compares their
//! declared allergens with the user's selection.

use clap::{Args, Parser, Subcommand};
use labelcheck_cli::OutputFormat;
use labelcheck_core::Locale;
use owo_colors::{OwoColorize, Stream};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use commands::{allergens, check, scan, watch};
use context::AppContext;

/// Check scanned food products against your allergen list
#[derive(Parser)]
#[command(name = "labelcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Configuration file (defaults to labelcheck.toml lookup)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Language for product and allergen names (pl, en)
    #[arg(short, long, global = true)]
    pub locale: Option<Locale>,

    /// Directory holding allergen_preferences.json
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one product and check it against your allergens
    Scan {
        /// Product barcode (EAN/UPC)
        barcode: String,
    },

    /// Read barcodes from stdin, one per line, and check each
    ///
    /// Lines starting with ':' are commands: :clear, :retry, :toggle <code>
    Watch,

    /// Check allergen tags against your selection without a lookup
    Check {
        /// Allergen tags as found on a product, e.g. en:milk
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Manage your allergen selection
    Allergens {
        #[command(subcommand)]
        action: AllergensAction,
    },
}

#[derive(Subcommand)]
enum AllergensAction {
    /// Show all allergens and which ones are selected
    List,

    /// Select or deselect allergens
    Toggle {
        /// Codes such as en:milk, or milk
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Replace the selection
    Set {
        /// Codes such as en:milk, or milk
        codes: Vec<String>,
    },

    /// Remove all selected allergens
    Clear,

    /// Turn allergen checking on
    Enable,

    /// Turn allergen checking off
    Disable,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "labelcheck=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

async fn dispatch(cli: Cli) -> anyhow::Result<ExitCode> {
    let ctx = AppContext::load(&cli.global)?;

    match cli.command {
        Commands::Scan { barcode } => scan::run(&ctx, &barcode).await,
        Commands::Watch => watch::run(&ctx).await,
        Commands::Check { tags } => check::run(&ctx, &tags),
        Commands::Allergens { action } => match action {
            AllergensAction::List => allergens::list(&ctx),
            AllergensAction::Toggle { codes } => allergens::toggle(&ctx, &codes),
            AllergensAction::Set { codes } => allergens::set(&ctx, &codes),
            AllergensAction::Clear => allergens::clear(&ctx),
            AllergensAction::Enable => allergens::set_enabled(&ctx, true),
            AllergensAction::Disable => allergens::set_enabled(&ctx, false),
        },
    }
}

/// Exit code for a failed command, by error category
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    let code = err
        .downcast_ref::<labelcheck_core::Error>()
        .map_or(labelcheck_core::error::exit_codes::FAILURE, |e| e.exit_code());
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Structured report for `--format json`
fn print_error_report(err: &anyhow::Error) {
    let report = match err.downcast_ref::<labelcheck_core::Error>() {
        Some(e) => e.to_report(),
        None => labelcheck_core::Error::new(labelcheck_core::ErrorCode::Unknown, format!("{err:#}"))
            .to_report(),
    };
    if let Err(e) = labelcheck_cli::output::print_json(&serde_json::json!({ "error": report })) {
        tracing::warn!(error = %e, "Failed to encode error report");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    let format = cli.global.format;

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            if format.is_json() {
                print_error_report(&e);
            }
            eprintln!(
                "{} {}",
                "Error:".if_supports_color(Stream::Stderr, |t| t.red().bold().to_string()),
                e
            );
            exit_code_for(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "labelcheck", "allergens", "list", "--format", "json", "--locale", "en",
        ])
        .unwrap();
        assert!(cli.global.format.is_json());
        assert_eq!(cli.global.locale, Some(Locale::En));
    }

    #[test]
    fn test_check_requires_tags() {
        assert!(Cli::try_parse_from(["labelcheck", "check"]).is_err());
    }

    #[test]
    fn test_exit_code_for_validation_error() {
        let err = anyhow::Error::from(labelcheck_core::Error::unknown_allergen("x"));
        assert_eq!(exit_code_for(&err), ExitCode::from(2));
    }
}
