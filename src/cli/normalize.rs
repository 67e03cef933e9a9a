use clap::Args;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::core::identifier::CanonicalIdentifier;
use crate::normalize::date;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Raw identifier (NDC or GTIN) or, with --date, a date string
    #[arg(required = true)]
    pub value: String,

    /// Treat the value as a date instead of a product identifier
    #[arg(long)]
    pub date: bool,
}

/// Execute the normalize subcommand: a debugging aid for the upstream
/// extraction pipeline.
///
/// # Errors
///
/// Returns an error only if JSON output fails to serialize; failed
/// normalization is ordinary output, not an error.
pub fn run(args: NormalizeArgs, format: OutputFormat) -> anyhow::Result<()> {
    if args.date {
        let parsed = date::parse_date(&args.value);
        match format {
            OutputFormat::Text => match parsed {
                Some(d) => println!("{} -> {d}", args.value),
                None => println!("{} -> unparseable", args.value),
            },
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "raw": args.value,
                    "date": parsed,
                }))?
            ),
        }
        return Ok(());
    }

    let id = CanonicalIdentifier::parse(&args.value);
    match format {
        OutputFormat::Text => {
            println!("{} -> {} ({:?})", id.raw, id.canonical_text(), id.kind);
            if id.is_low_confidence() {
                println!("  low confidence: no recognized NDC/GTIN shape");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&id)?),
    }

    Ok(())
}
