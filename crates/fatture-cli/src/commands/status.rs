//! Status command - collections, ready matches, and pending documents.

use clap::Args;
use console::style;

use fatture_core::compute_matches;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: StatusFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StatusFormat {
    /// Human-readable summary
    Text,
    /// Full match report as JSON
    Json,
}

pub fn run(args: StatusArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let (repo, _) = super::open(&config)?;

    let report = compute_matches(repo.data());

    match args.format {
        StatusFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatusFormat::Text => {
            let stats = report.stats(repo.data());

            println!("{}", style("Collections").bold());
            println!("  estimates:       {}", stats.estimates);
            println!("  purchase orders: {}", stats.orders);
            println!("  invoices issued: {}", stats.invoiced);
            println!();

            println!("{} ({})", style("Ready to invoice").bold(), stats.ready);
            for m in &report.matches {
                println!(
                    "  case {}  PO {}  plate {}  total {}",
                    m.estimate.pratica_hertz.as_deref().unwrap_or("-"),
                    m.order.po_number.as_deref().unwrap_or("-"),
                    m.estimate.targa.as_deref().unwrap_or("-"),
                    m.estimate.totale,
                );
            }

            if !report.pending_estimates.is_empty() {
                println!();
                println!(
                    "{} ({})",
                    style("Estimates waiting for an order").bold(),
                    stats.pending_estimates
                );
                for e in &report.pending_estimates {
                    println!(
                        "  case {}  {}",
                        e.pratica_hertz.as_deref().unwrap_or("-"),
                        e.filename
                    );
                }
            }

            if !report.pending_orders.is_empty() {
                println!();
                println!(
                    "{} ({})",
                    style("Orders waiting for an estimate").bold(),
                    stats.pending_orders
                );
                for po in &report.pending_orders {
                    println!(
                        "  PO {}  case {}  {}",
                        po.po_number.as_deref().unwrap_or("-"),
                        po.pratica_hertz.as_deref().unwrap_or("-"),
                        po.filename
                    );
                }
            }
        }
    }

    Ok(())
}
