//! Invoices command - list issued invoices.

use clap::Args;
use console::style;

/// Arguments for the invoices command.
#[derive(Args)]
pub struct InvoicesArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: InvoicesFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InvoicesFormat {
    /// Human-readable list
    Text,
    /// JSON array of records
    Json,
    /// CSV export
    Csv,
}

pub fn run(args: InvoicesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let (repo, _) = super::open(&config)?;

    let invoices = &repo.data().fatture_generate;

    match args.format {
        InvoicesFormat::Json => {
            println!("{}", serde_json::to_string_pretty(invoices)?);
        }
        InvoicesFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record([
                "numero_fattura",
                "tipo",
                "po_number",
                "pratica_hertz",
                "targa",
                "totale",
                "data_po",
                "filename",
            ])?;
            for f in invoices {
                wtr.write_record([
                    f.numero_fattura.to_string(),
                    f.tipo.suffix().to_string(),
                    f.po_number.clone(),
                    f.pratica_hertz.clone().unwrap_or_default(),
                    f.targa.clone(),
                    f.totale.to_string(),
                    f.data_po.map(|d| d.to_string()).unwrap_or_default(),
                    f.filename.clone(),
                ])?;
            }
            print!("{}", String::from_utf8(wtr.into_inner()?)?);
        }
        InvoicesFormat::Text => {
            if invoices.is_empty() {
                println!("{} No invoices issued yet", style("ℹ").blue());
                return Ok(());
            }
            for f in invoices {
                println!(
                    "{:>4}/{}  PO {}  case {}  total {}  {}",
                    f.numero_fattura,
                    f.tipo.suffix(),
                    f.po_number,
                    f.pratica_hertz.as_deref().unwrap_or("-"),
                    f.totale,
                    f.filename
                );
            }
        }
    }

    Ok(())
}
