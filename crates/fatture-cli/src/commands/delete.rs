//! Delete command - remove documents or issued invoices.

use clap::{Args, Subcommand};
use console::style;

use fatture_core::DocumentKind;

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    #[command(subcommand)]
    command: DeleteCommand,
}

#[derive(Subcommand)]
enum DeleteCommand {
    /// Delete one active document by id
    Document {
        /// Document kind
        #[arg(long, value_enum)]
        kind: Kind,

        /// Record id
        #[arg(long)]
        id: String,
    },
    /// Delete one issued invoice (record and rendered file)
    Invoice {
        /// Invoice file name
        filename: String,
    },
    /// Delete every issued invoice (records and rendered files)
    AllInvoices,
    /// Remove all active documents; issued invoices are kept
    ClearActive,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Kind {
    /// Supplier estimate
    Estimate,
    /// Purchase order
    Order,
}

impl From<Kind> for DocumentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Estimate => DocumentKind::Estimate,
            Kind::Order => DocumentKind::PurchaseOrder,
        }
    }
}

pub fn run(args: DeleteArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let (mut repo, generator) = super::open(&config)?;

    match args.command {
        DeleteCommand::Document { kind, id } => {
            if repo.delete_document(kind.into(), &id)? {
                println!("{} Document {} deleted", style("✓").green(), id);
            } else {
                anyhow::bail!("No document with id {}", id);
            }
        }
        DeleteCommand::Invoice { filename } => {
            if generator.delete_invoice(&mut repo, &filename)? {
                println!("{} Invoice {} deleted", style("✓").green(), filename);
            } else {
                anyhow::bail!("No invoice named {}", filename);
            }
        }
        DeleteCommand::AllInvoices => {
            let deleted = generator.delete_all_invoices(&mut repo)?;
            println!("{} {} invoices deleted", style("✓").green(), deleted);
        }
        DeleteCommand::ClearActive => {
            repo.clear_active()?;
            println!("{} Active documents cleared", style("✓").green());
        }
    }

    Ok(())
}
