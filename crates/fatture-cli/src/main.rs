//! CLI for supplier document reconciliation and invoice generation.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{delete, generate, ingest, invoices, mailbox, numbering, status};

/// Reconcile supplier estimates with purchase orders and issue numbered
/// invoices
#[derive(Parser)]
#[command(name = "fatture")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest one or more PDF documents
    Ingest(ingest::IngestArgs),

    /// Show collections, ready matches, and pending documents
    Status(status::StatusArgs),

    /// Generate invoices for ready matches
    Generate(generate::GenerateArgs),

    /// List issued invoices
    Invoices(invoices::InvoicesArgs),

    /// Inspect or override the numbering counters
    Numbering(numbering::NumberingArgs),

    /// Mailbox-polling bookkeeping
    Mailbox(mailbox::MailboxArgs),

    /// Delete documents or issued invoices
    Delete(delete::DeleteArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Ingest(args) => ingest::run(args, cli.config.as_deref()),
        Commands::Status(args) => status::run(args, cli.config.as_deref()),
        Commands::Generate(args) => generate::run(args, cli.config.as_deref()),
        Commands::Invoices(args) => invoices::run(args, cli.config.as_deref()),
        Commands::Numbering(args) => numbering::run(args, cli.config.as_deref()),
        Commands::Mailbox(args) => mailbox::run(args, cli.config.as_deref()),
        Commands::Delete(args) => delete::run(args, cli.config.as_deref()),
    }
}
