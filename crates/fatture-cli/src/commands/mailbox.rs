//! Mailbox command - bookkeeping for the external mailbox poller.

use clap::{Args, Subcommand};
use console::style;

/// Arguments for the mailbox command.
#[derive(Args)]
pub struct MailboxArgs {
    #[command(subcommand)]
    command: MailboxCommand,
}

#[derive(Subcommand)]
enum MailboxCommand {
    /// Show the poller configuration and downloaded-PO count
    Show,
    /// Update the poller filters
    Set {
        /// Mailbox address
        #[arg(long)]
        email: String,

        /// Mailbox app password
        #[arg(long)]
        password: String,

        /// Only accept messages from this sender (empty = any)
        #[arg(long, default_value = "")]
        sender: String,

        /// Subject filter for candidate messages
        #[arg(long, default_value = "PO")]
        subject: String,
    },
    /// Forget which PO numbers were already downloaded
    ResetDownloads,
}

pub fn run(args: MailboxArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let (mut repo, _) = super::open(&config)?;

    match args.command {
        MailboxCommand::Show => {
            let mailbox = &repo.data().email_config;
            println!("email:          {}", mailbox.email);
            println!("sender filter:  {}", mailbox.mittente_filtro);
            println!("subject filter: {}", mailbox.oggetto_filtro);
            println!(
                "last check:     {}",
                mailbox.ultimo_controllo.as_deref().unwrap_or("never")
            );
            println!("downloaded POs: {}", mailbox.po_scaricati.len());
        }
        MailboxCommand::Set {
            email,
            password,
            sender,
            subject,
        } => {
            repo.set_mailbox_filters(email, password, sender, subject)?;
            println!("{} Mailbox configuration saved", style("✓").green());
        }
        MailboxCommand::ResetDownloads => {
            repo.reset_downloaded_pos()?;
            println!("{} Downloaded-PO list cleared", style("✓").green());
        }
    }

    Ok(())
}
