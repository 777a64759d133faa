//! Numbering command - inspect or override the per-category counters.

use clap::{Args, Subcommand};
use console::style;

/// Arguments for the numbering command.
#[derive(Args)]
pub struct NumberingArgs {
    #[command(subcommand)]
    command: NumberingCommand,
}

#[derive(Subcommand)]
enum NumberingCommand {
    /// Show the current counters and year
    Show,
    /// Override the last-issued numbers for the current year
    Set {
        /// Last number issued in the tyres (HG) partition
        #[arg(long)]
        hg: u32,

        /// Last number issued in the other-work (HM) partition
        #[arg(long)]
        hm: u32,
    },
}

pub fn run(args: NumberingArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let (mut repo, _) = super::open(&config)?;

    match args.command {
        NumberingCommand::Show => {
            let numbering = &repo.data().config;
            println!("year: {}", numbering.year);
            println!("HG (tyres):  {}", numbering.last_number_hg);
            println!("HM (other):  {}", numbering.last_number_hm);
        }
        NumberingCommand::Set { hg, hm } => {
            repo.set_numbering(hg, hm)?;
            println!(
                "{} Counters set to HG={}, HM={}",
                style("✓").green(),
                hg,
                hm
            );
        }
    }

    Ok(())
}
