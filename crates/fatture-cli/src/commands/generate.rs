//! Generate command - issue invoices for ready matches.

use clap::Args;
use console::style;

use fatture_core::compute_matches;

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Case id of the match to invoice
    #[arg(short, long, conflicts_with = "all")]
    pratica: Option<String>,

    /// Invoice every ready match, oldest purchase order first
    #[arg(long)]
    all: bool,
}

pub fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let (mut repo, generator) = super::open(&config)?;

    if args.all {
        let ready = compute_matches(repo.data()).matches.len();
        if ready == 0 {
            println!("{} Nothing to invoice", style("ℹ").blue());
            return Ok(());
        }

        let outcome = generator.generate_all(&mut repo);

        for record in &outcome.generated {
            println!(
                "{} {}/{}  PO {}  total {}  -> {}",
                style("✓").green(),
                record.numero_fattura,
                record.tipo.suffix(),
                record.po_number,
                record.totale,
                record.filename
            );
        }
        for (case, error) in &outcome.failures {
            println!("{} case {}: {}", style("✗").red(), case, error);
        }

        println!();
        println!(
            "{} {} invoices generated, {} failed",
            style("ℹ").blue(),
            outcome.generated.len(),
            outcome.failures.len()
        );
        return Ok(());
    }

    let Some(pratica) = args.pratica else {
        anyhow::bail!("Pass --pratica <case-id> or --all");
    };

    let record = generator.generate(&mut repo, &pratica)?;
    println!(
        "{} Invoice {}/{} for PO {} written to {}",
        style("✓").green(),
        record.numero_fattura,
        record.tipo.suffix(),
        record.po_number,
        generator.output_dir().join(&record.filename).display()
    );

    Ok(())
}
