//! CLI subcommands.

pub mod delete;
pub mod generate;
pub mod ingest;
pub mod invoices;
pub mod mailbox;
pub mod numbering;
pub mod status;

use std::path::{Path, PathBuf};

use fatture_core::{AppConfig, InvoiceGenerator, JsonFileStore, Repository};

/// Load configuration: an explicit path wins, then the per-user config
/// file, then the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AppConfig> {
    if let Some(path) = config_path {
        return Ok(AppConfig::from_file(Path::new(path))?);
    }

    if let Some(path) = default_config_path() {
        if path.exists() {
            return Ok(AppConfig::from_file(&path)?);
        }
    }

    Ok(AppConfig::default())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fatture").join("config.json"))
}

/// Open the repository and generator described by the configuration.
pub fn open(config: &AppConfig) -> anyhow::Result<(Repository<JsonFileStore>, InvoiceGenerator)> {
    let repo = Repository::open(JsonFileStore::new(&config.data_file))?;
    let generator = InvoiceGenerator::new(&config.output_dir);
    Ok((repo, generator))
}
