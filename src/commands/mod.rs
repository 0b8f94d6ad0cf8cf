mod download_csv;
mod export;
mod resolve_url;

use anyhow::Result;
use clap::Subcommand;
pub use download_csv::*;
pub use export::*;
pub use resolve_url::*;

use crate::{
    alation_api::AlationClient,
    auth_token::get_api_token,
    config::{ConfigFile, ExportConfig},
    options::Global,
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Finds the CSV download link for a scheduled query result, then saves
    /// the CSV to disk.
    Export(ExportOptions),

    /// Finds the CSV download link for a scheduled query result and prints it
    /// to stdout without downloading anything.
    ResolveUrl(ResolveUrlOptions),

    /// Downloads a CSV from a link printed by `resolve-url`.
    Download(DownloadCsvOptions),
}

/// Validates the token and builds the client every command talks to Alation
/// through. No requests are made here.
fn get_client(global: &Global, config_file: &ConfigFile) -> Result<AlationClient> {
    let token = get_api_token(global.token.as_ref())?;
    let config = ExportConfig::new(global, config_file)?;

    log::debug!("using Alation instance at {}", config.base_url);

    AlationClient::new(config, token)
}
