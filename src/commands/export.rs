use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::get_client;
use crate::{
    config::{self, ConfigFile},
    options::Global,
};

#[derive(Debug, Args)]
pub struct ExportOptions {
    /// The path of the result to export, as shown in the browser's address
    /// bar when viewing it (e.g. '/schedule/result/2449/').
    pub reference: Option<String>,

    /// Where to save the CSV. A leading '~' refers to your home directory.
    /// Existing files are overwritten.
    #[clap(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn export(global: Global, options: ExportOptions) -> Result<()> {
    let config_file = ConfigFile::load(&global)?;
    let client = get_client(&global, &config_file)?;

    let reference = config::result_reference(options.reference, &config_file);
    let output = config::output_path(options.output, &config_file);

    let url = match client.resolve_csv_url(&reference).await {
        Ok(url) => url,
        Err(err) => {
            println!();
            println!("Failure. The CSV download URL could not be found.");
            println!("   Check the logs above for details on what went wrong.");
            return Err(err.into());
        }
    };

    println!();
    println!("Success! Found the CSV download URL: {}", url);

    let summary = client.download_csv(&url, &output).await?;

    println!();
    println!("Download complete! File saved to: {}", summary.path.display());

    Ok(())
}
