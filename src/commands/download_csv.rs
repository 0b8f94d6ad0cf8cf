use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use url::Url;

use super::get_client;
use crate::{
    alation_api::AlationApiError,
    config::{self, ConfigFile},
    options::Global,
};

#[derive(Debug, Args)]
pub struct DownloadCsvOptions {
    /// The full CSV download URL, including the 'csv=1' query flag.
    pub url: String,

    /// Where to save the CSV. A leading '~' refers to your home directory.
    /// Existing files are overwritten.
    #[clap(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn download_csv(global: Global, options: DownloadCsvOptions) -> Result<()> {
    let config_file = ConfigFile::load(&global)?;
    let client = get_client(&global, &config_file)?;

    let url = Url::parse(&options.url).map_err(|source| AlationApiError::InvalidUrl {
        url: options.url.clone(),
        source,
    })?;

    if !client.is_same_origin(&url) {
        log::warn!(
            "{} is not on {}, your API token will be sent to another host",
            url,
            client.base_url()
        );
    }

    let output = config::output_path(options.output, &config_file);
    let summary = client.download_csv(&url, &output).await?;

    println!("Download complete! File saved to: {}", summary.path.display());

    Ok(())
}
