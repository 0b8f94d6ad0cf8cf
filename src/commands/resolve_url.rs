use anyhow::Result;
use clap::Args;

use super::get_client;
use crate::{
    config::{self, ConfigFile},
    options::Global,
};

#[derive(Debug, Args)]
pub struct ResolveUrlOptions {
    /// The path of the result to resolve (e.g. '/schedule/result/2449/').
    pub reference: Option<String>,
}

pub async fn resolve_url(global: Global, options: ResolveUrlOptions) -> Result<()> {
    let config_file = ConfigFile::load(&global)?;
    let client = get_client(&global, &config_file)?;

    let reference = config::result_reference(options.reference, &config_file);
    let url = client.resolve_csv_url(&reference).await?;

    println!("{}", url);

    Ok(())
}
