use std::path::PathBuf;

use crate::commands::Command;
use clap::Parser;
use secrecy::SecretString;

#[derive(Debug, Parser)]
#[clap(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Options {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Parser)]
pub struct Global {
    /// The Alation API token to authenticate with. If not specified, the
    /// token stored in the environment variable 'ALATION_API_TOKEN' is used.
    #[clap(
        long,
        global(true),
        env("ALATION_API_TOKEN"),
        hide_env_values(true)
    )]
    pub token: Option<SecretString>,

    /// The origin of the Alation instance, like
    /// 'https://example.alationcloud.com'.
    #[clap(long, global(true), env("ALATION_BASE_URL"))]
    pub base_url: Option<String>,

    /// A TOML file to read default settings from. Flags given on the command
    /// line take precedence over values in this file.
    #[clap(long, global(true))]
    pub config: Option<PathBuf>,

    /// Skips TLS certificate verification. Only use this against instances
    /// with self-signed certificates that you trust.
    #[clap(long, global(true))]
    pub insecure: bool,

    /// How many seconds to wait on the network before giving up.
    #[clap(long = "timeout", global(true), value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Sets verbosity level. Can be specified multiple times to increase the verbosity
    /// of this program.
    #[clap(long = "verbose", short, global(true), action(clap::ArgAction::Count))]
    pub verbosity: u8,
}
