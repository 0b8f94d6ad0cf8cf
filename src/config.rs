//! Settings for a single export run, merged from command line flags, an
//! optional TOML file and built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fs_err as fs;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::options::Global;

pub const DEFAULT_BASE_URL: &str = "https://northstar.mtse.alationcloud.com";
pub const DEFAULT_RESULT_REFERENCE: &str = "/schedule/result/2449/";
pub const DEFAULT_OUTPUT_PATH: &str = "alation_results.csv";
pub const DEFAULT_USER_AGENT: &str = "Alation-API-Script/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FATAL: the 'ALATION_API_TOKEN' environment variable is not set")]
    MissingToken,

    #[error("the API token contains characters that cannot be sent in an HTTP header")]
    InvalidToken,

    #[error("the user agent contains characters that cannot be sent in an HTTP header")]
    InvalidUserAgent,

    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("the network timeout must be at least one second")]
    ZeroTimeout,

    #[error("base URL '{0}' cannot be used as an HTTP origin")]
    BaseUrlNotAnOrigin(String),

    #[error("could not read config file")]
    Read(#[from] std::io::Error),

    #[error("config file {} is not valid TOML", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of a config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub result: Option<String>,
    pub output: Option<PathBuf>,
    pub insecure: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Reads the file named by `--config`, or returns an empty config if none
    /// was given.
    pub fn load(global: &Global) -> Result<Self, ConfigError> {
        match &global.config {
            Some(path) => {
                log::debug!("reading config from {}", path.display());
                Self::read(path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Connection settings shared by both requests of a run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Origin of the Alation instance, without a trailing slash.
    pub base_url: String,
    pub insecure: bool,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ExportConfig {
    pub fn new(global: &Global, file: &ConfigFile) -> Result<Self, ConfigError> {
        let base_url = global
            .base_url
            .as_deref()
            .or(file.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL);

        let timeout = match global.timeout_secs.or(file.timeout_secs) {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            insecure: global.insecure || file.insecure.unwrap_or(false),
            timeout,
            user_agent: file
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        })
    }
}

/// Picks the result reference from the command line, then the config file,
/// then the built-in default.
pub fn result_reference(arg: Option<String>, file: &ConfigFile) -> String {
    arg.or_else(|| file.result.clone())
        .unwrap_or_else(|| DEFAULT_RESULT_REFERENCE.to_owned())
}

pub fn output_path(arg: Option<PathBuf>, file: &ConfigFile) -> PathBuf {
    arg.or_else(|| file.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH))
}

/// Validates the base URL and strips any trailing slash so that appending a
/// reference like `/schedule/result/1/` yields a single slash.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');

    let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_owned(),
        source,
    })?;

    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::BaseUrlNotAnOrigin(raw.to_owned()));
    }

    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> Global {
        Global {
            token: None,
            base_url: None,
            config: None,
            insecure: false,
            timeout_secs: None,
            verbosity: 0,
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ExportConfig::new(&global(), &ConfigFile::default()).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(!config.insecure);
    }

    #[test]
    fn command_line_beats_config_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            base_url = "https://file.example.com"
            timeout_secs = 5
            result = "/schedule/result/7/"
            "#,
        )
        .unwrap();

        let mut global = global();
        global.base_url = Some("https://flag.example.com/".to_owned());

        let config = ExportConfig::new(&global, &file).unwrap();
        assert_eq!(config.base_url, "https://flag.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));

        assert_eq!(result_reference(None, &file), "/schedule/result/7/");
        assert_eq!(
            result_reference(Some("/schedule/result/9/".to_owned()), &file),
            "/schedule/result/9/"
        );
        assert_eq!(output_path(None, &file), PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn insecure_can_come_from_either_source() {
        let file = ConfigFile {
            insecure: Some(true),
            ..ConfigFile::default()
        };
        assert!(ExportConfig::new(&global(), &file).unwrap().insecure);

        let mut global = global();
        global.insecure = true;
        assert!(ExportConfig::new(&global, &ConfigFile::default()).unwrap().insecure);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let file = ConfigFile {
            timeout_secs: Some(0),
            ..ConfigFile::default()
        };
        assert!(matches!(
            ExportConfig::new(&global(), &file),
            Err(ConfigError::ZeroTimeout)
        ));

        let mut global = global();
        global.timeout_secs = Some(0);
        assert!(matches!(
            ExportConfig::new(&global, &ConfigFile::default()),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn rejects_bad_base_urls() {
        let mut global = global();

        global.base_url = Some("not a url".to_owned());
        assert!(matches!(
            ExportConfig::new(&global, &ConfigFile::default()),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        global.base_url = Some("mailto:someone@example.com".to_owned());
        assert!(matches!(
            ExportConfig::new(&global, &ConfigFile::default()),
            Err(ConfigError::BaseUrlNotAnOrigin(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alation-export.toml");
        std::fs::write(&path, "base_uri = \"https://typo.example.com\"\n").unwrap();

        assert!(matches!(
            ConfigFile::read(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
