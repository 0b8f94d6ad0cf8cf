mod download;
mod resolve;

use std::{fmt, future::Future, io, path::PathBuf, time::Duration};

use anyhow::Result;
use reqwest::{redirect, Client, StatusCode};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::{auth_token::default_headers, config::ExportConfig};

use resolve::EXECUTION_RESULT_MARKER;

#[derive(Debug, Error)]
pub enum AlationApiError {
    #[error("Alation API HTTP error")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("no response from {url} after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("the result reference cannot be empty")]
    EmptyReference,

    #[error("'{url}' is not a valid URL")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("expected a 302 redirect, but Alation returned HTTP {status}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("redirect (302) received, but no 'Location' header was found")]
    MissingLocation,

    #[error(
        "redirect location '{location}' does not contain '{}' exactly once",
        EXECUTION_RESULT_MARKER
    )]
    UnrecognizedRedirect { location: String },

    #[error("CSV download failed with HTTP {status}: {body}")]
    DownloadStatus { status: StatusCode, body: String },

    #[error("could not write CSV file {}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Client for the two Alation endpoints involved in exporting a result. One
/// instance is built per run, after the token has been validated.
pub struct AlationClient {
    config: ExportConfig,
    client: Client,
    no_redirect: Client,
}

impl fmt::Debug for AlationClient {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "AlationClient({})", self.config.base_url)
    }
}

impl AlationClient {
    pub fn new(config: ExportConfig, token: &SecretString) -> Result<Self> {
        let headers = default_headers(token, &config.user_agent)?;

        if config.insecure {
            log::warn!(
                "TLS certificate verification is disabled, traffic to {} can be intercepted",
                config.base_url
            );
        }

        let builder = || {
            Client::builder()
                .default_headers(headers.clone())
                .connect_timeout(config.timeout)
                .danger_accept_invalid_certs(config.insecure)
        };

        let client = builder().build().map_err(AlationApiError::from)?;
        let no_redirect = builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(AlationApiError::from)?;

        Ok(Self {
            config,
            client,
            no_redirect,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Whether `url` has the same scheme, host and port as the configured
    /// instance, i.e. whether requests to it stay on Alation.
    pub fn is_same_origin(&self, url: &Url) -> bool {
        match Url::parse(&self.config.base_url) {
            Ok(base) => base.origin() == url.origin(),
            Err(_) => false,
        }
    }

    /// Bounds a single network step by the configured timeout.
    async fn with_timeout<F, T>(&self, url: &Url, step: F) -> Result<T, AlationApiError>
    where
        F: Future<Output = reqwest::Result<T>>,
    {
        match tokio::time::timeout(self.config.timeout, step).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AlationApiError::Timeout {
                url: url.to_string(),
                after: self.config.timeout,
            }),
        }
    }
}

/// Formats a response body for the log. Alation is asked for JSON errors, so
/// those are pretty printed; anything else is passed through.
pub(crate) fn display_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_owned()),
        Err(_) => body.to_owned(),
    }
}
