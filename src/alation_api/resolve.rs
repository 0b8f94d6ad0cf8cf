use reqwest::{header::LOCATION, StatusCode};
use url::Url;

use super::{display_body, AlationApiError, AlationClient};

/// Path segment of the page a scheduled result redirects to.
pub const EXECUTION_RESULT_MARKER: &str = "/execution_result/";

/// Path segment of the endpoint that serves the same result as table data.
pub const RESULT_TABLE_DATA_MARKER: &str = "/ajax/get_result_table_data/";

impl AlationClient {
    /// Follows the redirect issued for a scheduled query result and returns the
    /// URL its data can be downloaded from as CSV.
    ///
    /// Only one request is made: the redirect is read but never followed.
    pub async fn resolve_csv_url(&self, reference: &str) -> Result<Url, AlationApiError> {
        if reference.is_empty() {
            log::error!("The result reference cannot be empty.");
            return Err(AlationApiError::EmptyReference);
        }

        let raw_url = format!("{}{}", self.config.base_url, reference);
        let initial_url = Url::parse(&raw_url).map_err(|source| AlationApiError::InvalidUrl {
            url: raw_url.clone(),
            source,
        })?;

        log::info!("Attempting to get redirect from: {}", initial_url);

        let response = self
            .with_timeout(&initial_url, self.no_redirect.get(initial_url.clone()).send())
            .await?;

        let status = response.status();
        if status != StatusCode::FOUND {
            let body = self.with_timeout(&initial_url, response.text()).await?;

            log::error!(
                "Expected a 302 redirect, but got status code: {}",
                status.as_u16()
            );
            log::error!("Response Body: {}", display_body(&body));

            return Err(AlationApiError::UnexpectedStatus { status, body });
        }

        let location = match response.headers().get(LOCATION) {
            Some(value) if !value.is_empty() => {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            }
            _ => {
                log::error!("Redirect (302) received, but no 'Location' header was found.");
                return Err(AlationApiError::MissingLocation);
            }
        };

        log::info!("Successfully received redirect to: {}", location);

        match csv_export_url(&self.config.base_url, &location) {
            Ok(url) => {
                log::info!("Constructed final CSV download URL: {}", url);
                Ok(url)
            }
            Err(err @ AlationApiError::UnrecognizedRedirect { .. }) => {
                log::warn!(
                    "Redirect location was '{}', which does not contain '{}' exactly once. \
                     The URL rewrite may need adjusting for this Alation version.",
                    location,
                    EXECUTION_RESULT_MARKER
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

/// Rewrites a redirect target from the execution result page to the table
/// data endpoint, on `base_url`, with the `csv=1` flag set.
///
/// `location` must contain [`EXECUTION_RESULT_MARKER`] exactly once. It may be
/// relative or absolute; an absolute target is reduced to its path and query.
/// Existing query parameters are kept.
pub fn csv_export_url(base_url: &str, location: &str) -> Result<Url, AlationApiError> {
    let unrecognized = || AlationApiError::UnrecognizedRedirect {
        location: location.to_owned(),
    };

    let relative = match Url::parse(location) {
        Ok(absolute) => match absolute.query() {
            Some(query) => format!("{}?{}", absolute.path(), query),
            None => absolute.path().to_owned(),
        },
        Err(_) => location.to_owned(),
    };

    if relative.matches(EXECUTION_RESULT_MARKER).count() != 1 {
        return Err(unrecognized());
    }

    let mut rewritten = relative.replacen(EXECUTION_RESULT_MARKER, RESULT_TABLE_DATA_MARKER, 1);
    if !rewritten.starts_with('/') {
        rewritten.insert(0, '/');
    }

    let raw_url = format!("{}{}", base_url.trim_end_matches('/'), rewritten);
    let mut url = Url::parse(&raw_url).map_err(|source| AlationApiError::InvalidUrl {
        url: raw_url.clone(),
        source,
    })?;

    url.query_pairs_mut().append_pair("csv", "1");

    Ok(url)
}
