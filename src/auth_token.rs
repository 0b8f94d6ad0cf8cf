//! Turns the Alation API token into the headers sent with every request.

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::config::ConfigError;

/// Alation reads the API token from this header rather than `Authorization`.
pub const TOKEN_HEADER: &str = "token";

pub fn get_api_token(token: Option<&SecretString>) -> Result<&SecretString, ConfigError> {
    match token {
        Some(token) if !token.expose_secret().trim().is_empty() => Ok(token),
        _ => Err(ConfigError::MissingToken),
    }
}

/// Builds the header set shared by every request in a run. Error bodies are
/// requested as JSON.
pub fn default_headers(token: &SecretString, user_agent: &str) -> Result<HeaderMap, ConfigError> {
    let mut token_value = HeaderValue::from_str(token.expose_secret().trim())
        .map_err(|_| ConfigError::InvalidToken)?;
    token_value.set_sensitive(true);

    let user_agent =
        HeaderValue::from_str(user_agent).map_err(|_| ConfigError::InvalidUserAgent)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, user_agent);
    headers.insert(HeaderName::from_static(TOKEN_HEADER), token_value);
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    Ok(headers)
}
