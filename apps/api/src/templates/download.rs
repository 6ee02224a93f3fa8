//! Fetches template content from a remote URL for `POST /api/templates/import-url`.

use std::time::Duration;

use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

/// Remote templates are small documents; a slow host is treated as a failure.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Only absolute http(s) URLs are accepted.
pub fn parse_template_url(raw: &str) -> Result<Url, DownloadError> {
    let url = Url::parse(raw.trim()).map_err(|_| DownloadError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DownloadError::UnsupportedScheme(other.to_string())),
    }
}

/// GETs the URL and returns the body text. Non-2xx statuses are errors.
pub async fn download_template(url: &Url, timeout: Duration) -> Result<String, DownloadError> {
    let client = Client::builder().timeout(timeout).build()?;
    let body = client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!("Downloaded {} bytes of template content from {url}", body.len());
    Ok(body)
}
