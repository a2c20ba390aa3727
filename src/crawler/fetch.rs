use log2::trace;
use reqwest::Client;
use std::time::Duration;

/// Ways a single page fetch can fail. All of them are local to one URL.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("unexpected http status {0}")]
    HttpStatus(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_builder() {
            FetchError::InvalidUrl(err.to_string())
        } else if err.is_body() || err.is_decode() {
            FetchError::InvalidResponse(err.to_string())
        } else {
            FetchError::Connection(err.to_string())
        }
    }
}

/// GET `url` and return the raw body. Any non-2xx status is an error.
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response.bytes().await.map_err(FetchError::from_reqwest)?;
    trace!("Fetched {} bytes from {}", body.len(), url);

    Ok(body.to_vec())
}
