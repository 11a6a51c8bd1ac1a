use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level failure: connect, timeout, TLS, body read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered with a status the caller did not expect.
    #[error("{context} returned status {status}")]
    Status { context: &'static str, status: u16 },
}

impl SourceError {
    pub fn status(context: &'static str, status: reqwest::StatusCode) -> Self {
        Self::Status {
            context,
            status: status.as_u16(),
        }
    }
}
