use thiserror::Error;

/// Every way a fetch cycle can end in the `Failed` state.
///
/// The `Display` text of each variant is exactly the message stored in the
/// error record, so callers only ever need `err.to_string()`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The call could not complete and no response was obtained.
    #[error("{0}")]
    Transport(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// A response arrived with a status outside `200..=299`.
    #[error("Fetch error: {status} {status_text}")]
    Status { status: u16, status_text: String },
    /// The response claimed success but its body was not the expected shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}
