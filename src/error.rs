//! Error type shared by the controller and the processing endpoint.
//!
//! Two families matter to the UI:
//!
//! * input errors ([`UploadError::InvalidInput`], [`UploadError::Read`]) are
//!   local and leave the controller state untouched;
//! * request errors ([`UploadError::Request`], [`UploadError::Server`],
//!   [`UploadError::Parse`], [`UploadError::Worker`]) come back from a
//!   processing worker and roll the controller back so the user can retry.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// The selected file does not declare an `image/*` content type.
    #[error("'{name}' is not an image (type: {content_type})")]
    InvalidInput { name: String, content_type: String },

    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No image is staged for processing")]
    NoFileStaged,

    #[error("An image is already being processed")]
    Busy,

    #[error("There are no results to format yet")]
    NoResults,

    /// Connection refused, DNS failure, timeout and the like.
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server error ({status}){}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Server { status: u16, detail: Option<String> },

    /// The body was not the expected JSON shape.
    #[error("Malformed server response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid server URL '{0}'")]
    InvalidServerUrl(String),

    /// A background worker could not start or went away without reporting.
    #[error("Background worker failed: {0}")]
    Worker(String),
}
