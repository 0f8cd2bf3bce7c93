use std::path::PathBuf;
use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur while running the
/// Cardsmith pipeline. It uses the `thiserror` crate for ergonomic error
/// handling and automatic conversion from underlying library errors.
///
/// # Error Conversion
///
/// Plumbing errors convert automatically using the `#[from]` attribute:
/// - `std::io::Error` → `AppError::Io`
/// - `serde_json::Error` → `AppError::Serialization`
///
/// Image and network errors are wrapped manually so they can carry the file
/// path or endpoint context needed to retry an item by hand.
#[derive(Error, Debug)]
pub enum AppError {
    /// The source file could not be decoded as an image.
    ///
    /// Raised before any output file is created, so a failed decode never
    /// leaves a partial derived file behind.
    #[error("Cannot decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The derived image could not be encoded or written.
    #[error("Cannot encode image {}: {source}", path.display())]
    ImageEncode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A sidecar description file exists but could not be read.
    ///
    /// Only raised for an existing file; a missing sidecar is not an error
    /// (the resolver falls back to a placeholder description).
    #[error("Cannot read sidecar file {}: {source}", path.display())]
    SidecarRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The endpoint answered, but not with a usable result.
    ///
    /// Covers non-2xx HTTP responses and 2xx responses whose GraphQL body
    /// carries a non-empty `errors` array. The body is kept verbatim so the
    /// item can be retried manually.
    #[error("Publish failed with status {status}: {body}")]
    Publish { status: u16, body: String },

    /// Connection-level network failure (DNS, refused connection, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The configured endpoint is not a valid URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// Invalid pipeline parameters (zero width, out-of-range quality).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    ///
    /// Typically raised when the guild-upgrade input file is malformed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic application error for cases not covered by specific variants.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ImageDecode { path, .. } => {
                format!(
                    "Cannot decode {} - the file may be corrupt or not an image.",
                    path.display()
                )
            }
            AppError::Publish { status, body } => {
                if *status >= 500 {
                    format!(
                        "The endpoint returned a server error (HTTP {}).\n   Response: {}",
                        status, body
                    )
                } else {
                    format!("Publish rejected (HTTP {}): {}", status, body)
                }
            }
            AppError::Network(msg) => {
                format!(
                    "Network error: {}\n   Check the endpoint URL and your connection.",
                    msg
                )
            }
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   The endpoint may be overloaded. Try again later.",
                    secs
                )
            }
            AppError::InvalidUrl(url) => {
                format!(
                    "Invalid endpoint URL: {}\n   Example: http://localhost:4000/graphql",
                    url
                )
            }
            AppError::Serialization(e) => {
                format!("Cannot parse JSON: {}", e)
            }
            _ => self.to_string(),
        }
    }
}
