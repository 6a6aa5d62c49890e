//! Error types for schema acquisition

use std::time::Duration;

use pulumi_crd_core::DocumentError;
use thiserror::Error;

/// Schema acquisition errors
///
/// URL-bearing variants always carry the sanitized URL, never the raw input.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("read input schema \"{location}\": {cause}")]
    Read {
        location: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("fetch input schema \"{url}\": {cause}")]
    Http {
        url: String,
        #[source]
        cause: reqwest::Error,
    },

    #[error("fetch input schema \"{url}\": HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("fetch input schema \"{url}\": timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error(transparent)]
    Parse(#[from] DocumentError),

    #[error("load input schema \"{location}\": cancelled")]
    Cancelled { location: String },
}

impl FetchError {
    /// Whether the failure came from the caller aborting the load
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
