use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in the client core. None of these are fatal:
/// the screen layer is expected to show a message and let the user retry.
#[derive(Debug, Error)]
pub enum Error {
    /// A protected endpoint was called with no session set. Callers should
    /// route to the login screen. Raised locally, before any network traffic.
    #[error("not logged in")]
    AuthMissing,

    /// The request left the client but failed: either the connection itself
    /// broke (`status` is `None`) or the server answered with a non-2xx
    /// status. The response body, when one was readable, is kept for display.
    #[error("request failed{}", fmt_status(.status))]
    RequestFailed {
        status: Option<u16>,
        body: Option<String>,
    },

    /// An attachment's local path could not be read into bytes.
    #[error("cannot read attachment {path}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server refused a multipart upload. The body is surfaced verbatim
    /// so the screen layer can show the server's diagnostic.
    #[error("upload rejected (HTTP {status})")]
    UploadRejected { status: u16, body: Option<String> },

    /// Input rejected locally (empty message, password mismatch, blank room
    /// id). No network call was made.
    #[error("{0}")]
    ValidationFailed(String),

    /// Reading or writing the session/config file failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The configured base URL does not parse.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        Error::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_display_includes_status_when_present() {
        let with = Error::RequestFailed {
            status: Some(503),
            body: None,
        };
        assert_eq!(with.to_string(), "request failed (HTTP 503)");

        let without = Error::RequestFailed {
            status: None,
            body: None,
        };
        assert_eq!(without.to_string(), "request failed");
    }
}
