use thiserror::Error;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/// Error type used throughout the crate.
///
/// The first five variants are raised by the in-memory prefix collection; the remaining variants
/// wrap failures from the collaborators that load the published JSON document.
#[derive(Debug, Error)]
pub enum Error {
    /// A malformed network, an empty field, or a value that is not present in the collection.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An IPv4 value was supplied where an IPv6 value is required (or vice versa).
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Records advertising the same network disagree on region or network border group.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// No published prefix contains the requested address or network.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The feed is missing a required field.
    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    /// The server answered with a 4xx or 5xx status code.
    #[error("HTTP {status}{}: {url}", .reason.as_ref().map(|r| format!(" {r}")).unwrap_or_default())]
    Http {
        status: u16,
        reason: Option<String>,
        url: String,
    },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ipnetwork::IpNetworkError> for Error {
    fn from(error: ipnetwork::IpNetworkError) -> Self {
        Error::InvalidArgument(error.to_string())
    }
}

impl Error {
    /// `true` for the recoverable lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/*--------------------------------------------------------------------------------------
  Log Error Function
--------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) fn log_error(error: &Error) {
    log::error!("{}", error);
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
