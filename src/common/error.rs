//! Error types for hasig

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Construction Errors ===
    #[error("Cannot use more than 3 {0} services")]
    TooManyServices(crate::backend::Role),

    // === Coordinator Errors ===
    #[error("Sub-services are missing")]
    NoServices,

    #[error("HA service request timed out")]
    Timeout,

    #[error("All sub-requests failed")]
    AllFailed(Vec<Error>),

    #[error("Using sub-service failed: {source}")]
    SubService {
        address: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Could not get aggregator configuration")]
    NoAggregatorConfig,

    #[error("Could not get extender configuration")]
    NoExtenderConfig,

    // === Backend Errors ===
    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("Server error {status}: {message}")]
    Server { status: u64, message: String },

    #[error("Could not get request response of type {0}")]
    UnexpectedResponse(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

// Change-notification events carry an owned copy of the error that emptied
// the config cache. `io::Error` is not `Clone`, so the clone keeps its kind
// and message but drops the inner source.
impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Error::TooManyServices(role) => Error::TooManyServices(*role),
            Error::NoServices => Error::NoServices,
            Error::Timeout => Error::Timeout,
            Error::AllFailed(errors) => Error::AllFailed(errors.clone()),
            Error::SubService { address, source } => Error::SubService {
                address: address.clone(),
                source: source.clone(),
            },
            Error::NoAggregatorConfig => Error::NoAggregatorConfig,
            Error::NoExtenderConfig => Error::NoExtenderConfig,
            Error::Transport(message) => Error::Transport(message.clone()),
            Error::Server { status, message } => Error::Server {
                status: *status,
                message: message.clone(),
            },
            Error::UnexpectedResponse(kind) => Error::UnexpectedResponse(kind),
            Error::Io(error) => Error::Io(std::io::Error::new(error.kind(), error.to_string())),
            Error::Internal(message) => Error::Internal(message.clone()),
        }
    }
}

impl Error {
    /// Is this a retryable error?
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Timeout | Error::Transport(_) | Error::AllFailed(_) | Error::Io(_)
        )
    }

    /// Per-replica failures carried by an [`Error::AllFailed`], empty otherwise.
    pub fn sub_errors(&self) -> &[Error] {
        match self {
            Error::AllFailed(errors) => errors,
            _ => &[],
        }
    }

    /// Wrap a replica failure, keeping the endpoint and the original cause.
    pub(crate) fn sub_service(address: impl Into<String>, source: Error) -> Self {
        Error::SubService {
            address: address.into(),
            source: Box::new(source),
        }
    }
}
