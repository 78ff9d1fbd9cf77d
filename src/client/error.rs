//! Error categories for remote service calls.

use derive_more::{Display, Error};
use tracing::{error, instrument};

/// Why a remote call failed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ServiceErrorKind {
    /// The request did not complete: unreachable, timed out, or an HTTP
    /// error status without an error payload.
    #[display("network failure: {_0}")]
    Network(String),
    /// The service answered but the body was missing expected fields.
    #[display("malformed response: {_0}")]
    Malformed(String),
    /// The service refused the request and said why.
    #[display("rejected: {_0}")]
    Rejected(String),
}

/// Service error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Service error: {} at {}:{}", kind, file, line)]
pub struct ServiceError {
    /// Category and detail.
    pub kind: ServiceErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServiceError {
    /// Creates a new service error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_kind = %kind, "Service error created");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Request could not complete.
    #[track_caller]
    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Network(detail.into()))
    }

    /// Response lacked expected fields.
    #[track_caller]
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Malformed(detail.into()))
    }

    /// Service refused with a reason.
    #[track_caller]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Rejected(reason.into()))
    }

    /// Whether the service itself refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self.kind, ServiceErrorKind::Rejected(_))
    }

    /// Text to show the user: the service's reason for a rejection,
    /// `fallback` for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        match &self.kind {
            ServiceErrorKind::Rejected(reason) => reason.clone(),
            ServiceErrorKind::Network(_) | ServiceErrorKind::Malformed(_) => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::malformed(format!("Failed to decode body: {}", err))
        } else if err.is_timeout() {
            Self::network(format!("Request timed out: {}", err))
        } else {
            Self::network(format!("Request failed: {}", err))
        }
    }
}
