use std::time::Duration;

use crate::QueryState;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum AthenaError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code without a recognizable service error body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Error reported by the remote service, e.g. `AccessDeniedException`.
    #[error("service error {status} ({code}): {message}")]
    Service {
        status: u16,
        /// Exception name with any namespace prefix removed.
        code: String,
        message: String,
    },
    /// Response decoding or protocol-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// Column declared with a type this crate cannot convert.
    #[error("unsupported column type '{0}'")]
    UnsupportedType(String),
    /// Execution reached a terminal state other than `SUCCEEDED`.
    #[error("query {execution_id} did not succeed: {state}\ndetails: {description}")]
    QueryFailed {
        execution_id: String,
        state: QueryState,
        /// `StateChangeReason` reported by the service, if any.
        reason: Option<String>,
        /// Raw execution description as returned by the service.
        description: String,
    },
    /// Polling gave up after the configured maximum wait.
    #[error("query {execution_id} still running after {waited:?}")]
    Timeout {
        execution_id: String,
        waited: Duration,
    },
    /// Polling was cancelled by the caller.
    #[error("waiting for query {execution_id} was cancelled")]
    Cancelled { execution_id: String },
    /// The runtime backing the blocking API could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),
}
