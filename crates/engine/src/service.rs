//! The single I/O seam of the engine.
//!
//! The surrounding application supplies the transport (HTTP client,
//! in-process service, test double); the engine only needs a callable
//! that takes a query request plus a cancellation token and returns rows
//! or a typed failure.

use async_trait::async_trait;
use contracts::reports::{QueryRequest, QueryResponse};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Outcome taxonomy of a fetch.
///
/// Cancellation is not a failure: it occurs when a slot's operation is
/// superseded and must never reach an error display or failure log.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The operation was superseded or aborted; silent no-op for callers
    #[error("operation cancelled")]
    Cancelled,
    /// Transport or service failure; retriable per slot
    #[error("query service error: {message}")]
    Service { message: String },
}

impl FetchError {
    /// Service failure with a message
    pub fn service(message: impl Into<String>) -> Self {
        FetchError::Service {
            message: message.into(),
        }
    }

    /// Classify a raw transport error message. Abort-flavored errors are
    /// cancellations, everything else is a surfaced failure.
    pub fn from_service_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if lowered.contains("abort") || lowered.contains("cancel") {
            FetchError::Cancelled
        } else {
            FetchError::Service { message }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Remote generic query endpoint: "query by table + filter descriptor".
///
/// Implementations must honor the cancellation token cooperatively and
/// should map transport-level aborts to [`FetchError::Cancelled`]
/// (see [`FetchError::from_service_message`]).
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn run_query(
        &self,
        request: QueryRequest,
        cancel: CancellationToken,
    ) -> Result<QueryResponse, FetchError>;
}

/// Dispatch a query racing the operation's own token, optionally under a
/// hard timeout. The token side always maps to `Cancelled`; an elapsed
/// timeout is a service failure.
pub(crate) async fn run_cancellable<S: QueryService + ?Sized>(
    service: &S,
    request: QueryRequest,
    token: &CancellationToken,
    timeout: Option<std::time::Duration>,
) -> Result<QueryResponse, FetchError> {
    if token.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    let query = service.run_query(request, token.clone());
    match timeout {
        Some(limit) => tokio::select! {
            _ = token.cancelled() => Err(FetchError::Cancelled),
            timed = tokio::time::timeout(limit, query) => match timed {
                Ok(result) => result,
                Err(_) => Err(FetchError::service("query timed out")),
            },
        },
        None => tokio::select! {
            _ = token.cancelled() => Err(FetchError::Cancelled),
            result = query => result,
        },
    }
}
