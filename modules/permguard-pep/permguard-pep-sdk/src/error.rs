//! Error types for the `PermGuard` PEP client.
//!
//! A denied authorization decision is not an error: it is a successful
//! [`AZResponse`](crate::AZResponse) with `decision == false`.

use std::fmt;

use thiserror::Error;

/// A builder was asked to produce a value with a required field unset.
///
/// Raised synchronously by `build()`; a programmer error, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("missing required field: {field}")]
    MissingRequiredField { field: &'static str },
}

/// A native value could not be normalized into a [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// The native value nests deeper than `max_depth`, which is what a
    /// self-referencing graph looks like to a serializer.
    #[error("value graph is cyclic or nested deeper than {max_depth} levels")]
    CyclicValueGraph { max_depth: usize },
}

impl serde::ser::Error for CodecError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::UnsupportedValueType(msg.to_string())
    }
}

/// Classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The session could not be established.
    Connect,
    /// The PDP is unreachable or refused the call.
    Unavailable,
    /// The call did not complete before its deadline.
    DeadlineExceeded,
    /// The call was cancelled before a reply arrived.
    Cancelled,
    /// Any other protocol-level failure reported by the transport.
    Protocol,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connect => "connect",
            Self::Unavailable => "unavailable",
            Self::DeadlineExceeded => "deadline exceeded",
            Self::Cancelled => "cancelled",
            Self::Protocol => "protocol",
        };
        f.write_str(name)
    }
}

/// Failure of the underlying transport, carrying the original cause.
#[derive(Debug, Error)]
#[error("{kind} transport error: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TransportError {
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by [`PolicyDecisionClient::check`](crate::PolicyDecisionClient::check).
///
/// These represent request-shape and infrastructure failures only.
#[derive(Debug, Error)]
pub enum PepClientError {
    /// The request is structurally incomplete and cannot be serialized.
    #[error("invalid request shape: {reason}")]
    InvalidRequestShape { reason: String },

    /// The transport failed; the caller decides whether to retry.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The client was shut down before the call started.
    #[error("client is closed")]
    ClientClosed,
}

impl PepClientError {
    #[must_use]
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidRequestShape {
            reason: reason.into(),
        }
    }
}
