//! Error types for the item service.
//!
//! # Design
//! Each layer has its own enum: the validator returns `TitleError`, the id
//! parser `MalformedId`, stores `StoreError`. The façade folds them into
//! `ServiceError`, and `ServiceError::kind` is the only thing the transport
//! layer needs to pick a status code. Callers match on variants, never on
//! message text.

use std::time::Duration;

use thiserror::Error;

use crate::id::ItemId;
use crate::validate::{MAX_TITLE_LEN, MIN_TITLE_LEN};

/// Boxed error from a storage backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a title was rejected. Lengths are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("title is empty")]
    Empty,

    #[error("title is too short: {len} characters, minimum is {MIN_TITLE_LEN}")]
    TooShort { len: usize },

    #[error("title is too long: {len} characters, maximum is {MAX_TITLE_LEN}")]
    TooLong { len: usize },
}

/// A token that is not a valid item id encoding.
#[derive(Debug, Error)]
#[error("malformed item id {token:?}: {source}")]
pub struct MalformedId {
    pub token: String,
    #[source]
    pub source: ulid::DecodeError,
}

/// Failures reported by a `TodoStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No item with this id exists.
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// An insert collided with an existing id.
    #[error("item {0} already exists")]
    Duplicate(ItemId),

    /// Connectivity, query or decoding failure in the backend.
    #[error("store backend failure")]
    Backend(#[source] BoxError),
}

impl StoreError {
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }
}

/// Coarse classification used at the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-caused; never retried.
    BadInput,
    NotFound,
    /// Store or unexpected failure; details stay server-side.
    Internal,
    /// The operation ran past its deadline.
    Cancelled,
}

/// Errors returned by `ItemService`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidTitle(#[from] TitleError),

    #[error(transparent)]
    MalformedId(#[from] MalformedId),

    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("{op} did not finish within {}ms", .timeout.as_millis())]
    Cancelled { op: &'static str, timeout: Duration },

    #[error("{op} failed")]
    Internal {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidTitle(_) | ServiceError::MalformedId(_) => ErrorKind::BadInput,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Cancelled { .. } => ErrorKind::Cancelled,
            ServiceError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Classify a store failure for operation `op`. `NotFound` survives as
    /// its own variant; everything else becomes `Internal`.
    pub(crate) fn from_store(op: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Internal { op, source: other },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_id() -> ItemId {
        "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap()
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(ServiceError::from(TitleError::Empty).kind(), ErrorKind::BadInput);
        let malformed = ItemId::parse("not-an-id").unwrap_err();
        assert_eq!(ServiceError::from(malformed).kind(), ErrorKind::BadInput);
        assert_eq!(ServiceError::NotFound(some_id()).kind(), ErrorKind::NotFound);
        let cancelled = ServiceError::Cancelled {
            op: "list",
            timeout: Duration::from_millis(10),
        };
        assert_eq!(cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn store_not_found_is_not_internal() {
        let err = ServiceError::from_store("get", StoreError::NotFound(some_id()));
        assert!(matches!(err, ServiceError::NotFound(id) if id == some_id()));

        let err = ServiceError::from_store("get", StoreError::backend("connection reset"));
        assert_eq!(err.kind(), ErrorKind::Internal);
        let err = ServiceError::from_store("create", StoreError::Duplicate(some_id()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn messages_name_the_bounds() {
        assert_eq!(TitleError::Empty.to_string(), "title is empty");
        assert!(TitleError::TooShort { len: 3 }.to_string().contains("minimum is 5"));
        assert!(TitleError::TooLong { len: 1001 }.to_string().contains("maximum is 1000"));
    }
}
