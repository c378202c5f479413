use crate::db::query::QueryError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Record stores report every failure through this type; the resolver
/// surfaces it to callers unchanged.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    #[must_use]
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a store-origin unsupported error.
    pub fn store_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Store, message)
    }

    /// Construct a store-origin unavailable error (connectivity, shutdown, ...).
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unavailable, ErrorOrigin::Store, message)
    }

    /// Construct a store-origin internal error.
    pub fn store_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Store, message)
    }

    /// Construct a store-origin corruption error.
    pub fn store_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Store, message)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ResolveError
///
/// Everything a resolve call can fail with.
/// Argument failures are raised before the store is contacted; store
/// failures are passed through untouched.
///

#[derive(Debug, ThisError)]
pub enum ResolveError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    Store(#[from] InternalError),
}

impl ResolveError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidArgument { .. } => ErrorClass::InvalidArgument,
            Self::Store(err) => err.class,
        }
    }

    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Borrow the store failure, if this error came from the store.
    #[must_use]
    pub const fn as_store(&self) -> Option<&InternalError> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidArgument { .. } => None,
        }
    }
}

impl From<QueryError> for ResolveError {
    fn from(err: QueryError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    Unsupported,
    Unavailable,
    Corruption,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::Unsupported => "unsupported",
            Self::Unavailable => "unavailable",
            Self::Corruption => "corruption",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Query,
    Resolver,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Query => "query",
            Self::Resolver => "resolver",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
