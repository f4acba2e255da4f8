//! Error Handling tools

use crate::http::StatusCode;

use std::{
    convert::Infallible,
    error::Error as StdError,
    fmt
};

type BoxError = Box<
    dyn StdError
    + Send
    + Sync
>;

/// Generic error
#[derive(Debug)]
pub struct Error {
    pub status: StatusCode,
    pub(crate) inner: BoxError
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl From<Infallible> for Error {
    fn from(infallible: Infallible) -> Error {
        match infallible {}
    }
}

impl Error {
    /// Creates an internal server error
    #[inline]
    pub fn server_error(err: impl Into<BoxError>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            inner: err.into()
        }
    }

    /// Creates a client error
    #[inline]
    pub fn client_error(err: impl Into<BoxError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            inner: err.into()
        }
    }

    /// Creates [`Error`] from status code and underlying error
    #[inline]
    pub fn from_parts(status: StatusCode, err: impl Into<BoxError>) -> Self {
        Self { status, inner: err.into() }
    }

    /// Unwraps the inner error
    pub fn into_inner(self) -> BoxError {
        self.inner
    }

    /// Unwraps the error into a tuple of status code and underlying error
    pub fn into_parts(self) -> (StatusCode, BoxError) {
        (self.status, self.inner)
    }

    /// Check if status is within 500-599.
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Check if status is within 400-499.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }
}
