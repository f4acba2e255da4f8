//! HTTP response utilities

use bytes::Bytes;

use crate::{
    error::Error,
    http::{HeaderMap, StatusCode}
};

pub const RESPONSE_STARTED: &str = "HTTP Response: the response has already started";

/// The response produced exactly once per pipeline invocation
///
/// The status code may be overwritten freely until the first body write;
/// once the response has started, both a second write and a status change
/// are flagged as errors.
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    started: bool
}

impl Default for HttpResponse {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponse {
    /// Creates a new [`HttpResponse`] with status `200 OK` and an empty body
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            started: false
        }
    }

    /// Returns the current status code
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Overwrites the status code
    ///
    /// Errors if the response has already started.
    #[inline]
    pub fn set_status(&mut self, status: StatusCode) -> Result<(), Error> {
        if self.started {
            return Err(Error::server_error(RESPONSE_STARTED));
        }
        self.status = status;
        Ok(())
    }

    /// Writes the response body and marks the response as started
    ///
    /// Errors on a second write.
    #[inline]
    pub fn write(&mut self, body: impl Into<Bytes>) -> Result<(), Error> {
        if self.started {
            return Err(Error::server_error(RESPONSE_STARTED));
        }
        self.body = body.into();
        self.started = true;
        Ok(())
    }

    /// Returns `true` once the body has been written
    #[inline]
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Returns a reference to the response body
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns a reference to the response headers
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the response headers
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Unwraps the response into a tuple of status code, headers and body
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}
