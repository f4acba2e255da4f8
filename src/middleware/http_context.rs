//! Utilities for managing the request scope

use crate::http::{HttpRequest, HttpResponse};

/// Describes the current HTTP exchange
///
/// A single context is created per pipeline invocation. Ownership moves into
/// the continuation and returns from it, so every handler observes the
/// mutations of the handlers that ran before it, and code running after
/// `next` observes the downstream state.
pub struct HttpContext {
    /// Current HTTP request
    pub request: HttpRequest,
    /// The response being produced for this exchange
    pub response: HttpResponse
}

impl HttpContext {
    /// Creates a new [`HttpContext`] with an untouched response
    #[inline]
    pub fn new(request: HttpRequest) -> Self {
        Self { request, response: HttpResponse::new() }
    }

    /// Reassembles an [`HttpContext`] from its parts
    #[inline]
    pub fn from_parts(request: HttpRequest, response: HttpResponse) -> Self {
        Self { request, response }
    }

    #[inline]
    pub fn into_parts(self) -> (HttpRequest, HttpResponse) {
        (self.request, self.response)
    }

    /// Consumes the context and returns the produced response
    #[inline]
    pub fn into_response(self) -> HttpResponse {
        self.response
    }

    /// Injects a typed item into the per-request store,
    /// returning the replaced value if the type was already present
    #[inline]
    pub fn insert_item<T: Clone + Send + Sync + 'static>(&mut self, item: T) -> Option<T> {
        self.request.extensions_mut().insert(item)
    }

    /// Returns a reference to a previously injected item
    #[inline]
    pub fn get_item<T: Clone + Send + Sync + 'static>(&self) -> Option<&T> {
        self.request.extensions().get::<T>()
    }

    /// Returns a mutable reference to a previously injected item
    #[inline]
    pub fn get_item_mut<T: Clone + Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.request.extensions_mut().get_mut::<T>()
    }
}
