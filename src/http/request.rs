//! HTTP request utilities

use crate::http::{Extensions, HeaderMap, Method};

/// The head of an incoming HTTP exchange
///
/// Holds the routable `path` together with the `path_base` consumed so far:
/// prefix branches move matched segments from `path` into `path_base`.
/// The per-request data injected by handlers lives in type-keyed [`Extensions`].
#[derive(Debug)]
pub struct HttpRequest {
    method: Method,
    path: String,
    path_base: String,
    headers: HeaderMap,
    extensions: Extensions
}

impl HttpRequest {
    /// Creates a new [`HttpRequest`]
    ///
    /// The path is normalized to always start with `/`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: normalize_path(path.into()),
            path_base: String::new(),
            headers: HeaderMap::new(),
            extensions: Extensions::new()
        }
    }

    /// Creates a new `GET` [`HttpRequest`]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Returns the HTTP method
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the routable path, always starting with `/`
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the path prefix consumed by prefix branches, initially empty
    #[inline]
    pub fn path_base(&self) -> &str {
        &self.path_base
    }

    /// Replaces the routable path, normalizing the leading `/`
    #[inline]
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = normalize_path(path.into());
    }

    /// Replaces the consumed path prefix
    #[inline]
    pub fn set_path_base(&mut self, path_base: impl Into<String>) {
        self.path_base = path_base.into();
    }

    /// Returns a reference to the request headers
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the request headers
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns a reference to the per-request item store
    #[inline]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns a mutable reference to the per-request item store
    #[inline]
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

#[inline]
fn normalize_path(path: String) -> String {
    if path.is_empty() {
        "/".into()
    } else if !path.starts_with('/') {
        let mut normalized = String::with_capacity(path.len() + 1);
        normalized.push('/');
        normalized.push_str(&path);
        normalized
    } else {
        path
    }
}
