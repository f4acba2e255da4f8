//! Base HTTP tools

// Re-exporting HTTP status codes, methods and some headers from http
pub use http::{
    Extensions, HeaderMap, HeaderName, HeaderValue,
    Method,
    StatusCode,
};

pub use request::HttpRequest;
pub use response::HttpResponse;

pub mod request;
pub mod response;
