//! # Onion
//!
//! > Composable request-handler pipeline with explicit continuation passing.
//!
//! A pipeline is an ordered chain of handlers. Each handler receives the
//! mutable exchange context and the next handler as a continuation: it may
//! complete the exchange itself, or delegate and keep acting after the
//! continuation returns (the onion model). A handler that never invokes its
//! continuation short-circuits the chain.
//!
//! ## Features
//! * Onion-ordered middleware chain with short-circuiting
//! * Path-prefix sub-pipelines (`map`) and predicate branches (`use_when`)
//! * Respond-exactly-once response contract
//! * Runtime-agnostic: any executor can poll [`Pipeline::call`]
//!
//! ## Example
//! ```toml
//! [dependencies]
//! onion = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//! ```
//! use onion::{HttpRequest, PipelineBuilder, http::StatusCode};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), onion::Error> {
//! let mut builder = PipelineBuilder::new();
//!
//! builder.use_fn(|mut ctx, next| async move {
//!     ctx.response.headers_mut()
//!         .insert("x-served-by", "onion".parse().unwrap());
//!     next(ctx).await
//! });
//! builder.run(|mut ctx| async move {
//!     ctx.response.write("Hello, World!")?;
//!     Ok(ctx)
//! });
//!
//! let pipeline = builder.build();
//! let response = pipeline.call(HttpRequest::get("/hello")).await?;
//!
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body().as_ref(), b"Hello, World!");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(unreachable_pub)]

mod branch;

pub mod error;
pub mod http;
pub mod middleware;
pub mod pipeline;
#[cfg(feature = "tracing")]
pub mod tracing;

pub use crate::error::Error;
pub use crate::http::{HttpRequest, HttpResponse};
pub use crate::middleware::{HandlerResult, HttpContext, Next};
pub use crate::pipeline::{Pipeline, PipelineBuilder};
