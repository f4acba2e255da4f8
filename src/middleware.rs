//! Middleware tools

use futures_util::future::BoxFuture;
use std::{future::Future, sync::Arc};

use crate::{
    error::Error,
    http::{HttpRequest, HttpResponse, StatusCode}
};

pub use http_context::HttpContext;

pub mod http_context;

const DEFAULT_MW_CAPACITY: usize = 8;

/// Result of a single handler invocation
///
/// The exchange context flows back up the chain so that code running
/// after `next` keeps access to everything downstream handlers mutated.
pub type HandlerResult = Result<HttpContext, Error>;

/// Points to the next middleware or the terminal handler
pub type Next = Arc<
    dyn Fn(HttpContext) -> BoxFuture<'static, HandlerResult>
    + Send
    + Sync
>;

/// Points to a middleware function
pub(crate) type MiddlewareFn = Arc<
    dyn Fn(HttpContext, Next) -> BoxFuture<'static, HandlerResult>
    + Send
    + Sync
>;

/// Wraps a closure into [`MiddlewareFn`]
#[inline]
pub(crate) fn make_fn<F, Fut>(middleware: F) -> MiddlewareFn
where
    F: Fn(HttpContext, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send
{
    let middleware = Arc::new(middleware);
    Arc::new(move |ctx: HttpContext, next: Next| {
        let middleware = middleware.clone();
        Box::pin(async move { middleware(ctx, next).await })
    })
}

/// Wraps a terminal handler into [`MiddlewareFn`], ignoring its continuation
#[inline]
pub(crate) fn make_terminal_fn<F, Fut>(handler: F) -> MiddlewareFn
where
    F: Fn(HttpContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send
{
    let handler = Arc::new(handler);
    Arc::new(move |ctx: HttpContext, _| {
        let handler = handler.clone();
        Box::pin(async move { handler(ctx).await })
    })
}

/// Wraps a closure for the request mapping into [`MiddlewareFn`]
#[inline]
pub(crate) fn make_map_request_fn<F, Fut>(map: F) -> MiddlewareFn
where
    F: Fn(HttpRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = HttpRequest> + Send,
{
    let middleware_fn = move |ctx: HttpContext, next: Next| {
        let map = map.clone();
        async move {
            let (req, resp) = ctx.into_parts();
            let req = map(req).await;
            next(HttpContext::from_parts(req, resp)).await
        }
    };
    make_fn(middleware_fn)
}

/// Wraps a closure for the response mapping into [`MiddlewareFn`]
#[inline]
pub(crate) fn make_map_ok_fn<F, Fut>(map: F) -> MiddlewareFn
where
    F: Fn(HttpResponse) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send,
{
    let middleware_fn = move |ctx: HttpContext, next: Next| {
        let map = map.clone();
        async move {
            let ctx = next(ctx).await?;
            let (req, resp) = ctx.into_parts();
            let resp = map(resp).await;
            Ok(HttpContext::from_parts(req, resp))
        }
    };
    make_fn(middleware_fn)
}

/// Wraps a closure for the error mapping into [`MiddlewareFn`]
#[inline]
pub(crate) fn make_map_err_fn<F, Fut>(map: F) -> MiddlewareFn
where
    F: Fn(Error) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Error> + Send,
{
    let middleware_fn = move |ctx: HttpContext, next: Next| {
        let map = map.clone();
        async move {
            match next(ctx).await {
                Ok(ctx) => Ok(ctx),
                Err(err) => Err(map(err).await)
            }
        }
    };
    make_fn(middleware_fn)
}

/// The default terminal handler: flags an unhandled exchange as `404 Not Found`
///
/// A started response is left untouched.
pub(crate) fn default_terminal() -> Next {
    Arc::new(|mut ctx: HttpContext| Box::pin(async move {
        if !ctx.response.has_started() {
            ctx.response.set_status(StatusCode::NOT_FOUND)?;
        }
        Ok(ctx)
    }))
}

/// Middleware pipeline
#[derive(Clone)]
pub(crate) struct Middlewares {
    pipeline: Vec<MiddlewareFn>
}

impl Middlewares {
    /// Initializes a new middleware pipeline
    pub(crate) fn new() -> Self {
        Self { pipeline: Vec::with_capacity(DEFAULT_MW_CAPACITY) }
    }

    /// Returns `true` if there are no middlewares,
    /// otherwise `false`
    pub(crate) fn is_empty(&self) -> bool {
        self.pipeline.is_empty()
    }

    /// Adds middleware function to the pipeline
    #[inline]
    pub(crate) fn add(&mut self, middleware: MiddlewareFn) {
        self.pipeline.push(middleware);
    }

    /// Composes middlewares into a "Linked List" ending
    /// with the default terminal handler and returns head
    pub(crate) fn compose(&self) -> Next {
        self.compose_with(default_terminal())
    }

    /// Composes middlewares right-to-left around `terminal`:
    /// the last-registered middleware wraps `terminal`, each preceding
    /// one wraps the handler produced by the next fold step
    pub(crate) fn compose_with(&self, terminal: Next) -> Next {
        let mut next = terminal;
        for mw in self.pipeline.iter().rev() {
            let current_mw: MiddlewareFn = mw.clone();
            let prev_next: Next = next.clone();

            next = Arc::new(move |ctx| {
                let current_mw = current_mw.clone();
                let prev_next = prev_next.clone();
                Box::pin(async move {
                    current_mw(ctx, prev_next).await
                })
            });
        }
        next
    }
}
