//! Pipeline builder and the composed request pipeline

use std::{future::Future, sync::Arc};

use crate::{
    branch,
    error::Error,
    http::{HttpRequest, HttpResponse},
    middleware::{
        make_fn, make_map_err_fn, make_map_ok_fn, make_map_request_fn, make_terminal_fn,
        HandlerResult, HttpContext, Middlewares, Next
    }
};

/// Registers request handlers and composes them into a [`Pipeline`]
///
/// Registration order determines execution order for the code before `next`,
/// and the reverse order for the code after it.
pub struct PipelineBuilder {
    middlewares: Middlewares
}

/// The composed request pipeline: the single entry point of the whole chain
pub struct Pipeline {
    head: Next
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    /// Initializes a new pipeline builder
    pub fn new() -> Self {
        Self { middlewares: Middlewares::new() }
    }

    /// Returns `true` if no handlers have been registered yet
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Adds a middleware handler to the request pipeline
    ///
    /// # Examples
    /// ```
    /// use onion::PipelineBuilder;
    ///
    /// let mut builder = PipelineBuilder::new();
    ///
    /// builder.use_fn(|ctx, next| async move {
    ///     next(ctx).await
    /// });
    /// ```
    pub fn use_fn<F, Fut>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(HttpContext, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send,
    {
        self.middlewares.add(make_fn(middleware));
        self
    }

    /// Adds a terminal handler that never delegates to a continuation
    ///
    /// Handlers registered after a terminal handler are unreachable.
    ///
    /// # Examples
    /// ```
    /// use onion::PipelineBuilder;
    ///
    /// let mut builder = PipelineBuilder::new();
    ///
    /// builder.run(|mut ctx| async move {
    ///     ctx.response.write("Hello, World!")?;
    ///     Ok(ctx)
    /// });
    /// ```
    pub fn run<F, Fut>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(HttpContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send,
    {
        self.middlewares.add(make_terminal_fn(handler));
        self
    }

    /// Adds a middleware that handles the [`HttpRequest`] before delegating
    ///
    /// # Examples
    /// ```
    /// use onion::PipelineBuilder;
    ///
    /// let mut builder = PipelineBuilder::new();
    ///
    /// builder.map_request(|mut req| async move {
    ///     req.headers_mut()
    ///         .insert("x-custom-header", "Custom Value".parse().unwrap());
    ///     req
    /// });
    /// ```
    pub fn map_request<F, Fut>(&mut self, map: F) -> &mut Self
    where
        F: Fn(HttpRequest) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = HttpRequest> + Send,
    {
        self.middlewares.add(make_map_request_fn(map));
        self
    }

    /// Adds a middleware that handles the [`HttpResponse`] once
    /// the downstream chain completed successfully
    ///
    /// # Examples
    /// ```
    /// use onion::PipelineBuilder;
    ///
    /// let mut builder = PipelineBuilder::new();
    ///
    /// builder.map_ok(|mut resp| async move {
    ///     resp.headers_mut()
    ///         .insert("x-custom-header", "Custom Value".parse().unwrap());
    ///     resp
    /// });
    /// ```
    pub fn map_ok<F, Fut>(&mut self, map: F) -> &mut Self
    where
        F: Fn(HttpResponse) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = HttpResponse> + Send,
    {
        self.middlewares.add(make_map_ok_fn(map));
        self
    }

    /// Adds a middleware that handles an [`Error`] bubbling up the chain
    ///
    /// # Examples
    /// ```
    /// use onion::{Error, PipelineBuilder};
    ///
    /// let mut builder = PipelineBuilder::new();
    ///
    /// builder.map_err(|err| async move {
    ///     Error::server_error(format!("{err} occurred!"))
    /// });
    /// ```
    pub fn map_err<F, Fut>(&mut self, map: F) -> &mut Self
    where
        F: Fn(Error) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Error> + Send,
    {
        self.middlewares.add(make_map_err_fn(map));
        self
    }

    /// Installs an independent sub-pipeline for paths starting with `prefix`
    ///
    /// On a match the prefix moves from the request path into its path base
    /// and the branch handles the exchange instead of the handlers registered
    /// after `map`; unmatched requests proceed unaffected.
    ///
    /// # Examples
    /// ```
    /// use onion::PipelineBuilder;
    ///
    /// let mut builder = PipelineBuilder::new();
    ///
    /// builder.map("/ver1", |ver1| {
    ///     ver1.run(|mut ctx| async move {
    ///         ctx.response.write("v1")?;
    ///         Ok(ctx)
    ///     });
    /// });
    /// ```
    ///
    /// # Panics
    /// Panics when `prefix` contains no path segments.
    pub fn map<F>(&mut self, prefix: &str, configure: F) -> &mut Self
    where
        F: FnOnce(&mut PipelineBuilder)
    {
        let prefix = branch::normalize_prefix(prefix);
        let mut sub = PipelineBuilder::new();
        configure(&mut sub);

        let head = sub.middlewares.compose();
        self.middlewares.add(branch::map_fn(prefix, head));
        self
    }

    /// Installs a sub-pipeline that runs when `predicate` holds and then
    /// falls through into the remaining parent chain, unless the branch
    /// itself short-circuits
    ///
    /// # Examples
    /// ```
    /// use onion::{PipelineBuilder, http::StatusCode};
    ///
    /// let mut builder = PipelineBuilder::new();
    ///
    /// builder.use_when(
    ///     |ctx| ctx.request.path() == "/when",
    ///     |matched| {
    ///         matched.use_fn(|mut ctx, next| async move {
    ///             ctx.response.set_status(StatusCode::SWITCHING_PROTOCOLS)?;
    ///             next(ctx).await
    ///         });
    ///     });
    /// ```
    pub fn use_when<P, F>(&mut self, predicate: P, configure: F) -> &mut Self
    where
        P: Fn(&HttpContext) -> bool + Send + Sync + 'static,
        F: FnOnce(&mut PipelineBuilder)
    {
        let mut sub = PipelineBuilder::new();
        configure(&mut sub);

        self.middlewares.add(branch::use_when_fn(predicate, Arc::new(sub.middlewares)));
        self
    }

    /// Extracts `prefix` from matching request paths into the path base
    /// and continues the chain either way
    ///
    /// # Panics
    /// Panics when `prefix` contains no path segments.
    pub fn use_path_base(&mut self, prefix: &str) -> &mut Self {
        let prefix = branch::normalize_prefix(prefix);
        self.middlewares.add(branch::use_path_base_fn(prefix));
        self
    }

    /// Composes the registered handlers into a [`Pipeline`]
    ///
    /// With no handlers registered the pipeline consists of the default
    /// terminal handler alone, which flags the exchange as `404 Not Found`.
    pub fn build(self) -> Pipeline {
        Pipeline { head: self.middlewares.compose() }
    }
}

impl Pipeline {
    /// Dispatches a request through the composed chain and returns
    /// the produced response, or the first error that escaped the chain
    pub async fn call(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let ctx = HttpContext::new(request);
        let head = self.head.clone();
        let ctx = head(ctx).await?;
        Ok(ctx.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineBuilder;

    #[test]
    fn it_starts_empty() {
        let builder = PipelineBuilder::new();

        assert!(builder.is_empty());
    }

    #[test]
    fn it_registers_handlers() {
        let mut builder = PipelineBuilder::new();
        builder.use_fn(|ctx, next| async move { next(ctx).await });

        assert!(!builder.is_empty());
    }

    #[test]
    #[should_panic]
    fn it_rejects_root_map_prefix() {
        let mut builder = PipelineBuilder::new();
        builder.map("/", |_| {});
    }
}
