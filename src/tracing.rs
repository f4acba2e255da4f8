//! Request tracing middleware

use tracing::{Instrument, trace_span};

use crate::pipeline::PipelineBuilder;

impl PipelineBuilder {
    /// Adds middleware for wrapping each exchange into a unique [`tracing::Span`]
    ///
    /// # Example
    /// ```
    /// use onion::PipelineBuilder;
    ///
    /// let mut builder = PipelineBuilder::new();
    /// builder.use_tracing();
    /// ```
    pub fn use_tracing(&mut self) -> &mut Self {
        self.use_fn(|ctx, next| {
            let span = trace_span!(
                "request",
                method = %ctx.request.method(),
                path = %ctx.request.path()
            );
            async move {
                let ctx = next(ctx).await?;
                tracing::trace!(status = ctx.response.status().as_u16(), "handled");
                Ok(ctx)
            }
            .instrument(span)
        })
    }
}
