//! Path-prefix and predicate branch middlewares

use std::sync::Arc;

use crate::middleware::{
    make_fn,
    HttpContext, MiddlewareFn, Middlewares, Next
};

/// Validates a branch prefix and normalizes it to `/segment[/...]` form
///
/// Panics when the prefix has no segments, mirroring route registration.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    assert!(
        !trimmed.is_empty(),
        "branch prefix must contain at least one path segment, got: {prefix:?}"
    );
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        let mut normalized = String::with_capacity(trimmed.len() + 1);
        normalized.push('/');
        normalized.push_str(trimmed);
        normalized
    }
}

/// Returns the remainder of `path` when it starts with `prefix`
/// on a segment boundary: `/ver2` matches `/ver2` and `/ver2/aloha`,
/// not `/ver21`
pub(crate) fn match_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Builds the `map` middleware: on a prefix match the matched segments move
/// from `path` into `path_base` and the exchange is rerouted into `branch`
/// instead of the parent continuation; the original path is restored once
/// the branch returns
pub(crate) fn map_fn(prefix: String, branch: Next) -> MiddlewareFn {
    make_fn(move |mut ctx: HttpContext, next: Next| {
        let prefix = prefix.clone();
        let branch = branch.clone();
        async move {
            let path = ctx.request.path().to_owned();
            match match_prefix(&path, &prefix) {
                Some(rest) => {
                    let base = ctx.request.path_base().to_owned();
                    ctx.request.set_path_base(format!("{base}{prefix}"));
                    ctx.request.set_path(rest.to_owned());

                    let mut ctx = branch(ctx).await?;

                    ctx.request.set_path(path);
                    ctx.request.set_path_base(base);
                    Ok(ctx)
                }
                None => next(ctx).await
            }
        }
    })
}

/// Builds the `use_when` middleware: when the predicate holds, the branch
/// runs with the parent continuation as its terminal, so a branch that
/// completes falls through into the remaining parent chain
pub(crate) fn use_when_fn<P>(predicate: P, branch: Arc<Middlewares>) -> MiddlewareFn
where
    P: Fn(&HttpContext) -> bool + Send + Sync + 'static
{
    make_fn(move |ctx: HttpContext, next: Next| {
        let matched = predicate(&ctx);
        let branch = branch.clone();
        async move {
            if matched {
                let head = branch.compose_with(next);
                head(ctx).await
            } else {
                next(ctx).await
            }
        }
    })
}

/// Builds the `use_path_base` middleware: a matched prefix moves into
/// `path_base` and the chain continues either way
pub(crate) fn use_path_base_fn(prefix: String) -> MiddlewareFn {
    make_fn(move |mut ctx: HttpContext, next: Next| {
        let prefix = prefix.clone();
        async move {
            if let Some(rest) = match_prefix(ctx.request.path(), &prefix) {
                let rest = rest.to_owned();
                let base = format!("{}{}", ctx.request.path_base(), prefix);
                ctx.request.set_path_base(base);
                ctx.request.set_path(rest);
            }
            next(ctx).await
        }
    })
}
