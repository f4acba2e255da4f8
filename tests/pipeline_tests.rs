use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex
};

use onion::{http::StatusCode, HttpRequest, PipelineBuilder};

#[tokio::test]
async fn it_returns_not_found_when_no_handlers_registered() {
    let pipeline = PipelineBuilder::new().build();

    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn it_reaches_terminal_when_every_handler_delegates() {
    let mut builder = PipelineBuilder::new();

    builder.use_fn(|mut ctx, next| async move {
        ctx.response.set_status(StatusCode::SWITCHING_PROTOCOLS)?;
        next(ctx).await
    });
    builder.use_fn(|mut ctx, next| async move {
        ctx.response.set_status(StatusCode::PROCESSING)?;
        next(ctx).await
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    // the default terminal overwrites the status set upstream
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_terminates_at_first_handler_not_calling_next() {
    let mut builder = PipelineBuilder::new();

    builder.use_fn(|mut ctx, _| async move {
        ctx.response.set_status(StatusCode::SWITCHING_PROTOCOLS)?;
        Ok(ctx)
    });
    builder.use_fn(|mut ctx, _| async move {
        ctx.response.set_status(StatusCode::PROCESSING)?;
        Ok(ctx)
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
}

#[tokio::test]
async fn it_short_circuits_handlers_registered_later() {
    let counter = Arc::new(AtomicUsize::new(0));
    let later = counter.clone();

    let mut builder = PipelineBuilder::new();
    builder.use_fn(|mut ctx, next| async move {
        ctx.response.set_status(StatusCode::SWITCHING_PROTOCOLS)?;
        next(ctx).await
    });
    builder.use_fn(|mut ctx, _| async move {
        ctx.response.set_status(StatusCode::PROCESSING)?;
        Ok(ctx)
    });
    builder.use_fn(move |ctx, next| {
        later.fetch_add(1, Ordering::SeqCst);
        async move { next(ctx).await }
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::PROCESSING);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn it_runs_after_code_in_reverse_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut builder = PipelineBuilder::new();
    let trace = order.clone();
    builder.use_fn(move |ctx, next| {
        let trace = trace.clone();
        async move {
            trace.lock().unwrap().push("a-pre");
            let ctx = next(ctx).await?;
            trace.lock().unwrap().push("a-post");
            Ok(ctx)
        }
    });
    let trace = order.clone();
    builder.use_fn(move |ctx, next| {
        let trace = trace.clone();
        async move {
            trace.lock().unwrap().push("b-pre");
            let ctx = next(ctx).await?;
            trace.lock().unwrap().push("b-post");
            Ok(ctx)
        }
    });

    let pipeline = builder.build();
    pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(*order.lock().unwrap(), ["a-pre", "b-pre", "b-post", "a-post"]);
}

#[tokio::test]
async fn it_observes_downstream_response_after_next() {
    let mut builder = PipelineBuilder::new();

    builder.use_fn(|ctx, next| async move {
        let mut ctx = next(ctx).await?;
        let status = ctx.response.status().as_u16().to_string();
        ctx.response.headers_mut()
            .insert("x-downstream-status", status.parse().unwrap());
        Ok(ctx)
    });
    builder.run(|mut ctx| async move {
        ctx.response.set_status(StatusCode::CREATED)?;
        Ok(ctx)
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers().get("x-downstream-status").unwrap(), "201");
}

#[derive(Clone, Debug, PartialEq)]
struct Injected(String);

#[tokio::test]
async fn it_shares_context_items_across_handlers() {
    let mut builder = PipelineBuilder::new();

    builder.use_fn(|mut ctx, next| async move {
        ctx.insert_item(Injected("from middleware 1".into()));
        next(ctx).await
    });
    builder.use_fn(|mut ctx, next| async move {
        ctx.get_item_mut::<Injected>()
            .unwrap().0
            .push_str("from middleware 2");
        next(ctx).await
    });
    builder.run(|mut ctx| async move {
        let value = ctx.get_item::<Injected>().cloned().unwrap();
        ctx.response.write(value.0)?;
        Ok(ctx)
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(response.body().as_ref(), b"from middleware 1from middleware 2");
}

#[tokio::test]
async fn it_keeps_default_response_when_chain_short_circuits_silently() {
    let mut builder = PipelineBuilder::new();

    builder.use_fn(|mut ctx, next| async move {
        ctx.insert_item(Injected("from middleware 1".into()));
        next(ctx).await
    });
    // terminates without touching the response
    builder.use_fn(|mut ctx, _| async move {
        ctx.get_item_mut::<Injected>()
            .unwrap().0
            .push_str("from middleware 2");
        Ok(ctx)
    });
    builder.run(|mut ctx| async move {
        let value = ctx.get_item::<Injected>().cloned().unwrap();
        ctx.response.write(value.0)?;
        Ok(ctx)
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn it_makes_handlers_after_run_unreachable() {
    let mut builder = PipelineBuilder::new();

    builder.run(|mut ctx| async move {
        ctx.response.set_status(StatusCode::PROCESSING)?;
        Ok(ctx)
    });
    builder.use_fn(|mut ctx, _| async move {
        ctx.response.set_status(StatusCode::SWITCHING_PROTOCOLS)?;
        Ok(ctx)
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::PROCESSING);
}

#[tokio::test]
async fn it_fails_on_second_body_write() {
    let mut builder = PipelineBuilder::new();

    builder.use_fn(|mut ctx, next| async move {
        ctx.response.write("hello from middleware 1")?;
        next(ctx).await
    });
    builder.use_fn(|mut ctx, next| async move {
        ctx.response.write("hello from middleware 2")?;
        next(ctx).await
    });

    let pipeline = builder.build();
    let error = pipeline.call(HttpRequest::get("/")).await.unwrap_err();

    assert!(error.is_server_error());
}

#[tokio::test]
async fn it_fails_on_status_change_after_body_write() {
    let mut builder = PipelineBuilder::new();

    builder.use_fn(|mut ctx, next| async move {
        ctx.response.write("hello from middleware 1")?;
        next(ctx).await
    });
    builder.use_fn(|mut ctx, next| async move {
        ctx.response.set_status(StatusCode::SWITCHING_PROTOCOLS)?;
        next(ctx).await
    });

    let pipeline = builder.build();
    let error = pipeline.call(HttpRequest::get("/")).await.unwrap_err();

    assert!(error.is_server_error());
}

#[tokio::test]
async fn it_leaves_started_response_untouched_at_terminal() {
    let mut builder = PipelineBuilder::new();

    builder.use_fn(|mut ctx, next| async move {
        ctx.response.write("done")?;
        next(ctx).await
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    // the default terminal does not flag a started response as not found
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"done");
}

#[tokio::test]
async fn it_keeps_status_writable_until_first_write() {
    let mut builder = PipelineBuilder::new();

    builder.run(|mut ctx| async move {
        ctx.response.set_status(StatusCode::SWITCHING_PROTOCOLS)?;
        ctx.response.set_status(StatusCode::PROCESSING)?;
        ctx.response.write("done")?;
        Ok(ctx)
    });

    let pipeline = builder.build();
    let response = pipeline.call(HttpRequest::get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::PROCESSING);
    assert_eq!(response.body().as_ref(), b"done");
}
