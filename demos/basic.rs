//! Minimal pipewerk example — request-id, auth, and timing middleware in
//! front of a JSON handler, using `http` types as request and response.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic

use std::time::Instant;

use http::{HeaderValue, Request, Response, StatusCode};
use pipewerk::{handler_fn, middleware_fn, Error, Handler, Next, Pipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

type Req = Request<Vec<u8>>;
type Res = Response<Vec<u8>>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = Pipeline::new()
        .pipe(middleware_fn(timing))
        .pipe(middleware_fn(request_id))
        .pipe(middleware_fn(require_token));

    let requests = [
        Request::get("/users/42")
            .header("authorization", "Bearer secret")
            .body(Vec::new()),
        Request::get("/users/42").body(Vec::new()),
    ];

    for req in requests {
        let req = req.expect("valid request");
        match app.execute(req, handler_fn(get_user)).await {
            Ok(res) => info!(
                status = %res.status(),
                body = %String::from_utf8_lossy(res.body()),
                "response"
            ),
            Err(e) => info!(error = %e, "pipeline failed"),
        }
    }

    // No terminal handler: the request falls off the end of the pipeline.
    let req = Request::get("/").header("authorization", "Bearer secret").body(Vec::new());
    if let Err(e) = app.handle(req.expect("valid request")).await {
        info!(error = %e, "handle without a terminal");
    }
}

// Outermost: sees the final response, whoever produced it.
async fn timing(req: Req, next: Next<Req, Res>) -> Result<Res, Error> {
    let path = req.uri().path().to_owned();
    let start = Instant::now();
    let res = next.handle(req).await;
    info!(%path, elapsed = ?start.elapsed(), ok = res.is_ok(), "request finished");
    res
}

async fn request_id(req: Req, next: Next<Req, Res>) -> Result<Res, Error> {
    let mut res = next.handle(req).await?;
    res.headers_mut().insert("x-request-id", HeaderValue::from_static("req-0001"));
    Ok(res)
}

// Short-circuits with 401 — nothing registered after it runs.
async fn require_token(req: Req, next: Next<Req, Res>) -> Result<Res, Error> {
    if req.headers().get("authorization").is_none() {
        let mut res = Response::new(b"unauthorized".to_vec());
        *res.status_mut() = StatusCode::UNAUTHORIZED;
        return Ok(res);
    }
    next.handle(req).await
}

// GET /users/{id}
async fn get_user(req: Req) -> Result<Res, Error> {
    let id = req.uri().path().rsplit('/').next().unwrap_or("unknown");
    let body = format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes();
    Response::builder()
        .header("content-type", "application/json")
        .body(body)
        .map_err(Error::other)
}
