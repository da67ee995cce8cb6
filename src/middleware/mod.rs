//! Middleware layer.
//!
//! A middleware sees the request on its way in and the response on its way
//! out. Between the two it holds a [`Next`]: the rest of the pipeline. It
//! may forward through it once, or ignore it and answer on its own.
//!
//! ```text
//!   m1 ──▶ m2 ──▶ m3 ──▶ fallback
//!   m1 ◀── m2 ◀── m3 ◀──┘
//! ```
//!
//! Code before `next.handle(req).await` runs in registration order, code
//! after it runs in reverse.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::handler::BoxFuture;
use crate::next::Next;

/// A middleware stored in a pipeline, shared read-only by every traversal.
pub(crate) type BoxedMiddleware<Req, Res> = Arc<dyn Middleware<Req, Res>>;

/// One unit of request processing.
///
/// Implementations receive the request together with the continuation for
/// everything registered after them. Call `next.handle(req)` to delegate,
/// or return a response directly to short-circuit.
///
/// The pipeline never copies or mutates a middleware. Any interior state is
/// the implementation's own concern, including under concurrent traversals.
pub trait Middleware<Req, Res>: Send + Sync + 'static {
    fn process(&self, req: Req, next: Next<Req, Res>) -> BoxFuture<'_, Result<Res>>;
}

impl<Req, Res, M> Middleware<Req, Res> for Arc<M>
where
    M: Middleware<Req, Res> + ?Sized,
{
    fn process(&self, req: Req, next: Next<Req, Res>) -> BoxFuture<'_, Result<Res>> {
        self.as_ref().process(req, next)
    }
}

/// Wraps an async closure as a [`Middleware`].
///
/// ```rust
/// use pipewerk::{middleware_fn, Handler, Next};
///
/// let shout = middleware_fn(|req: String, next: Next<String, String>| async move {
///     let res = next.handle(req.to_uppercase()).await;
///     res.map(|body| body + "!")
/// });
/// # let _ = shout;
/// ```
pub fn middleware_fn<F, Fut, Req, Res>(f: F) -> MiddlewareFn<F>
where
    F: Fn(Req, Next<Req, Res>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res>> + Send + 'static,
{
    MiddlewareFn(f)
}

/// Newtype returned by [`middleware_fn`].
#[derive(Clone, Copy)]
pub struct MiddlewareFn<F>(F);

impl<F, Fut, Req, Res> Middleware<Req, Res> for MiddlewareFn<F>
where
    F: Fn(Req, Next<Req, Res>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res>> + Send + 'static,
{
    fn process(&self, req: Req, next: Next<Req, Res>) -> BoxFuture<'_, Result<Res>> {
        Box::pin((self.0)(req, next))
    }
}

impl<F> std::fmt::Debug for MiddlewareFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareFn").finish_non_exhaustive()
    }
}
