//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! A pipeline ends in a *fallback*: whatever runs once every middleware has
//! forwarded. The fallback can be a closure, another pipeline, or the
//! continuation of an outer pipeline, so it is stored as a trait object
//! (`Arc<dyn Handler>`) and shared by every continuation of one traversal.
//!
//! ```text
//! handler_fn(|req| async { … })      ← user writes this
//!        ↓ pipeline.execute(req, h)
//! Arc::new(h) as SharedHandler        ← one allocation per execute
//!        ↓  cloned into each Next
//! fallback.handle(req)                ← one vtable dispatch, at the end
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Result;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future.
///
/// `Pin<Box<…>>` lets trait objects return futures of different concrete
/// types. `Send` lets tokio move a traversal across worker threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A type-erased handler shared by every continuation of a traversal.
pub(crate) type SharedHandler<Req, Res> = Arc<dyn Handler<Req, Res>>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Turns a request into a response.
///
/// Implemented by terminal handlers, by [`Next`](crate::Next) and by
/// [`Pipeline`](crate::Pipeline) itself, so a pipeline can stand anywhere a
/// handler is expected.
pub trait Handler<Req, Res>: Send + Sync + 'static {
    fn handle(&self, req: Req) -> BoxFuture<'_, Result<Res>>;
}

impl<Req, Res, H> Handler<Req, Res> for Arc<H>
where
    H: Handler<Req, Res> + ?Sized,
{
    fn handle(&self, req: Req) -> BoxFuture<'_, Result<Res>> {
        self.as_ref().handle(req)
    }
}

// ── Closures ──────────────────────────────────────────────────────────────────

/// Wraps an async closure as a [`Handler`].
///
/// ```rust
/// use pipewerk::handler_fn;
///
/// let ok = handler_fn(|name: String| async move { Ok(format!("hello {name}")) });
/// # let _ = ok;
/// ```
pub fn handler_fn<F, Fut, Req, Res>(f: F) -> HandlerFn<F>
where
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res>> + Send + 'static,
{
    HandlerFn(f)
}

/// Newtype returned by [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F>(F);

impl<F, Fut, Req, Res> Handler<Req, Res> for HandlerFn<F>
where
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Res>> + Send + 'static,
{
    fn handle(&self, req: Req) -> BoxFuture<'_, Result<Res>> {
        Box::pin((self.0)(req))
    }
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_handler() {
        let h = handler_fn(|n: u32| async move { Ok(n * 2) });
        assert_eq!(h.handle(21).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn arc_forwards() {
        let h: Arc<dyn Handler<u32, u32>> = Arc::new(handler_fn(|n: u32| async move { Ok(n + 1) }));
        assert_eq!(h.handle(1).await.unwrap(), 2);
    }
}
