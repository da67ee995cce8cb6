//! The continuation handed to every middleware.
//!
//! A [`Next`] is "the rest of the pipeline" at one position: the middleware
//! that have not run yet, plus the fallback to use once they are exhausted.
//!
//! # Single-shot
//!
//! Each `Next` can be invoked once. The first [`Handler::handle`] call takes
//! the cursor out of the continuation, builds a fresh `Next` one position
//! further along, and hands that to the middleware. Any later call on the
//! spent instance fails with [`Error::MiddlewareAlreadyCalled`] instead of
//! replaying the chain.
//!
//! ```text
//! fresh ──handle()──▶ spent ──handle()──▶ Err(MiddlewareAlreadyCalled)
//! ```
//!
//! # Isolation
//!
//! The middleware list is an immutable snapshot shared behind an `Arc`.
//! Advancing only bumps the index carried by the *new* continuation, so two
//! continuations never share a mutable position, and neither does a
//! continuation share one with the pipeline it came from.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::handler::{BoxFuture, Handler, SharedHandler};
use crate::middleware::BoxedMiddleware;

/// The remaining pipeline at one position: snapshot, index, fallback.
pub(crate) struct Cursor<Req, Res> {
    stack: Arc<Vec<BoxedMiddleware<Req, Res>>>,
    pos: usize,
    fallback: SharedHandler<Req, Res>,
}

impl<Req, Res> Cursor<Req, Res> {
    pub(crate) fn new(
        stack: Arc<Vec<BoxedMiddleware<Req, Res>>>,
        fallback: SharedHandler<Req, Res>,
    ) -> Self {
        Self { stack, pos: 0, fallback }
    }

    fn remaining(&self) -> usize {
        self.stack.len().saturating_sub(self.pos)
    }
}

impl<Req, Res> Cursor<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    async fn proceed(self, req: Req) -> Result<Res> {
        let Some(middleware) = self.stack.get(self.pos).map(Arc::clone) else {
            debug!(middleware = self.stack.len(), "pipeline exhausted, calling fallback");
            return self.fallback.handle(req).await;
        };

        trace!(position = self.pos, remaining = self.remaining() - 1, "dispatching to middleware");

        let next = Next::new(Cursor {
            stack: self.stack,
            pos: self.pos + 1,
            fallback: self.fallback,
        });

        middleware.process(req, next).await
    }
}

/// The rest of the pipeline, as seen by one middleware.
///
/// Implements [`Handler`]: call `next.handle(req).await` to pass the request
/// on. A second call on the same `Next` returns
/// [`Error::MiddlewareAlreadyCalled`].
pub struct Next<Req, Res> {
    cursor: Mutex<Option<Cursor<Req, Res>>>,
}

impl<Req, Res> Next<Req, Res> {
    pub(crate) fn new(cursor: Cursor<Req, Res>) -> Self {
        Self { cursor: Mutex::new(Some(cursor)) }
    }

    /// Number of middleware still ahead of this continuation. Zero once spent.
    pub fn remaining(&self) -> usize {
        self.cursor.lock().as_ref().map_or(0, Cursor::remaining)
    }

    /// `true` once [`handle`](Handler::handle) has been called.
    pub fn is_spent(&self) -> bool {
        self.cursor.lock().is_none()
    }
}

impl<Req, Res> Handler<Req, Res> for Next<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    fn handle(&self, req: Req) -> BoxFuture<'_, Result<Res>> {
        // Taken eagerly: the continuation is spent as soon as it is called,
        // whether or not the returned future is ever polled.
        let cursor = self.cursor.lock().take();

        Box::pin(async move {
            let Some(cursor) = cursor else {
                warn!("continuation invoked more than once");
                return Err(Error::MiddlewareAlreadyCalled);
            };
            cursor.proceed(req).await
        })
    }
}

impl<Req, Res> fmt::Debug for Next<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.remaining())
            .field("spent", &self.is_spent())
            .finish()
    }
}
