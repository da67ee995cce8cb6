//! The middleware pipeline.
//!
//! Register middleware once at startup, then serve as many requests as you
//! like. Each [`execute`](Pipeline::execute) takes a snapshot of the
//! registered list, so traversals never see each other's progress and never
//! see middleware appended after they started.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::fallback::EmptyPipelineHandler;
use crate::handler::{BoxFuture, Handler};
use crate::middleware::{BoxedMiddleware, Middleware};
use crate::next::{Cursor, Next};

/// An ordered list of middleware and the entry point for running it.
///
/// Insertion order is invocation order. There is no removal or reordering.
///
/// `append` takes `&mut self`, so the borrow checker enforces
/// setup-then-serve: once the pipeline is behind an `Arc` and shared with
/// request tasks it is frozen.
pub struct Pipeline<Req, Res> {
    // Copy-on-write: `append` clones the list if a traversal still holds it.
    stack: Arc<Vec<BoxedMiddleware<Req, Res>>>,
}

impl<Req, Res> Pipeline<Req, Res> {
    pub fn new() -> Self {
        Self { stack: Arc::new(Vec::new()) }
    }

    /// Appends `middleware` and returns `self` for chaining.
    ///
    /// ```rust
    /// # use pipewerk::{middleware_fn, Handler, Next, Pipeline};
    /// let pipeline = Pipeline::<u32, u32>::new()
    ///     .pipe(middleware_fn(|n: u32, next: Next<u32, u32>| async move { next.handle(n + 1).await }))
    ///     .pipe(middleware_fn(|n: u32, next: Next<u32, u32>| async move { next.handle(n * 2).await }));
    ///
    /// assert_eq!(pipeline.len(), 2);
    /// ```
    pub fn pipe(mut self, middleware: impl Middleware<Req, Res>) -> Self {
        self.append(middleware);
        self
    }

    /// Adds `middleware` to the end of the sequence.
    pub fn append(&mut self, middleware: impl Middleware<Req, Res>) {
        Arc::make_mut(&mut self.stack).push(Arc::new(middleware));
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

impl<Req, Res> Pipeline<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    /// Runs `req` through every middleware, ending in `fallback`.
    ///
    /// The middleware list is captured when this method is called, not when
    /// the returned future is first polled. The future borrows nothing from
    /// the pipeline.
    pub fn execute<H>(&self, req: Req, fallback: H) -> BoxFuture<'static, Result<Res>>
    where
        H: Handler<Req, Res>,
    {
        debug!(middleware = self.stack.len(), "executing pipeline");

        let next = Next::new(Cursor::new(Arc::clone(&self.stack), Arc::new(fallback)));
        Box::pin(async move { next.handle(req).await })
    }

    /// Runs `req` with no terminal handler.
    ///
    /// If every middleware forwards, this fails with
    /// [`Error::EmptyPipeline`](crate::Error::EmptyPipeline).
    pub fn handle(&self, req: Req) -> BoxFuture<'static, Result<Res>> {
        self.execute(req, EmptyPipelineHandler)
    }
}

impl<Req, Res> Handler<Req, Res> for Pipeline<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    fn handle(&self, req: Req) -> BoxFuture<'_, Result<Res>> {
        Pipeline::handle(self, req)
    }
}

/// A pipeline nested in another one runs its own middleware, then resumes
/// the outer pipeline through `next`.
impl<Req, Res> Middleware<Req, Res> for Pipeline<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
{
    fn process(&self, req: Req, next: Next<Req, Res>) -> BoxFuture<'_, Result<Res>> {
        self.execute(req, next)
    }
}

impl<Req, Res> Clone for Pipeline<Req, Res> {
    fn clone(&self) -> Self {
        Self { stack: Arc::clone(&self.stack) }
    }
}

impl<Req, Res> Default for Pipeline<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> fmt::Debug for Pipeline<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline").field("middleware", &self.len()).finish()
    }
}
