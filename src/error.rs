//! Unified error type.

/// A type-erased error raised by a middleware or handler implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used by every [`Handler`](crate::Handler) and
/// [`Middleware`](crate::Middleware).
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type returned by a pipeline traversal.
///
/// The pipeline never recovers from any of these. They unwind through the
/// nested `process` / `handle` calls to whoever awaited the outermost
/// [`Pipeline::execute`](crate::Pipeline::execute). Mapping them onto a
/// response (a 500, a log line, a retry) is the caller's business.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The middleware sequence ran out and the terminal handler is the
    /// built-in [`EmptyPipelineHandler`](crate::EmptyPipelineHandler).
    #[error("No middleware available to process the request")]
    EmptyPipeline,

    /// A [`Next`](crate::Next) was invoked after it had already been spent.
    ///
    /// Always a bug in a middleware: it called its continuation twice, or
    /// kept a stale one around.
    #[error("Cannot invoke the pipeline continuation more than once")]
    MiddlewareAlreadyCalled,

    /// A failure raised by a collaborator (middleware or handler).
    #[error(transparent)]
    Other(BoxError),
}

impl Error {
    /// Wraps an arbitrary collaborator error.
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }

    pub fn is_empty_pipeline(&self) -> bool {
        matches!(self, Self::EmptyPipeline)
    }

    pub fn is_already_called(&self) -> bool {
        matches!(self, Self::MiddlewareAlreadyCalled)
    }
}
