//! The terminal used by [`Pipeline::handle`](crate::Pipeline::handle).

use tracing::debug;

use crate::error::{Error, Result};
use crate::handler::{BoxFuture, Handler};

/// A terminal handler that always fails with [`Error::EmptyPipeline`].
///
/// Reaching it means every registered middleware forwarded the request and
/// nobody produced a response.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPipelineHandler;

impl<Req, Res> Handler<Req, Res> for EmptyPipelineHandler
where
    Res: Send + 'static,
{
    fn handle(&self, _req: Req) -> BoxFuture<'_, Result<Res>> {
        debug!("no middleware produced a response");
        Box::pin(std::future::ready(Err(Error::EmptyPipeline)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_fails() {
        let err = Handler::<(), ()>::handle(&EmptyPipelineHandler, ()).await.unwrap_err();

        assert!(err.is_empty_pipeline());
        assert_eq!(err.to_string(), "No middleware available to process the request");
    }
}
