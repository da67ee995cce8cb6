//! # pipewerk
//!
//! An ordered stack of middleware in front of a terminal handler.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! pipewerk never looks at your request or your response. They are type
//! parameters. Transport, routing, and serialisation belong to whatever sits
//! around the pipeline. What's left is the only part that is hard to get
//! right:
//!
//! - **Order** — middleware run in registration order on the way in, and in
//!   reverse on the way out.
//! - **Short-circuit** — a middleware that answers without calling `next`
//!   stops the traversal there.
//! - **Single-shot continuations** — each [`Next`] works exactly once. Calling
//!   it again is [`Error::MiddlewareAlreadyCalled`], never a silent replay.
//! - **Isolated traversals** — concurrent requests through one [`Pipeline`]
//!   each walk their own snapshot.
//!
//! ## Quick start
//!
//! ```rust
//! use pipewerk::{handler_fn, middleware_fn, Handler, Next, Pipeline};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let app = Pipeline::new()
//!     .pipe(middleware_fn(|req: String, next: Next<String, String>| async move {
//!         if req.is_empty() {
//!             return Ok("400".to_owned());
//!         }
//!         next.handle(req).await
//!     }))
//!     .pipe(middleware_fn(|req: String, next: Next<String, String>| async move {
//!         let res = next.handle(req.trim().to_owned()).await;
//!         res.map(|body| format!("[{body}]"))
//!     }));
//!
//! let res = app
//!     .execute(" hello ".to_owned(), handler_fn(|req: String| async move { Ok(req.to_uppercase()) }))
//!     .await
//!     .unwrap();
//! assert_eq!(res, "[HELLO]");
//!
//! // No terminal handler: the request falls off the end.
//! assert!(app.handle("x".to_owned()).await.unwrap_err().is_empty_pipeline());
//! # }
//! ```

mod error;
mod fallback;
mod handler;
mod next;
mod pipeline;

pub mod middleware;

pub use error::{BoxError, Error, Result};
pub use fallback::EmptyPipelineHandler;
pub use handler::{handler_fn, BoxFuture, Handler, HandlerFn};
pub use middleware::{middleware_fn, Middleware, MiddlewareFn};
pub use next::Next;
pub use pipeline::Pipeline;
