//! Request/response, websocket and lifespan programming model on top of an event-based
//! gateway connection.
//!
//! # Example usage
//!
//! ```
//! use gateway_app::{
//!     http::{Request, Response, Scope},
//!     io::{channel, InboundEvent, OutboundEvent},
//!     Error, Next,
//! };
//! use http::{Method, StatusCode};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let app = gateway_app::builder()
//!     .register_middleware(|request: Request, next: Next| async move {
//!         let mut response = next.run(request).await?;
//!         response.status = StatusCode::ACCEPTED;
//!         Ok::<_, Error>(response)
//!     })
//!     .route(Method::GET, "/items/{id:int}", |request: Request| async move {
//!         let id = request.matches.get("id").and_then(|id| id.as_int()).unwrap_or(0);
//!         Ok::<_, Error>(Response::text(StatusCode::OK, format!("item {id}")))
//!     })
//!     .unwrap()
//!     .build();
//!
//! let (inbound, outbound, mut peer) = channel(4);
//! peer.push(InboundEvent::request("", false)).await.unwrap();
//! app.call(Scope::http(Method::GET, "/items/42"), inbound, outbound)
//!     .await
//!     .unwrap();
//! let events = peer.drain().await;
//! assert!(matches!(
//!     events[0],
//!     OutboundEvent::HttpResponseStart { status, .. } if status == StatusCode::ACCEPTED
//! ));
//! # }
//! ```
pub mod gateway;
pub mod http;
pub mod io;
pub mod server;
pub mod utils;

pub use gateway::{
    ctx::State,
    entrypoint::{EntryPoint, Socket, WebSocket},
    handler::{
        Handler, HandlerService, LifespanHandler, LifespanHandlerService, SocketHandler,
        SocketHandlerService,
    },
    middleware::{Middleware, MiddlewareChain, MiddlewareService},
    router::{
        Matches, ParamRouter, ParamRouterBuilder, PathDefinition, PathSegment, Resolved, Router,
        SegmentType, SocketRouter, Value,
    },
    Error, Next, Result,
};
pub use server::app::{builder, App, AppBuilder};
pub use utils::log::install;
