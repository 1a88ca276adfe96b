use std::{future::Future, sync::Arc};

use async_trait::async_trait;

use crate::{
    http::{Request, Response},
    Result, State, WebSocket,
};

/// Terminal request handler; also the shape of a composed middleware chain.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: Request) -> Result<Response>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

pub type HandlerService = Arc<dyn Handler + 'static>;

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    async fn call(&self, request: Request) -> Result<Response> {
        (self)(request).await
    }
}

/// Owns a websocket session from the moment the peer connects.
#[async_trait]
pub trait SocketHandler: Send + Sync {
    async fn call(&self, socket: WebSocket) -> Result<()>;
}

pub type SocketHandlerService = Arc<dyn SocketHandler + 'static>;

#[async_trait]
impl<F, Fut> SocketHandler for F
where
    F: Fn(WebSocket) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn call(&self, socket: WebSocket) -> Result<()> {
        (self)(socket).await
    }
}

/// Runs on `lifespan.startup` or `lifespan.shutdown`.
#[async_trait]
pub trait LifespanHandler: Send + Sync {
    async fn call(&self, state: State) -> Result<()>;
}

pub type LifespanHandlerService = Arc<dyn LifespanHandler + 'static>;

#[async_trait]
impl<F, Fut> LifespanHandler for F
where
    F: Fn(State) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn call(&self, state: State) -> Result<()> {
        (self)(state).await
    }
}
