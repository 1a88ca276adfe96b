use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use tracing::debug;

use super::{
    handler::{Handler, HandlerService},
    next::Next,
};
use crate::{
    http::{Request, Response},
    utils::Also,
    Result,
};

/// Middleware wraps everything registered after it.
///
/// It may change the request before calling `next`, answer on its own without calling it,
/// or change the response `next` returns.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn run(&self, request: Request, next: Next) -> Result<Response>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

pub type MiddlewareService = Arc<dyn Middleware + 'static>;

#[async_trait]
impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    async fn run(&self, request: Request, next: Next) -> Result<Response> {
        (self)(request, next).await
    }
}

/// One frame of a composed chain: a middleware bound to its continuation.
struct Layer {
    middleware: MiddlewareService,
    next: HandlerService,
}

#[async_trait]
impl Handler for Layer {
    async fn call(&self, request: Request) -> Result<Response> {
        let name = self.middleware.name();
        debug!(middleware = name, method = %request.method, path = %request.path, "-->");
        self.middleware
            .run(request, Next::new(self.next.clone()))
            .await
            .also(|r| match r {
                Ok(response) => debug!(middleware = name, status = %response.status, "<--"),
                Err(error) => debug!(middleware = name, %error, "<--"),
            })
    }

    fn name(&self) -> &'static str {
        self.middleware.name()
    }
}

pub struct MiddlewareChain;

impl MiddlewareChain {
    /// Composes `[m1, .., mn]` around `handler` so that `m1` is the outermost frame.
    ///
    /// The result is itself a [`Handler`] and can be nested in another chain.
    pub fn build<I>(middlewares: I, handler: HandlerService) -> HandlerService
    where
        I: IntoIterator<Item = MiddlewareService>,
        I::IntoIter: DoubleEndedIterator,
    {
        middlewares
            .into_iter()
            .rev()
            .fold(handler, |next, middleware| -> HandlerService {
                Arc::new(Layer { middleware, next })
            })
    }
}
