use std::{any::Any, sync::Arc};

use http::Method;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    gateway::{
        entrypoint::EntryPoint,
        handler::{Handler, LifespanHandler, LifespanHandlerService, SocketHandler},
        middleware::{Middleware, MiddlewareService},
        router::{ParamRouterBuilder, SocketRouter},
    },
    http::Scope,
    io::{ReadHalf, WriteHalf},
    Result, State,
};

/// A builder for an application.
pub struct AppBuilder {
    router: ParamRouterBuilder,
    sockets: SocketRouter,
    middlewares: Vec<MiddlewareService>,
    startup: Vec<LifespanHandlerService>,
    shutdown: Vec<LifespanHandlerService>,
    state: State,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self {
            router: ParamRouterBuilder::new(),
            sockets: SocketRouter::default(),
            middlewares: Vec::new(),
            startup: Vec::new(),
            shutdown: Vec::new(),
            state: State::default(),
        }
    }
}

impl AppBuilder {
    /// Register a handler for `method` and `template`.
    /// Malformed templates are rejected here, never at match time.
    pub fn route<H: Handler + 'static>(
        mut self,
        method: Method,
        template: &str,
        handler: H,
    ) -> Result<Self> {
        debug!(%method, template, "registering route");
        self.router = self.router.add_route(method, template, Arc::new(handler))?;
        Ok(self)
    }

    /// Register a websocket handler for `template`.
    pub fn websocket<H: SocketHandler + 'static>(mut self, template: &str, handler: H) -> Result<Self> {
        debug!(template, "registering websocket route");
        self.sockets.add_route(template, Arc::new(handler))?;
        Ok(self)
    }

    /// Register a middleware.
    /// The first registered middleware is the outermost one.
    pub fn register_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Replace the handler used when no route matches.
    /// The default answers `404 Not Found` in plain text.
    pub fn with_not_found<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.router = self.router.with_not_found(Arc::new(handler));
        self
    }

    /// Set the application-wide state shared by every exchange.
    pub fn with_state<T: Any + Send + Sync>(mut self, state: T) -> Self {
        self.state = State::new(state);
        self
    }

    pub fn on_startup<H: LifespanHandler + 'static>(mut self, handler: H) -> Self {
        self.startup.push(Arc::new(handler));
        self
    }

    pub fn on_shutdown<H: LifespanHandler + 'static>(mut self, handler: H) -> Self {
        self.shutdown.push(Arc::new(handler));
        self
    }

    /// Build the application with the given configuration.
    pub fn build(self) -> App {
        info!(
            middlewares = self.middlewares.len(),
            startup = self.startup.len(),
            shutdown = self.shutdown.len(),
            "application built"
        );
        App(Arc::new(EntryPoint::new(
            self.router.build(),
            self.sockets,
            self.middlewares,
            self.startup,
            self.shutdown,
            self.state,
        )))
    }
}

/// The callable the hosting gateway drives, one call per connection.
#[derive(Clone)]
pub struct App(Arc<EntryPoint>);

impl App {
    pub async fn call(&self, scope: Scope, inbound: ReadHalf, outbound: WriteHalf) -> Result<()> {
        self.0.handle(scope, inbound, outbound).await
    }

    /// Like [`App::call`], but a cancelled `token` ends the connection quietly.
    pub async fn call_until(
        &self,
        scope: Scope,
        inbound: ReadHalf,
        outbound: WriteHalf,
        token: CancellationToken,
    ) -> Result<()> {
        tokio::select! {
            result = self.call(scope, inbound, outbound) => result,
            _ = token.cancelled() => {
                debug!("connection cancelled by the host");
                Ok(())
            }
        }
    }

    pub fn state(&self) -> &State {
        self.0.state()
    }
}

/// Create a new application builder.
pub fn builder() -> AppBuilder {
    AppBuilder::default()
}
