use tracing::{debug, error};

use super::{exchange::ExchangeInstance, lifespan::LifespanInstance, socket::SocketInstance};
use crate::{
    gateway::{
        handler::LifespanHandlerService, middleware::MiddlewareService, router::ParamRouter,
    },
    http::{ConnectionKind, Scope},
    io::{ReadHalf, WriteHalf},
    utils::Also,
    Result, SocketRouter, State,
};

/// Everything an application serves: routes, middleware, lifespan handlers and shared state.
pub struct EntryPoint {
    pub(crate) router: ParamRouter,
    pub(crate) sockets: SocketRouter,
    pub(crate) middlewares: Vec<MiddlewareService>,
    pub(crate) startup: Vec<LifespanHandlerService>,
    pub(crate) shutdown: Vec<LifespanHandlerService>,
    pub(crate) state: State,
}

impl EntryPoint {
    pub fn new(
        router: ParamRouter,
        sockets: SocketRouter,
        middlewares: Vec<MiddlewareService>,
        startup: Vec<LifespanHandlerService>,
        shutdown: Vec<LifespanHandlerService>,
        state: State,
    ) -> Self {
        Self {
            router,
            sockets,
            middlewares,
            startup,
            shutdown,
            state,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Runs the instance matching the scope's connection kind to completion.
    pub async fn handle(&self, scope: Scope, inbound: ReadHalf, outbound: WriteHalf) -> Result<()> {
        let kind = scope.kind;
        debug!(?kind, method = %scope.method, path = %scope.path, "connection opened");
        let result = match kind {
            ConnectionKind::Http => match ExchangeInstance::new(self, scope) {
                Ok(instance) => instance.run(inbound, outbound).await,
                Err(error) => Err(error),
            },
            ConnectionKind::WebSocket => {
                SocketInstance::new(self, scope)
                    .run(inbound, outbound)
                    .await
            }
            ConnectionKind::Lifespan => LifespanInstance::new(self).run(inbound, outbound).await,
        };
        result.also(|r| match r {
            Ok(_) => debug!(?kind, "connection closed"),
            Err(e) => error!(?kind, error = %e, "connection failed"),
        })
    }
}
