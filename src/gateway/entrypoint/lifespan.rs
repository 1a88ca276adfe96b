use tracing::{debug, info, warn};

use super::EntryPoint;
use crate::{
    gateway::handler::LifespanHandlerService,
    io::{Inbound, InboundEvent, Outbound, OutboundEvent, ReadHalf, UnexpectedEvent, WriteHalf},
    Result, State,
};

/// Answers `lifespan.startup` and `lifespan.shutdown` until shutdown has been handled.
pub(crate) struct LifespanInstance<'a> {
    entrypoint: &'a EntryPoint,
}

impl<'a> LifespanInstance<'a> {
    pub(crate) fn new(entrypoint: &'a EntryPoint) -> Self {
        Self { entrypoint }
    }

    pub(crate) async fn run(self, mut inbound: ReadHalf, mut outbound: WriteHalf) -> Result<()> {
        let state = &self.entrypoint.state;
        loop {
            match inbound.receive().await? {
                InboundEvent::LifespanStartup => {
                    let event = match run_all("startup", &self.entrypoint.startup, state).await {
                        None => OutboundEvent::LifespanStartupComplete,
                        Some(message) => OutboundEvent::LifespanStartupFailed { message },
                    };
                    outbound.send(event).await?;
                }
                InboundEvent::LifespanShutdown => {
                    let event = match run_all("shutdown", &self.entrypoint.shutdown, state).await {
                        None => OutboundEvent::LifespanShutdownComplete,
                        Some(message) => OutboundEvent::LifespanShutdownFailed { message },
                    };
                    outbound.send(event).await?;
                    info!("lifespan finished");
                    return Ok(());
                }
                event => {
                    return Err(UnexpectedEvent::new(
                        "awaiting lifespan event",
                        "lifespan.startup",
                        event.kind(),
                    )
                    .into())
                }
            }
        }
    }
}

/// Runs every handler in order; returns the first failure as `"<type>: <message>"`.
async fn run_all(
    phase: &'static str,
    handlers: &[LifespanHandlerService],
    state: &State,
) -> Option<String> {
    debug!(phase, handlers = handlers.len(), "running lifespan handlers");
    let mut failure = None;
    for handler in handlers {
        if let Err(error) = handler.call(state.clone()).await {
            warn!(phase, %error, "lifespan handler failed");
            failure.get_or_insert_with(|| format!("{}: {}", error.name(), error));
        }
    }
    failure
}
