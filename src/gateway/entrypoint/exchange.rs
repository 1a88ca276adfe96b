use std::pin::pin;

use bytes::Bytes;
use futures::{
    future::{self, Either},
    StreamExt, TryStreamExt,
};
use tracing::{debug, info};

use super::EntryPoint;
use crate::{
    gateway::{
        handler::HandlerService,
        router::Router,
    },
    http::{BodyStream, Request, Response, Scope},
    io::{
        Inbound, InboundEvent, Outbound, OutboundEvent, ProtocolError, ReadHalf, UnexpectedEvent,
        WriteHalf,
    },
    utils::Also,
    Error, Matches, MiddlewareChain, Result, State,
};

/// One HTTP request/response exchange, from the first `http.request` event to the last
/// `http.response.body` event.
pub(crate) struct ExchangeInstance {
    scope: Scope,
    handler: HandlerService,
    matches: Matches,
    state: State,
}

impl ExchangeInstance {
    /// Resolves the route up front; a miss resolves to the not-found handler.
    pub(crate) fn new(entrypoint: &EntryPoint, scope: Scope) -> Result<Self> {
        let resolved = entrypoint.router.resolve(&scope.method, &scope.path)?;
        let handler = if entrypoint.middlewares.is_empty() {
            resolved.handler
        } else {
            MiddlewareChain::build(entrypoint.middlewares.iter().cloned(), resolved.handler)
        };
        Ok(Self {
            scope,
            handler,
            matches: resolved.matches,
            state: entrypoint.state.clone(),
        })
    }

    pub(crate) async fn run(self, mut inbound: ReadHalf, mut outbound: WriteHalf) -> Result<()> {
        let Self {
            scope,
            handler,
            matches,
            state,
        } = self;
        debug!(state = "awaiting request body", method = %scope.method, path = %scope.path);
        let (first, more_body) = match inbound.receive().await? {
            InboundEvent::HttpRequest { body, more_body } => (body, more_body),
            InboundEvent::HttpDisconnect => {
                info!(path = %scope.path, "peer disconnected before the request arrived");
                return Ok(());
            }
            event => {
                return Err(UnexpectedEvent::new(
                    "awaiting request body",
                    "http.request",
                    event.kind(),
                )
                .into())
            }
        };
        let body = BodyStream::new(inbound, first, more_body);
        let request = Request::from_scope(&scope, matches, body.clone(), state);

        debug!(state = "executing", handler = handler.name());
        let response = match handler.call(request).await {
            Ok(response) => response,
            Err(Error::Http(error)) => {
                debug!(status = %error.status, "handler answered with an HTTP error");
                error.into_response()
            }
            Err(error) if error.is_disconnect() => {
                info!(path = %scope.path, "peer disconnected while the request body was read");
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        debug!(state = "draining");
        match body.flush().await {
            Err(error) if !error.is_disconnect() => return Err(error),
            _ => {}
        }
        let disconnected = body.is_disconnected().await;
        let inbound = match body.take_inbound().await {
            Some(inbound) if !disconnected => inbound,
            _ => {
                info!(path = %scope.path, "peer disconnected before the response was sent");
                return Ok(());
            }
        };

        debug!(state = "sending response", status = %response.status);
        let status = response.status;
        respond(inbound, &mut outbound, response, scope.supports_push())
            .await
            .also(|r| {
                if r.is_ok() {
                    info!(method = %scope.method, path = %scope.path, %status, "exchange finished");
                }
            })
    }
}

/// Sends the response while watching for a disconnect; whichever finishes first decides.
async fn respond(
    mut inbound: ReadHalf,
    outbound: &mut WriteHalf,
    response: Response,
    push: bool,
) -> Result<()> {
    let send = pin!(send_response(outbound, response, push));
    let watch = pin!(inbound.receive());
    match future::select(send, watch).await {
        Either::Left((sent, _)) => sent,
        Either::Right((Ok(InboundEvent::HttpDisconnect), _)) => {
            info!("peer disconnected while the response was being sent");
            Ok(())
        }
        Either::Right((Ok(event), _)) => Err(UnexpectedEvent::new(
            "sending response",
            "http.disconnect",
            event.kind(),
        )
        .into()),
        Either::Right((Err(Error::Protocol(ProtocolError::ChannelClosed)), send)) => {
            debug!("event source closed, finishing the response");
            send.await
        }
        Either::Right((Err(error), _)) => Err(error),
    }
}

async fn send_response(outbound: &mut WriteHalf, response: Response, push: bool) -> Result<()> {
    let (status, headers, body, pushes) = response.into_parts();
    outbound
        .send(OutboundEvent::HttpResponseStart { status, headers })
        .await?;
    if push {
        for resource in pushes {
            outbound
                .send(OutboundEvent::HttpResponsePush {
                    path: resource.path,
                    headers: resource.headers,
                })
                .await?;
        }
    } else if !pushes.is_empty() {
        debug!(count = pushes.len(), "push not negotiated, skipping");
    }

    let Some(body) = body else {
        return outbound
            .send(OutboundEvent::HttpResponseBody {
                body: Bytes::new(),
                more_body: false,
            })
            .await;
    };
    // One chunk of look-ahead decides `more_body` on the chunk being sent.
    let mut body = body.fuse();
    let mut current = body.try_next().await?.unwrap_or_default();
    loop {
        let next = body.try_next().await?;
        let more_body = next.is_some();
        outbound
            .send(OutboundEvent::HttpResponseBody {
                body: current,
                more_body,
            })
            .await?;
        match next {
            Some(chunk) => current = chunk,
            None => return Ok(()),
        }
    }
}
