use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tracing::{debug, info};

use super::EntryPoint;
use crate::{
    http::{Headers, Scope},
    io::{
        Inbound, InboundEvent, Message, Outbound, OutboundEvent, ProtocolError, ReadHalf,
        UnexpectedEvent, WriteHalf,
    },
    Matches, Result, State,
};

/// What a websocket handler can do with its session.
#[async_trait]
pub trait Socket: Send {
    /// Must come before any other operation.
    async fn accept(&mut self, subprotocol: Option<String>, headers: Headers) -> Result<()>;

    /// `None` once the peer has disconnected.
    async fn receive(&mut self) -> Result<Option<Message>>;

    async fn send(&mut self, message: Message) -> Result<()>;

    async fn close(&mut self, code: u16) -> Result<()>;
}

/// The session handed to a [`crate::SocketHandler`].
pub struct WebSocket {
    scope: Scope,
    matches: Matches,
    state: State,
    inbound: ReadHalf,
    outbound: WriteHalf,
    accepted: bool,
    disconnected: bool,
    close_code: Arc<Mutex<Option<u16>>>,
}

impl WebSocket {
    pub(crate) fn new(
        scope: Scope,
        matches: Matches,
        state: State,
        inbound: ReadHalf,
        outbound: WriteHalf,
    ) -> Self {
        Self {
            scope,
            matches,
            state,
            inbound,
            outbound,
            accepted: false,
            disconnected: false,
            close_code: Arc::default(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn matches(&self) -> &Matches {
        &self.matches
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Code of the close frame sent, or of the peer's disconnect.
    pub fn close_code(&self) -> Option<u16> {
        self.close_code.lock().ok().and_then(|code| *code)
    }

    fn record_close(&self, code: u16) {
        if let Ok(mut slot) = self.close_code.lock() {
            *slot = Some(code);
        }
    }

    fn ensure_accepted(&self, operation: &'static str) -> Result<()> {
        if self.accepted {
            Ok(())
        } else {
            Err(ProtocolError::NotAccepted(operation).into())
        }
    }
}

#[async_trait]
impl Socket for WebSocket {
    async fn accept(&mut self, subprotocol: Option<String>, headers: Headers) -> Result<()> {
        if self.accepted {
            return Err(ProtocolError::AlreadyAccepted.into());
        }
        self.outbound
            .send(OutboundEvent::WebSocketAccept {
                subprotocol,
                headers,
            })
            .await?;
        self.accepted = true;
        debug!(path = %self.scope.path, "websocket accepted");
        Ok(())
    }

    async fn receive(&mut self) -> Result<Option<Message>> {
        self.ensure_accepted("receive")?;
        if self.disconnected {
            return Ok(None);
        }
        match self.inbound.receive().await? {
            InboundEvent::WebSocketReceive(message) => Ok(Some(message)),
            InboundEvent::WebSocketDisconnect { code } => {
                debug!(code, "websocket peer disconnected");
                self.disconnected = true;
                self.record_close(code);
                Ok(None)
            }
            event => Err(UnexpectedEvent::new(
                "receiving websocket message",
                "websocket.receive",
                event.kind(),
            )
            .into()),
        }
    }

    async fn send(&mut self, message: Message) -> Result<()> {
        self.ensure_accepted("send")?;
        self.outbound.send(OutboundEvent::WebSocketSend(message)).await
    }

    async fn close(&mut self, code: u16) -> Result<()> {
        self.ensure_accepted("close")?;
        self.outbound
            .send(OutboundEvent::WebSocketClose { code })
            .await?;
        self.record_close(code);
        Ok(())
    }
}

impl Debug for WebSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocket")
            .field("path", &self.scope.path)
            .field("matches", &self.matches)
            .field("accepted", &self.accepted)
            .field("disconnected", &self.disconnected)
            .finish_non_exhaustive()
    }
}

/// A websocket session from `websocket.connect` until its handler returns.
pub(crate) struct SocketInstance<'a> {
    entrypoint: &'a EntryPoint,
    scope: Scope,
}

impl<'a> SocketInstance<'a> {
    pub(crate) fn new(entrypoint: &'a EntryPoint, scope: Scope) -> Self {
        Self { entrypoint, scope }
    }

    pub(crate) async fn run(self, mut inbound: ReadHalf, outbound: WriteHalf) -> Result<()> {
        debug!(state = "awaiting connect", path = %self.scope.path);
        match inbound.receive().await? {
            InboundEvent::WebSocketConnect => {}
            event => {
                return Err(UnexpectedEvent::new(
                    "awaiting connect",
                    "websocket.connect",
                    event.kind(),
                )
                .into())
            }
        }
        let (handler, matches) = self.entrypoint.sockets.resolve(&self.scope.path)?;
        let path = self.scope.path.clone();
        let socket = WebSocket::new(
            self.scope,
            matches,
            self.entrypoint.state.clone(),
            inbound,
            outbound,
        );
        let close_code = socket.close_code.clone();
        debug!(state = "handler owned", %path);
        handler.call(socket).await?;
        let code = close_code.lock().ok().and_then(|code| *code);
        info!(%path, ?code, "websocket session finished");
        Ok(())
    }
}
