use bytes::Bytes;
use http::StatusCode;

use crate::http::Headers;

/// A websocket frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Text(String),
    Binary(Bytes),
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Message::Text(value.to_string())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Message::Text(value)
    }
}

impl From<Bytes> for Message {
    fn from(value: Bytes) -> Self {
        Message::Binary(value)
    }
}

impl From<Vec<u8>> for Message {
    fn from(value: Vec<u8>) -> Self {
        Message::Binary(Bytes::from(value))
    }
}

/// Events received from the hosting gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    HttpRequest { body: Bytes, more_body: bool },
    HttpDisconnect,
    WebSocketConnect,
    WebSocketReceive(Message),
    WebSocketDisconnect { code: u16 },
    LifespanStartup,
    LifespanShutdown,
}

impl InboundEvent {
    pub fn request(body: impl Into<Bytes>, more_body: bool) -> Self {
        Self::HttpRequest {
            body: body.into(),
            more_body,
        }
    }

    /// Wire type of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HttpRequest { .. } => "http.request",
            Self::HttpDisconnect => "http.disconnect",
            Self::WebSocketConnect => "websocket.connect",
            Self::WebSocketReceive(_) => "websocket.receive",
            Self::WebSocketDisconnect { .. } => "websocket.disconnect",
            Self::LifespanStartup => "lifespan.startup",
            Self::LifespanShutdown => "lifespan.shutdown",
        }
    }
}

/// Events sent back to the hosting gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    HttpResponseStart {
        status: StatusCode,
        headers: Headers,
    },
    HttpResponseBody {
        body: Bytes,
        more_body: bool,
    },
    HttpResponsePush {
        path: String,
        headers: Headers,
    },
    WebSocketAccept {
        subprotocol: Option<String>,
        headers: Headers,
    },
    WebSocketSend(Message),
    WebSocketClose {
        code: u16,
    },
    LifespanStartupComplete,
    LifespanStartupFailed {
        message: String,
    },
    LifespanShutdownComplete,
    LifespanShutdownFailed {
        message: String,
    },
}

impl OutboundEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HttpResponseStart { .. } => "http.response.start",
            Self::HttpResponseBody { .. } => "http.response.body",
            Self::HttpResponsePush { .. } => "http.response.push",
            Self::WebSocketAccept { .. } => "websocket.accept",
            Self::WebSocketSend(_) => "websocket.send",
            Self::WebSocketClose { .. } => "websocket.close",
            Self::LifespanStartupComplete => "lifespan.startup.complete",
            Self::LifespanStartupFailed { .. } => "lifespan.startup.failed",
            Self::LifespanShutdownComplete => "lifespan.shutdown.complete",
            Self::LifespanShutdownFailed { .. } => "lifespan.shutdown.failed",
        }
    }
}
