use std::fmt::Display;

#[derive(Debug)]
pub enum ProtocolError {
    UnexpectedEvent(UnexpectedEvent),
    ChannelClosed,
    Disconnected,
    NotAccepted(&'static str),
    AlreadyAccepted,
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEvent(event) => event.fmt(f),
            Self::ChannelClosed => "event channel closed".fmt(f),
            Self::Disconnected => "peer disconnected".fmt(f),
            Self::NotAccepted(operation) => {
                write!(f, "websocket must be accepted before {operation}")
            }
            Self::AlreadyAccepted => "websocket was already accepted".fmt(f),
        }
    }
}

impl std::error::Error for ProtocolError {}

#[derive(Debug)]
pub struct UnexpectedEvent {
    pub state: &'static str,
    pub expected: &'static str,
    pub received: &'static str,
}

impl UnexpectedEvent {
    pub fn new(state: &'static str, expected: &'static str, received: &'static str) -> Self {
        Self {
            state,
            expected,
            received,
        }
    }
}

impl Display for UnexpectedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unexpected event {:?} while {}, expected {}",
            self.received, self.state, self.expected
        )
    }
}

impl From<UnexpectedEvent> for ProtocolError {
    fn from(value: UnexpectedEvent) -> Self {
        ProtocolError::UnexpectedEvent(value)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    UnbalancedBraces(String),
    EmptyVariableName(String),
    UnknownType { segment: String, kind: String },
    FormatNotSupported { segment: String, kind: String },
    PathNotLast(String),
    RelativeTemplate(String),
    RelativePath(String),
    NoWebSocketRoute(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnbalancedBraces(segment) => {
                write!(f, "malformed path segment {segment:?}: unbalanced braces")
            }
            Self::EmptyVariableName(segment) => {
                write!(f, "malformed path segment {segment:?}: missing variable name")
            }
            Self::UnknownType { segment, kind } => {
                write!(f, "unknown type {kind:?} in path segment {segment:?}")
            }
            Self::FormatNotSupported { segment, kind } => {
                write!(f, "type {kind:?} does not take a format in {segment:?}")
            }
            Self::PathNotLast(template) => {
                write!(f, "path type must be the last segment of {template:?}")
            }
            Self::RelativeTemplate(template) => {
                write!(f, "route template {template:?} must start with '/'")
            }
            Self::RelativePath(path) => write!(f, "request path {path:?} must start with '/'"),
            Self::NoWebSocketRoute(path) => write!(f, "no websocket route matches {path:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
