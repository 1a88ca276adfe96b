pub mod ctx;
pub mod entrypoint;
pub mod handler;
pub mod middleware;
pub mod next;
pub mod router;

use std::fmt::Display;

use crate::{
    http::HttpError,
    io::{ConfigError, ProtocolError, UnexpectedEvent},
};

pub use next::Next;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Protocol(ProtocolError),
    Config(ConfigError),
    Http(HttpError),
    App(anyhow::Error),
    /// Application error that keeps the name of its concrete type.
    Typed {
        name: &'static str,
        error: anyhow::Error,
    },
}

impl Error {
    pub fn new<S: AsRef<str>>(message: S) -> Self {
        Self::App(anyhow::anyhow!(message.as_ref().to_string()))
    }

    pub fn http(error: HttpError) -> Self {
        Self::Http(error)
    }

    /// Wraps an application error so lifespan reports carry its type name.
    pub fn typed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let full = std::any::type_name::<E>();
        let base = full.split('<').next().unwrap_or(full);
        Self::Typed {
            name: base.rsplit("::").next().unwrap_or(base),
            error: anyhow::Error::new(error),
        }
    }

    /// Short type name reported on the lifespan channel.
    ///
    /// Untyped application errors (`Error::new`, `anyhow::Error`) report `ApplicationError`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "ProtocolError",
            Self::Config(_) => "ConfigError",
            Self::Http(_) => "HttpError",
            Self::App(_) => "ApplicationError",
            Self::Typed { name, .. } => *name,
        }
    }

    /// The peer went away while the request body was being read.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Protocol(ProtocolError::Disconnected))
    }
}

impl From<ProtocolError> for Error {
    fn from(value: ProtocolError) -> Self {
        Self::Protocol(value)
    }
}

impl From<UnexpectedEvent> for Error {
    fn from(value: UnexpectedEvent) -> Self {
        Self::Protocol(value.into())
    }
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<HttpError> for Error {
    fn from(value: HttpError) -> Self {
        Self::Http(value)
    }
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Self::App(value)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protocol(error) => error.fmt(f),
            Self::Config(error) => error.fmt(f),
            Self::Http(error) => error.fmt(f),
            Self::App(error) => error.fmt(f),
            Self::Typed { error, .. } => error.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Protocol(error) => Some(error),
            Self::Config(error) => Some(error),
            Self::Http(error) => Some(error),
            Self::App(error) => Some(error.as_ref()),
            Self::Typed { error, .. } => Some(error.as_ref()),
        }
    }
}
