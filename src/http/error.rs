use std::fmt::{Debug, Display};

use bytes::Bytes;
use futures::Stream;
use http::{header, HeaderValue, StatusCode};

use super::{headers::HeadersExt, response::ResponseBody, Headers, Response};
use crate::Result;

/// Payload an [`HttpError`] turns into a response body.
pub enum ErrorBody {
    Text(String),
    Bytes(Bytes),
    Stream(ResponseBody),
}

impl From<&str> for ErrorBody {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ErrorBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Bytes> for ErrorBody {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl Debug for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// An application failure a handler wants answered with a specific response.
///
/// Returning it as `Err(Error::Http(..))` from a handler or middleware makes the exchange
/// send the converted response instead of failing.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    message: Option<ErrorBody>,
    headers: Headers,
}

impl HttpError {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
            headers: Headers::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<ErrorBody>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_stream<S>(mut self, body: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        self.message = Some(ErrorBody::Stream(Box::pin(body)));
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn message(&self) -> Option<&ErrorBody> {
        self.message.as_ref()
    }

    pub fn into_response(self) -> Response {
        let mut response = match self.message {
            Some(ErrorBody::Text(text)) => Response::text(self.status, text),
            Some(ErrorBody::Bytes(bytes)) => Response::bytes(self.status, bytes),
            Some(ErrorBody::Stream(stream)) => Response::new(self.status).with_stream(stream),
            None => Response::text(
                self.status,
                self.status.canonical_reason().unwrap_or_default(),
            ),
        };
        for (name, value) in self.headers {
            if name == header::CONTENT_TYPE {
                response.headers_mut().retain(|(key, _)| *key != name);
            }
            response.headers_mut().push((name, value));
        }
        if !response.headers().iter().any(|(key, _)| key == header::CONTENT_TYPE)
            && response.has_body()
        {
            response.headers_mut().push((
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ));
        }
        response
    }
}

impl From<StatusCode> for HttpError {
    fn from(value: StatusCode) -> Self {
        Self::new(value)
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handler returned status code {}", self.status)?;
        if let Some(ErrorBody::Text(text)) = &self.message {
            write!(f, ": {text}")?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}
