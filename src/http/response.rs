use std::{fmt::Debug, pin::Pin};

use bytes::Bytes;
use futures::{stream, Stream};
use http::{header, HeaderValue, StatusCode};

use super::{headers::HeadersExt, Headers};
use crate::Result;

pub type ResponseBody = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send + 'static>>;

/// A secondary resource the gateway may push alongside the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Push {
    pub path: String,
    pub headers: Headers,
}

/// The handler's answer: status, ordered headers, optional streamed body and pushes.
pub struct Response {
    pub status: StatusCode,
    headers: Headers,
    body: Option<ResponseBody>,
    pushes: Vec<Push>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: None,
            pushes: Vec::new(),
        }
    }

    pub fn error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut response = Self::new(status);
        response.headers.push((
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        ));
        response.set_body(Bytes::from(body.into()));
        response
    }

    pub fn bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let mut response = Self::new(status);
        response.set_body(body.into());
        response
    }

    /// The built-in answer for requests no route matched.
    pub fn not_found() -> Self {
        Self::text(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn set_body(&mut self, body: Bytes) {
        self.body = Some(Box::pin(stream::iter([Ok::<_, crate::Error>(body)])));
    }

    pub fn set_chunks<I>(&mut self, chunks: I)
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: Send + 'static,
    {
        self.body = Some(Box::pin(stream::iter(chunks.into_iter().map(Ok::<_, crate::Error>))));
    }

    pub fn set_stream<S>(&mut self, body: S)
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        self.body = Some(Box::pin(body));
    }

    pub fn with_stream<S>(mut self, body: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        self.set_stream(body);
        self
    }

    pub fn take_body(&mut self) -> Option<ResponseBody> {
        self.body.take()
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn push(&mut self, path: impl Into<String>, headers: Headers) {
        self.pushes.push(Push {
            path: path.into(),
            headers,
        });
    }

    pub fn pushes(&self) -> &[Push] {
        &self.pushes
    }

    pub(crate) fn into_parts(self) -> (StatusCode, Headers, Option<ResponseBody>, Vec<Push>) {
        (self.status, self.headers, self.body, self.pushes)
    }
}

impl HeadersExt for Response {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}

impl Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body.is_some())
            .field("pushes", &self.pushes)
            .finish()
    }
}

impl From<StatusCode> for Response {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn not_found_is_plain_text() {
        let mut response = Response::not_found();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(
            response.header_str(header::CONTENT_TYPE),
            Some("text/plain; charset=utf-8")
        );
        let body: Vec<Bytes> = response.take_body().unwrap().try_collect().await.unwrap();
        assert_eq!(body, vec![Bytes::from_static(b"Not Found")]);
    }

    #[test]
    fn status_only_response_has_no_body() {
        let response = Response::from(StatusCode::NO_CONTENT);
        assert!(!response.has_body());
        assert!(response.headers().is_empty());
    }
}
