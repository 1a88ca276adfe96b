use std::collections::HashSet;

use http::Method;

use super::{headers::HeadersExt, Headers};

/// Extension flag a gateway sets when it accepts `http.response.push` events.
pub const PUSH_EXTENSION: &str = "http.response.push";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Http,
    WebSocket,
    Lifespan,
}

/// Static description of one connection, handed over by the gateway.
#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ConnectionKind,
    pub method: Method,
    pub path: String,
    pub query_string: String,
    pub http_version: String,
    headers: Headers,
    pub extensions: HashSet<String>,
}

impl Scope {
    fn new(kind: ConnectionKind, method: Method, target: &str) -> Self {
        let (path, query_string) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (target.to_string(), String::new()),
        };
        Self {
            kind,
            method,
            path,
            query_string,
            http_version: "1.1".to_string(),
            headers: Headers::new(),
            extensions: HashSet::new(),
        }
    }

    pub fn http(method: Method, target: &str) -> Self {
        Self::new(ConnectionKind::Http, method, target)
    }

    pub fn websocket(target: &str) -> Self {
        Self::new(ConnectionKind::WebSocket, Method::GET, target)
    }

    pub fn lifespan() -> Self {
        Self::new(ConnectionKind::Lifespan, Method::GET, "/")
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.http_version = version.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.insert(extension.into());
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Push events may only be sent on HTTP/2 or later when the gateway negotiated them.
    pub fn supports_push(&self) -> bool {
        let major = self
            .http_version
            .split('.')
            .next()
            .and_then(|major| major.parse::<u8>().ok())
            .unwrap_or(1);
        major >= 2 && self.extensions.contains(PUSH_EXTENSION)
    }
}

impl HeadersExt for Scope {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}
