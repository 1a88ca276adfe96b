use http::{Extensions, Method};

use super::{body::BodyStream, headers::HeadersExt, Headers, Scope};
use crate::{Matches, State};

/// Per-exchange view handed to middleware and handlers.
///
/// `state` is shared by every exchange of the application; `ctx` belongs to this exchange's
/// middleware chain only and is dropped with the request.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query_string: String,
    pub version: String,
    headers: Headers,
    pub matches: Matches,
    body: BodyStream,
    state: State,
    ctx: Extensions,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_string: String::new(),
            version: "1.1".to_string(),
            headers: Headers::new(),
            matches: Matches::default(),
            body: BodyStream::empty(),
            state: State::default(),
            ctx: Extensions::new(),
        }
    }

    pub(crate) fn from_scope(scope: &Scope, matches: Matches, body: BodyStream, state: State) -> Self {
        Self {
            method: scope.method.clone(),
            path: scope.path.clone(),
            query_string: scope.query_string.clone(),
            version: scope.http_version.clone(),
            headers: scope.headers().clone(),
            matches,
            body,
            state,
            ctx: Extensions::new(),
        }
    }

    pub fn with_body(mut self, body: BodyStream) -> Self {
        self.body = body;
        self
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    pub fn body(&mut self) -> &mut BodyStream {
        &mut self.body
    }

    pub fn take_body(&mut self) -> BodyStream {
        std::mem::replace(&mut self.body, BodyStream::empty())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn ctx(&self) -> &Extensions {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut Extensions {
        &mut self.ctx
    }
}

impl HeadersExt for Request {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}
