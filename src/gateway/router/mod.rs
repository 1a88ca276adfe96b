use http::Method;

use super::handler::HandlerService;
use crate::Result;

pub use param::{
    Matches, ParamRouter, ParamRouterBuilder, PathDefinition, PathSegment, Route, Routes,
    SegmentType, SocketRouter, Value,
};

mod param;

/// Outcome of routing: the handler to run and the variables its template captured.
pub struct Resolved {
    pub handler: HandlerService,
    pub matches: Matches,
}

pub trait Router: Send + Sync {
    /// Never mutates the router; a miss resolves to the not-found handler.
    fn resolve(&self, method: &Method, path: &str) -> Result<Resolved>;
}
