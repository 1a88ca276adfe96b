use std::collections::HashMap;

use http::Method;

use super::{
    definition::PathDefinition,
    router::{default_not_found, ParamRouter, Routes},
};
use crate::{gateway::handler::HandlerService, Result};

/// Collects routes in registration order; templates are compiled as they are added.
pub struct ParamRouterBuilder {
    routes: HashMap<Method, Routes<HandlerService>>,
    not_found: HandlerService,
}

impl Default for ParamRouterBuilder {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
            not_found: default_not_found(),
        }
    }
}

impl ParamRouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_route(
        mut self,
        method: Method,
        template: &str,
        handler: HandlerService,
    ) -> Result<Self> {
        let definition = PathDefinition::parse(template)?;
        self.routes
            .entry(method)
            .or_default()
            .push(definition, handler);
        Ok(self)
    }

    pub fn with_not_found(mut self, handler: HandlerService) -> Self {
        self.not_found = handler;
        self
    }

    pub fn build(self) -> ParamRouter {
        ParamRouter::new(self.routes, self.not_found)
    }
}
