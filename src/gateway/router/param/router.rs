use std::{collections::HashMap, sync::Arc};

use http::Method;
use tracing::debug;

use super::{definition::PathDefinition, value::Matches};
use crate::{
    gateway::{
        handler::{HandlerService, SocketHandlerService},
        router::{Resolved, Router},
    },
    http::{Request, Response},
    io::ConfigError,
    Result,
};

/// One registered endpoint.
#[derive(Clone)]
pub struct Route<H> {
    pub definition: PathDefinition,
    pub handler: H,
}

/// Routes of one method (or of the websocket table) in registration order.
#[derive(Clone)]
pub struct Routes<H>(Vec<Route<H>>);

impl<H> Default for Routes<H> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<H: Clone> Routes<H> {
    pub fn push(&mut self, definition: PathDefinition, handler: H) {
        self.0.push(Route {
            definition,
            handler,
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First route whose template matches wins.
    pub fn find(&self, path: &str) -> Result<Option<(H, Matches)>> {
        for route in &self.0 {
            if let Some(matches) = route.definition.matches(path)? {
                debug!(template = route.definition.template(), path, "route matched");
                return Ok(Some((route.handler.clone(), matches)));
            }
        }
        Ok(None)
    }
}

pub(crate) fn default_not_found() -> HandlerService {
    Arc::new(|_: Request| async { Ok::<_, crate::Error>(Response::not_found()) })
}

/// Method-indexed router over compiled templates with a replaceable not-found handler.
#[derive(Clone)]
pub struct ParamRouter {
    routes: HashMap<Method, Routes<HandlerService>>,
    not_found: HandlerService,
}

impl Default for ParamRouter {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
            not_found: default_not_found(),
        }
    }
}

impl ParamRouter {
    pub(crate) fn new(
        routes: HashMap<Method, Routes<HandlerService>>,
        not_found: HandlerService,
    ) -> Self {
        Self { routes, not_found }
    }

    pub fn set_not_found(&mut self, handler: HandlerService) {
        self.not_found = handler;
    }
}

impl Router for ParamRouter {
    fn resolve(&self, method: &Method, path: &str) -> Result<Resolved> {
        let found = match self.routes.get(method) {
            Some(routes) => routes.find(path)?,
            None => None,
        };
        Ok(match found {
            Some((handler, matches)) => Resolved { handler, matches },
            None => {
                debug!(%method, path, "no route matched");
                Resolved {
                    handler: self.not_found.clone(),
                    matches: Matches::new(),
                }
            }
        })
    }
}

/// Path-only router for websocket sessions; a miss is a configuration error.
#[derive(Clone, Default)]
pub struct SocketRouter {
    routes: Routes<SocketHandlerService>,
}

impl SocketRouter {
    pub fn add_route(&mut self, template: &str, handler: SocketHandlerService) -> Result<()> {
        self.routes.push(PathDefinition::parse(template)?, handler);
        Ok(())
    }

    pub fn resolve(&self, path: &str) -> Result<(SocketHandlerService, Matches)> {
        self.routes
            .find(path)?
            .ok_or_else(|| ConfigError::NoWebSocketRoute(path.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{gateway::router::ParamRouterBuilder, Error, Value};

    fn named(name: &'static str) -> HandlerService {
        Arc::new(move |_: Request| async move {
            Ok::<_, crate::Error>(Response::text(StatusCode::OK, name))
        })
    }

    async fn winner(router: &ParamRouter, method: Method, path: &str) -> (String, Matches) {
        let resolved = router.resolve(&method, path).unwrap();
        let mut response = resolved
            .handler
            .call(Request::new(method, path))
            .await
            .unwrap();
        let body: Vec<bytes::Bytes> = response.take_body().unwrap().try_collect().await.unwrap();
        (
            String::from_utf8(body.concat()).unwrap(),
            resolved.matches,
        )
    }

    #[tokio::test]
    async fn first_registered_route_wins() {
        let variable_first = ParamRouterBuilder::new()
            .add_route(Method::GET, "/foo/{x}", named("variable"))
            .unwrap()
            .add_route(Method::GET, "/foo/bar", named("literal"))
            .unwrap()
            .build();
        let literal_first = ParamRouterBuilder::new()
            .add_route(Method::GET, "/foo/bar", named("literal"))
            .unwrap()
            .add_route(Method::GET, "/foo/{x}", named("variable"))
            .unwrap()
            .build();
        assert_eq!(winner(&variable_first, Method::GET, "/foo/bar").await.0, "variable");
        assert_eq!(winner(&literal_first, Method::GET, "/foo/bar").await.0, "literal");
    }

    #[tokio::test]
    async fn conversion_failure_falls_through() {
        let router = ParamRouterBuilder::new()
            .add_route(Method::GET, "/items/{id:int}", named("by-id"))
            .unwrap()
            .add_route(Method::GET, "/items/{slug}", named("by-slug"))
            .unwrap()
            .build();
        let (name, matches) = winner(&router, Method::GET, "/items/42").await;
        assert_eq!(name, "by-id");
        assert_eq!(matches.get("id"), Some(&Value::Int(42)));
        let (name, matches) = winner(&router, Method::GET, "/items/abc").await;
        assert_eq!(name, "by-slug");
        assert_eq!(matches.get("slug"), Some(&Value::Str("abc".to_string())));
    }

    #[tokio::test]
    async fn misses_use_the_not_found_handler() {
        let router = ParamRouterBuilder::new()
            .add_route(Method::GET, "/items/{id:int}", named("by-id"))
            .unwrap()
            .build();
        let (body, matches) = winner(&router, Method::GET, "/items/abc").await;
        assert_eq!(body, "Not Found");
        assert!(matches.is_empty());
        assert_eq!(winner(&router, Method::POST, "/items/42").await.0, "Not Found");
    }

    #[tokio::test]
    async fn not_found_is_replaceable() {
        let mut router = ParamRouter::default();
        router.set_not_found(named("custom"));
        assert_eq!(winner(&router, Method::GET, "/").await.0, "custom");
    }

    #[test]
    fn socket_miss_is_a_configuration_error() {
        let mut sockets = SocketRouter::default();
        let echo = |_: crate::WebSocket| async { Ok::<_, crate::Error>(()) };
        sockets.add_route("/ws/{room}", Arc::new(echo)).unwrap();
        let (_, matches) = sockets.resolve("/ws/lobby").unwrap();
        assert_eq!(matches.get("room"), Some(&Value::Str("lobby".to_string())));
        assert!(matches!(
            sockets.resolve("/chat"),
            Err(Error::Config(ConfigError::NoWebSocketRoute(_)))
        ));
    }
}
