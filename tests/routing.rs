mod helper;

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use gateway_app::{
    http::{HeadersExt, Request, Response, Scope},
    io::{ConfigError, InboundEvent, OutboundEvent},
    Error, Next, Value,
};
use helper::{body_events, exchange, setup};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;

fn start_of(events: &[OutboundEvent]) -> (StatusCode, Option<String>) {
    match &events[0] {
        OutboundEvent::HttpResponseStart { status, headers } => (
            *status,
            headers.header_str("x-trace").map(str::to_string),
        ),
        other => panic!("unexpected {other:?}"),
    }
}

async fn get(app: &gateway_app::App, path: &str) -> Vec<OutboundEvent> {
    let (result, events) = exchange(
        app,
        Scope::http(Method::GET, path),
        vec![InboundEvent::request("", false)],
    )
    .await;
    result.unwrap();
    events
}

#[tokio::test]
async fn typed_route_resolves_and_misses_fall_to_not_found() {
    let app = setup(|builder| {
        builder
            .route(Method::GET, "/items/{id:int}", |request: Request| async move {
                let id = request.matches.get("id").and_then(Value::as_int).unwrap_or_default();
                Ok::<_, Error>(Response::text(StatusCode::OK, format!("item {id}")))
            })
            .unwrap()
    });
    let events = get(&app, "/items/42").await;
    assert_eq!(start_of(&events).0, StatusCode::OK);
    assert_eq!(
        body_events(&events),
        vec![(Bytes::from_static(b"item 42"), false)]
    );

    let events = get(&app, "/items/abc").await;
    assert_eq!(start_of(&events).0, StatusCode::NOT_FOUND);
    assert_eq!(
        body_events(&events),
        vec![(Bytes::from_static(b"Not Found"), false)]
    );
}

#[tokio::test]
async fn greedy_path_and_query_string() {
    let app = setup(|builder| {
        builder
            .route(Method::GET, "/ui/{rest:path}", |request: Request| async move {
                let rest = request
                    .matches
                    .get("rest")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok::<_, Error>(Response::text(
                    StatusCode::OK,
                    format!("{rest}?{}", request.query_string),
                ))
            })
            .unwrap()
    });
    let events = get(&app, "/ui/a/b/c?theme=dark").await;
    assert_eq!(
        body_events(&events),
        vec![(Bytes::from_static(b"a/b/c?theme=dark"), false)]
    );
    let events = get(&app, "/ui/").await;
    assert_eq!(body_events(&events), vec![(Bytes::from_static(b"?"), false)]);
}

#[tokio::test]
async fn custom_not_found_sees_the_request() {
    let app = setup(|builder| {
        builder.with_not_found(|request: Request| async move {
            Ok::<_, Error>(Response::text(
                StatusCode::GONE,
                format!("{} {}", request.method, request.path),
            ))
        })
    });
    let events = get(&app, "/old").await;
    assert_eq!(start_of(&events).0, StatusCode::GONE);
    assert_eq!(
        body_events(&events),
        vec![(Bytes::from_static(b"GET /old"), false)]
    );
}

#[tokio::test]
async fn middleware_wraps_routes_and_not_found_in_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let (outer, inner) = (order.clone(), order.clone());
    let app = setup(move |builder| {
        builder
            .register_middleware(move |request: Request, next: Next| {
                let order = outer.clone();
                async move {
                    order.lock().unwrap().push("outer");
                    let mut response = next.run(request).await?;
                    response.insert_header("x-trace", "outer")?;
                    Ok::<_, Error>(response)
                }
            })
            .register_middleware(move |request: Request, next: Next| {
                let order = inner.clone();
                async move {
                    order.lock().unwrap().push("inner");
                    if request.path == "/admin" {
                        return Ok::<_, Error>(Response::new(StatusCode::FORBIDDEN));
                    }
                    next.run(request).await
                }
            })
            .route(Method::GET, "/admin", |_: Request| async {
                Ok::<_, Error>(Response::new(StatusCode::OK))
            })
            .unwrap()
    });

    let events = get(&app, "/admin").await;
    assert_eq!(
        start_of(&events),
        (StatusCode::FORBIDDEN, Some("outer".to_string()))
    );
    let events = get(&app, "/missing").await;
    assert_eq!(
        start_of(&events),
        (StatusCode::NOT_FOUND, Some("outer".to_string()))
    );
    assert_eq!(
        *order.lock().unwrap(),
        vec!["outer", "inner", "outer", "inner"]
    );
}

#[tokio::test]
async fn shared_state_and_private_context() {
    struct Greeting(&'static str);
    #[derive(Clone)]
    struct User(String);

    let app = setup(|builder| {
        builder
            .with_state(Greeting("hello"))
            .register_middleware(|mut request: Request, next: Next| async move {
                let user = request.header_str("x-user").unwrap_or("anonymous").to_string();
                request.ctx_mut().insert(User(user));
                next.run(request).await
            })
            .route(Method::GET, "/greet", |request: Request| async move {
                let greeting = request.state().get::<Greeting>().map_or("", |g| g.0);
                let user = request.ctx().get::<User>().map(|u| u.0.clone()).unwrap_or_default();
                Ok::<_, Error>(Response::text(StatusCode::OK, format!("{greeting} {user}")))
            })
            .unwrap()
    });
    let scope = Scope::http(Method::GET, "/greet")
        .with_headers(vec![("x-user".parse().unwrap(), "ada".parse().unwrap())]);
    let (result, events) = exchange(&app, scope, vec![InboundEvent::request("", false)]).await;
    result.unwrap();
    assert_eq!(
        body_events(&events),
        vec![(Bytes::from_static(b"hello ada"), false)]
    );
}

#[test]
fn bad_templates_fail_at_registration() {
    let handler = |_: Request| async { Ok::<_, Error>(Response::new(StatusCode::OK)) };
    let result = gateway_app::builder().route(Method::GET, "/a/{id:uuid}", handler);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::UnknownType { .. }))
    ));
    let result = gateway_app::builder().route(Method::GET, "/a/{rest:path}/b", handler);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::PathNotLast(_)))
    ));
}

#[tokio::test]
async fn relative_request_path_is_rejected() {
    let app = setup(|builder| {
        builder
            .route(Method::GET, "/relative", |_: Request| async {
                Ok::<_, Error>(Response::new(StatusCode::OK))
            })
            .unwrap()
    });
    let (result, _) = exchange(
        &app,
        Scope::http(Method::GET, "relative"),
        vec![InboundEvent::request("", false)],
    )
    .await;
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::RelativePath(_)))
    ));
}
