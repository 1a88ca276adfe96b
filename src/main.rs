use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use gateway_app::{
    http::{HeadersExt, Request, Response, Scope},
    io::{channel, InboundEvent, OutboundEvent},
    Error, Next, Result,
};
use http::{Method, StatusCode};
use structopt::StructOpt;
use tracing::info;

/// Drives one in-memory HTTP exchange through a sample application and prints the events it emits.
#[derive(Debug, StructOpt)]
#[structopt(name = "gateway-app")]
struct Opt {
    /// Request method
    #[structopt(default_value = "GET")]
    method: Method,
    /// Request target, query string included
    #[structopt(default_value = "/hello/world")]
    path: String,
    /// Request body, sent in chunks of `--chunk` bytes
    body: Option<String>,
    #[structopt(long, default_value = "4")]
    chunk: usize,
}

#[derive(Default)]
struct Hits(AtomicUsize);

async fn hello(request: Request) -> Result<Response> {
    let name = request
        .matches
        .get("name")
        .and_then(|name| name.as_str())
        .unwrap_or("nobody");
    Ok(Response::text(StatusCode::OK, format!("Hello, {name}!")))
}

async fn item(request: Request) -> Result<Response> {
    let id = request.matches.get("id").and_then(|id| id.as_int());
    match id {
        Some(id) if id > 0 => Ok(Response::text(StatusCode::OK, format!("item {id}"))),
        _ => Err(gateway_app::http::HttpError::new(StatusCode::UNPROCESSABLE_ENTITY)
            .with_message("ids start at 1")
            .into()),
    }
}

async fn echo(mut request: Request) -> Result<Response> {
    let body = request.body().read_all().await?;
    let mut response = Response::new(StatusCode::OK);
    response.set_chunks(body.chunks(8).map(Bytes::copy_from_slice).collect::<Vec<_>>());
    Ok(response)
}

async fn count(request: Request, next: Next) -> Result<Response> {
    let hits = request
        .state()
        .get::<Hits>()
        .map(|hits| hits.0.fetch_add(1, Ordering::Relaxed) + 1)
        .unwrap_or_default();
    let mut response = next.run(request).await?;
    response.insert_header("x-server", "gateway-app")?;
    response.insert_header("x-hits", hits.to_string())?;
    Ok(response)
}

fn request_events(body: Option<String>, chunk: usize) -> Vec<InboundEvent> {
    let body = Bytes::from(body.unwrap_or_default());
    if body.is_empty() {
        return vec![InboundEvent::request(Bytes::new(), false)];
    }
    let chunks = body.chunks(chunk.max(1)).collect::<Vec<_>>();
    let last = chunks.len() - 1;
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, part)| InboundEvent::request(Bytes::copy_from_slice(part), i != last))
        .collect()
}

fn describe(event: &OutboundEvent) -> String {
    match event {
        OutboundEvent::HttpResponseStart { status, headers } => {
            let headers = headers
                .iter()
                .map(|(name, value)| format!("{name}: {}", value.to_str().unwrap_or("<binary>")))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} status={status} headers=[{headers}]", event.kind())
        }
        OutboundEvent::HttpResponseBody { body, more_body } => format!(
            "{} body={:?} more_body={more_body}",
            event.kind(),
            String::from_utf8_lossy(body)
        ),
        other => format!("{other:?}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    gateway_app::install();
    let opt = Opt::from_args();
    let app = gateway_app::builder()
        .with_state(Hits::default())
        .register_middleware(count)
        .route(Method::GET, "/hello/{name}", hello)?
        .route(Method::GET, "/items/{id:int}", item)?
        .route(Method::POST, "/echo", echo)?
        .with_not_found(|request: Request| async move {
            Ok::<_, Error>(Response::text(
                StatusCode::NOT_FOUND,
                format!("nothing at {}", request.path),
            ))
        })
        .build();

    let events = request_events(opt.body, opt.chunk);
    let (inbound, outbound, mut peer) = channel(events.len());
    for event in events {
        peer.push(event).await?;
    }
    info!(method = %opt.method, path = %opt.path, "driving exchange");
    app.call(Scope::http(opt.method, &opt.path), inbound, outbound)
        .await?;
    for event in peer.drain().await {
        println!("{}", describe(&event));
    }
    Ok(())
}
