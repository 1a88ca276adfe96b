use std::env;

use bytes::Bytes;
use gateway_app::{
    http::Scope,
    io::{channel, InboundEvent, OutboundEvent, Peer},
    App, AppBuilder, Result,
};
use tokio::task::JoinHandle;

/// One connection driven by a spawned `App::call`, seen from the gateway's side.
pub struct Context {
    pub peer: Peer,
    app: JoinHandle<Result<()>>,
}

impl Context {
    pub async fn send(&self, event: InboundEvent) {
        self.peer.push(event).await.unwrap();
    }

    #[allow(dead_code)]
    pub async fn next_event(&mut self) -> Option<OutboundEvent> {
        self.peer.rx.recv().await
    }

    /// Waits for the application to finish, then collects what it sent.
    pub async fn finish(mut self) -> (Result<()>, Vec<OutboundEvent>) {
        let result = self.app.await.unwrap();
        (result, self.peer.drain().await)
    }
}

#[allow(dead_code)]
pub fn setup(modify: impl FnOnce(AppBuilder) -> AppBuilder) -> App {
    setup_system();
    modify(gateway_app::builder()).build()
}

pub fn connect(app: &App, scope: Scope) -> Context {
    let (inbound, outbound, peer) = channel(16);
    let app = app.clone();
    Context {
        peer,
        app: tokio::spawn(async move { app.call(scope, inbound, outbound).await }),
    }
}

/// Runs a whole exchange whose inbound events are known up front.
#[allow(dead_code)]
pub async fn exchange(
    app: &App,
    scope: Scope,
    events: Vec<InboundEvent>,
) -> (Result<()>, Vec<OutboundEvent>) {
    let context = connect(app, scope);
    for event in events {
        context.send(event).await;
    }
    context.finish().await
}

#[allow(dead_code)]
pub fn body_events(events: &[OutboundEvent]) -> Vec<(Bytes, bool)> {
    events
        .iter()
        .filter_map(|event| match event {
            OutboundEvent::HttpResponseBody { body, more_body } => Some((body.clone(), *more_body)),
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn kinds(events: &[OutboundEvent]) -> Vec<&'static str> {
    events.iter().map(OutboundEvent::kind).collect()
}

fn setup_system() {
    if env::var("CI").is_err() {
        env::set_var("RUST_LOG", "debug");
        env::set_var("RUST_BACKTRACE", "0");
        gateway_app::install();
    }
}
