use std::{fmt::Debug, sync::Arc};

use bytes::{Bytes, BytesMut};
use futures::{stream, Stream};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    io::{Inbound, InboundEvent, ProtocolError, ReadHalf, UnexpectedEvent},
    Result,
};

struct BodyState {
    inbound: Option<ReadHalf>,
    pending: Option<Bytes>,
    more_body: bool,
    disconnected: bool,
}

impl BodyState {
    async fn pull(&mut self) -> Result<Option<Bytes>> {
        if self.disconnected {
            return Err(ProtocolError::Disconnected.into());
        }
        if let Some(chunk) = self.pending.take() {
            return Ok(Some(chunk));
        }
        while self.more_body {
            let Some(inbound) = self.inbound.as_mut() else {
                self.more_body = false;
                break;
            };
            match inbound.receive().await? {
                InboundEvent::HttpRequest { body, more_body } => {
                    self.more_body = more_body;
                    if !body.is_empty() {
                        return Ok(Some(body));
                    }
                }
                InboundEvent::HttpDisconnect => {
                    debug!("peer disconnected while the request body was streaming");
                    self.more_body = false;
                    self.disconnected = true;
                    return Err(ProtocolError::Disconnected.into());
                }
                event => {
                    return Err(UnexpectedEvent::new(
                        "receiving request body",
                        "http.request",
                        event.kind(),
                    )
                    .into())
                }
            }
        }
        Ok(None)
    }
}

/// Lazy, single-pass request body fed by `http.request` events.
///
/// The first chunk is the one that opened the exchange; further chunks are pulled from the
/// gateway only when asked for. Empty chunks are skipped. A disconnect mid-body is an
/// error, so a truncated body never reads as a complete one.
#[derive(Clone)]
pub struct BodyStream(Arc<Mutex<BodyState>>);

impl BodyStream {
    pub(crate) fn new(inbound: ReadHalf, first: Bytes, more_body: bool) -> Self {
        Self(Arc::new(Mutex::new(BodyState {
            inbound: Some(inbound),
            pending: (!first.is_empty()).then_some(first),
            more_body,
            disconnected: false,
        })))
    }

    /// A body that is already complete.
    pub fn from_bytes(body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self(Arc::new(Mutex::new(BodyState {
            inbound: None,
            pending: (!body.is_empty()).then_some(body),
            more_body: false,
            disconnected: false,
        })))
    }

    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    /// Pulls the next chunk; `None` once the body is exhausted, `ProtocolError::Disconnected`
    /// once the peer has gone.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        self.0.lock().await.pull().await
    }

    pub async fn read_all(&mut self) -> Result<Bytes> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.next_chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer.freeze())
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        stream::try_unfold(self, |mut body| async move {
            let chunk = body.next_chunk().await?;
            Ok::<_, crate::Error>(chunk.map(|chunk| (chunk, body)))
        })
    }

    /// Reads and discards whatever the handler left unread.
    pub(crate) async fn flush(&self) -> Result<()> {
        let mut state = self.0.lock().await;
        state.pending = None;
        while state.pull().await?.is_some() {}
        Ok(())
    }

    pub(crate) async fn is_disconnected(&self) -> bool {
        self.0.lock().await.disconnected
    }

    /// Hands the event source back once the body has been flushed.
    pub(crate) async fn take_inbound(&self) -> Option<ReadHalf> {
        let mut state = self.0.lock().await;
        state.more_body = false;
        state.inbound.take()
    }
}

impl Debug for BodyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{io::channel, Error};

    #[tokio::test]
    async fn pulls_chunks_on_demand() {
        let (rx, _tx, peer) = channel(4);
        let mut body = BodyStream::new(rx, Bytes::from_static(b"a"), true);
        assert_eq!(body.next_chunk().await.unwrap(), Some(Bytes::from_static(b"a")));
        peer.push(InboundEvent::request("b", true)).await.unwrap();
        peer.push(InboundEvent::request("", true)).await.unwrap();
        peer.push(InboundEvent::request("c", false)).await.unwrap();
        assert_eq!(body.next_chunk().await.unwrap(), Some(Bytes::from_static(b"b")));
        assert_eq!(body.next_chunk().await.unwrap(), Some(Bytes::from_static(b"c")));
        assert_eq!(body.next_chunk().await.unwrap(), None);
        assert_eq!(body.next_chunk().await.unwrap(), None);
    }

    #[tokio::test]
    async fn disconnect_aborts_the_body() {
        let (rx, _tx, peer) = channel(4);
        let mut body = BodyStream::new(rx, Bytes::from_static(b"a"), true);
        peer.push(InboundEvent::HttpDisconnect).await.unwrap();
        assert_eq!(body.next_chunk().await.unwrap(), Some(Bytes::from_static(b"a")));
        assert!(body.next_chunk().await.unwrap_err().is_disconnect());
        assert!(body.next_chunk().await.unwrap_err().is_disconnect());
        assert!(body.is_disconnected().await);
        let collected: Result<Vec<Bytes>> = body.clone().into_stream().try_collect().await;
        assert!(collected.unwrap_err().is_disconnect());
    }

    #[tokio::test]
    async fn flush_discards_the_rest() {
        let (rx, _tx, peer) = channel(4);
        let body = BodyStream::new(rx, Bytes::from_static(b"a"), true);
        peer.push(InboundEvent::request("b", false)).await.unwrap();
        body.flush().await.unwrap();
        assert!(!body.is_disconnected().await);
        assert!(body.take_inbound().await.is_some());
        assert_eq!(body.clone().read_all().await.unwrap(), Bytes::new());
    }

    #[tokio::test]
    async fn foreign_event_is_protocol_error() {
        let (rx, _tx, peer) = channel(4);
        let mut body = BodyStream::new(rx, Bytes::new(), true);
        peer.push(InboundEvent::WebSocketConnect).await.unwrap();
        assert!(matches!(body.next_chunk().await, Err(Error::Protocol(_))));
    }
}
