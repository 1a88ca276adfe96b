use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::ProtocolError,
    event::{InboundEvent, OutboundEvent},
};
use crate::Result;

/// Source of events coming from the hosting gateway.
#[async_trait]
pub trait Inbound {
    async fn receive(&mut self) -> Result<InboundEvent>;
}

/// Sink for events going back to the hosting gateway.
#[async_trait]
pub trait Outbound {
    async fn send(&mut self, event: OutboundEvent) -> Result<()>;
}

pub type ReadHalf = Box<dyn Inbound + Send + 'static>;
pub type WriteHalf = Box<dyn Outbound + Send + 'static>;

#[async_trait]
impl Inbound for mpsc::Receiver<InboundEvent> {
    async fn receive(&mut self) -> Result<InboundEvent> {
        self.recv()
            .await
            .ok_or_else(|| ProtocolError::ChannelClosed.into())
    }
}

#[async_trait]
impl Outbound for mpsc::Sender<OutboundEvent> {
    async fn send(&mut self, event: OutboundEvent) -> Result<()> {
        mpsc::Sender::send(self, event)
            .await
            .map_err(|_| ProtocolError::ChannelClosed.into())
    }
}

#[async_trait]
impl Outbound for mpsc::UnboundedSender<OutboundEvent> {
    async fn send(&mut self, event: OutboundEvent) -> Result<()> {
        mpsc::UnboundedSender::send(self, event).map_err(|_| ProtocolError::ChannelClosed.into())
    }
}

#[async_trait]
impl<T: Inbound + Send + ?Sized> Inbound for Box<T> {
    async fn receive(&mut self) -> Result<InboundEvent> {
        (**self).receive().await
    }
}

#[async_trait]
impl<T: Outbound + Send + ?Sized> Outbound for Box<T> {
    async fn send(&mut self, event: OutboundEvent) -> Result<()> {
        (**self).send(event).await
    }
}

/// The gateway's side of an in-memory connection.
pub struct Peer {
    pub tx: mpsc::Sender<InboundEvent>,
    pub rx: mpsc::UnboundedReceiver<OutboundEvent>,
}

impl Peer {
    pub async fn push(&self, event: InboundEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ProtocolError::ChannelClosed.into())
    }

    /// Collects every outbound event until the application side is dropped.
    pub async fn drain(&mut self) -> Vec<OutboundEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }
}

/// Builds a connected in-memory channel: the application halves plus the gateway's peer.
pub fn channel(capacity: usize) -> (ReadHalf, WriteHalf, Peer) {
    let (in_tx, in_rx) = mpsc::channel(capacity.max(1));
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    (
        Box::new(in_rx),
        Box::new(out_tx),
        Peer {
            tx: in_tx,
            rx: out_rx,
        },
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn channel_forwards_events_both_ways() {
        let (mut rx, mut tx, mut peer) = channel(4);
        peer.push(InboundEvent::HttpDisconnect).await.unwrap();
        assert_eq!(rx.receive().await.unwrap(), InboundEvent::HttpDisconnect);
        tx.send(OutboundEvent::LifespanStartupComplete).await.unwrap();
        drop(tx);
        assert_eq!(peer.drain().await, vec![OutboundEvent::LifespanStartupComplete]);
    }

    #[tokio::test]
    async fn closed_inbound_is_protocol_error() {
        let (mut rx, _tx, peer) = channel(1);
        drop(peer);
        assert!(matches!(
            rx.receive().await,
            Err(Error::Protocol(ProtocolError::ChannelClosed))
        ));
    }
}
