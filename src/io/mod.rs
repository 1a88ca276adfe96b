pub mod error;
pub mod event;
pub mod streams;

pub use error::{ConfigError, ProtocolError, UnexpectedEvent};
pub use event::{InboundEvent, Message, OutboundEvent};
pub use streams::{channel, Inbound, Outbound, Peer, ReadHalf, WriteHalf};
