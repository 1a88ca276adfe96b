mod exchange;
mod lifespan;
mod service;
mod socket;

pub use service::EntryPoint;
pub use socket::{Socket, WebSocket};
