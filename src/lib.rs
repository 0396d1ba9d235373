//! Host-side driver for the thruster firing module's single-byte serial
//! protocol: one opcode out, one ack or value byte back.

pub mod app;
pub mod cli;
pub mod engine;
pub mod error;
pub mod frame;
pub mod logging;
pub mod port;
pub mod proto;
pub mod stats;
pub mod transport;

#[cfg(test)]
mod mock;

pub use engine::{EngineConfig, Outcome, ProtocolEngine};
pub use error::{DriverError, ErrorKind};
pub use port::{PortConfig, SerialTransport};
pub use proto::command::{Command, Register};
pub use transport::{Transport, TransportError};
