use thiserror::Error;

use crate::frame::{Hex, HexBytes};
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("no reply to {} within timeout", hex(.opcode))]
    Timeout { opcode: u8 },
    #[error("overrun after {}: received {}", hex(.opcode), HexBytes(.received))]
    Overrun { opcode: u8, received: Vec<u8> },
    #[error("{} rejected: expected ack {} got {}", hex(.opcode), hex(.expected), hex(.got))]
    UnexpectedAck { opcode: u8, expected: u8, got: u8 },
    #[error("voltage must be finite and non-negative, got {0}")]
    InvalidVoltage(f64),
}

fn hex(b: &u8) -> Hex {
    Hex(*b)
}

/// Fieldless discriminant of [`DriverError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Timeout,
    Overrun,
    UnexpectedAck,
    InvalidVoltage,
}

impl DriverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DriverError::Transport(_) => ErrorKind::Transport,
            DriverError::Timeout { .. } => ErrorKind::Timeout,
            DriverError::Overrun { .. } => ErrorKind::Overrun,
            DriverError::UnexpectedAck { .. } => ErrorKind::UnexpectedAck,
            DriverError::InvalidVoltage(_) => ErrorKind::InvalidVoltage,
        }
    }
}
