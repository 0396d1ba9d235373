use std::time::Duration;

use thiserror::Error;

/// Channel-level failure. Always surfaced, never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("transport closed")]
    Closed,
}

/// Half-duplex byte channel to the device.
pub trait Transport {
    /// Send all of `bytes`.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Collect up to `max_bytes`, waiting at most `timeout` in total.
    /// An empty vec means nothing arrived in time, not an error.
    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}
