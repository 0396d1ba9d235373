use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::debug;

use crate::transport::{Transport, TransportError};

pub const DEFAULT_BAUD: u32 = 115_200;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(50);

/// Where and how to open the firing module's serial line. Always 8N1.
#[derive(Debug, Clone)]
pub struct PortConfig {
    pub dev: String,
    pub baud: u32,
    pub timeout: Duration,
}

impl PortConfig {
    pub fn new(dev: impl Into<String>) -> Self {
        Self {
            dev: dev.into(),
            baud: DEFAULT_BAUD,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub fn open_port(conf: &PortConfig) -> Result<Box<dyn SerialPort>, TransportError> {
    let port = serialport::new(&conf.dev, conf.baud)
        .timeout(conf.timeout)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open()?;
    Ok(port)
}

/// [`Transport`] over a real serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Opens the port and drops anything left in its buffers.
    pub fn open(conf: &PortConfig) -> Result<Self, TransportError> {
        let port = open_port(conf)?;
        port.clear(ClearBuffer::All)?;
        debug!(dev = %conf.dev, baud = conf.baud, "serial port open");
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; max_bytes];
        let mut got = 0;
        let deadline = Instant::now() + timeout;

        while got < max_bytes {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.port.set_timeout(remaining)?;
            match self.port.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        buf.truncate(got);
        Ok(buf)
    }
}
