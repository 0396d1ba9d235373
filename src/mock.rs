//! In-memory transports for tests.

use std::collections::VecDeque;
use std::time::Duration;

use crate::proto::command::{Command, Register, SELECT_ACK};
use crate::transport::{Transport, TransportError};

enum Replies {
    /// One entry consumed per read; an empty queue reads as a timeout.
    Scripted(VecDeque<Result<Vec<u8>, TransportError>>),
    /// Answers like the firing module would.
    Device(DeviceModel),
}

/// Records every write and replies from a script or a device model.
pub struct MockTransport {
    writes: Vec<Vec<u8>>,
    reads: Vec<usize>,
    replies: Replies,
    fail_writes_after: Option<usize>,
}

impl MockTransport {
    pub fn scripted<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self::with_results(replies.into_iter().map(Ok))
    }

    pub fn with_results<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<Vec<u8>, TransportError>>,
    {
        Self {
            writes: Vec::new(),
            reads: Vec::new(),
            replies: Replies::Scripted(replies.into_iter().collect()),
            fail_writes_after: None,
        }
    }

    pub fn device() -> Self {
        Self {
            writes: Vec::new(),
            reads: Vec::new(),
            replies: Replies::Device(DeviceModel::default()),
            fail_writes_after: None,
        }
    }

    /// Writes after the first `n` fail with [`TransportError::Closed`].
    pub fn fail_writes_after(mut self, n: usize) -> Self {
        self.fail_writes_after = Some(n);
        self
    }

    /// Every write call, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// All written bytes, flattened.
    pub fn sent(&self) -> Vec<u8> {
        self.writes.concat()
    }

    /// `max_bytes` of every read call, in order.
    pub fn reads(&self) -> &[usize] {
        &self.reads
    }

    pub fn register(&self, reg: Register) -> Option<u8> {
        match &self.replies {
            Replies::Device(dev) => Some(dev.registers[reg as usize]),
            Replies::Scripted(_) => None,
        }
    }
}

impl Transport for MockTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self
            .fail_writes_after
            .is_some_and(|n| self.writes.len() >= n)
        {
            return Err(TransportError::Closed);
        }
        self.writes.push(bytes.to_vec());
        if let Replies::Device(dev) = &mut self.replies {
            for b in bytes {
                dev.receive(*b);
            }
        }
        Ok(())
    }

    fn read(&mut self, max_bytes: usize, _timeout: Duration) -> Result<Vec<u8>, TransportError> {
        self.reads.push(max_bytes);
        let mut reply = match &mut self.replies {
            Replies::Scripted(queue) => queue.pop_front().unwrap_or_else(|| Ok(Vec::new()))?,
            Replies::Device(dev) => std::mem::take(&mut dev.pending),
        };
        reply.truncate(max_bytes);
        Ok(reply)
    }
}

#[derive(Default)]
struct DeviceModel {
    selected: Option<Register>,
    registers: [u8; 3],
    pending: Vec<u8>,
}

impl DeviceModel {
    fn receive(&mut self, byte: u8) {
        if let Some(reg) = self.selected.take() {
            self.registers[reg as usize] = byte;
            self.pending.push(reg.confirm_ack());
            return;
        }
        if let Some(reg) = Register::from_select_opcode(byte) {
            self.selected = Some(reg);
            self.pending.push(SELECT_ACK);
            return;
        }
        let reply = match Command::from_opcode(byte) {
            Some(Command::ReadTriggerDuration) => Some(self.registers[0]),
            Some(Command::ReadTriggerResistance) => Some(self.registers[1]),
            Some(Command::ReadMainCapResistance) => Some(self.registers[2]),
            Some(cmd) => cmd.expected_ack(),
            None => None,
        };
        self.pending.extend(reply);
    }
}
