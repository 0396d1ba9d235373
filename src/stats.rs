use std::time::Duration;

use tracing::info;

use crate::error::{DriverError, ErrorKind};

/// Link-check tally over repeated exchanges.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub ok: u64,
    pub timeout: u64,
    pub overrun: u64,
    pub unexpected: u64,
    pub transport: u64,
    rtt_total: Duration,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &Result<(), DriverError>, rtt: Duration) {
        match result {
            Ok(()) => {
                self.ok += 1;
                self.rtt_total += rtt;
            }
            Err(e) => match e.kind() {
                ErrorKind::Timeout => self.timeout += 1,
                ErrorKind::Overrun => self.overrun += 1,
                ErrorKind::UnexpectedAck => self.unexpected += 1,
                ErrorKind::Transport | ErrorKind::InvalidVoltage => self.transport += 1,
            },
        }
    }

    pub fn total(&self) -> u64 {
        self.ok + self.failed()
    }

    pub fn failed(&self) -> u64 {
        self.timeout + self.overrun + self.unexpected + self.transport
    }

    pub fn success_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.ok as f64 / n as f64,
        }
    }

    /// Mean round trip of the successful exchanges.
    pub fn mean_rtt(&self) -> Option<Duration> {
        (self.ok > 0).then(|| self.rtt_total / self.ok as u32)
    }

    pub fn log_summary(&self) {
        info!(
            total = self.total(),
            ok = self.ok,
            timeout = self.timeout,
            overrun = self.overrun,
            unexpected = self.unexpected,
            transport = self.transport,
            success_ratio = self.success_ratio(),
            mean_rtt_us = self.mean_rtt().map(|d| d.as_micros() as u64),
            "link check done"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind() {
        let mut s = Stats::new();
        s.record(&Ok(()), Duration::from_millis(2));
        s.record(&Ok(()), Duration::from_millis(4));
        s.record(&Err(DriverError::Timeout { opcode: 0x80 }), Duration::from_millis(50));
        s.record(
            &Err(DriverError::UnexpectedAck {
                opcode: 0x80,
                expected: 0xA0,
                got: 0x00,
            }),
            Duration::from_millis(1),
        );

        assert_eq!(s.ok, 2);
        assert_eq!(s.timeout, 1);
        assert_eq!(s.unexpected, 1);
        assert_eq!(s.failed(), 2);
        assert_eq!(s.total(), 4);
        assert_eq!(s.success_ratio(), 0.5);
        assert_eq!(s.mean_rtt(), Some(Duration::from_millis(3)));
    }

    #[test]
    fn empty() {
        let s = Stats::new();
        assert_eq!(s.success_ratio(), 0.0);
        assert_eq!(s.mean_rtt(), None);
    }
}
