use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::DriverError;
use crate::frame::{Hex, HexBytes, READ_WINDOW, Response};
use crate::port::DEFAULT_TIMEOUT;
use crate::proto::calibration;
use crate::proto::command::{Command, Register};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// How long to wait for the reply to each opcode.
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Successful result of a single exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The device answered with the expected ack.
    Ack,
    /// Raw reply byte, returned when no ack was expected.
    Value(u8),
}

/// Request/response driver for the firing module.
///
/// The transport sits behind a mutex; multi-step operations (charge reset
/// plus command, register select plus value) hold it for the whole sequence
/// so concurrent callers block instead of interleaving.
pub struct ProtocolEngine<T> {
    transport: Mutex<T>,
    config: EngineConfig,
}

impl<T: Transport> ProtocolEngine<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, EngineConfig::default())
    }

    pub fn with_config(transport: T, config: EngineConfig) -> Self {
        Self {
            transport: Mutex::new(transport),
            config,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn into_transport(self) -> T {
        self.transport.into_inner()
    }

    /// Send one opcode and check the single-byte reply.
    pub fn execute(&self, opcode: u8, expected: Option<u8>) -> Result<Outcome, DriverError> {
        let mut port = self.transport.lock();
        self.exchange(&mut *port, opcode, expected)
    }

    /// Run a table command, with its charge reset first where it has one.
    pub fn run(&self, cmd: Command) -> Result<Outcome, DriverError> {
        let mut port = self.transport.lock();
        if cmd.resets_charge_first() {
            self.reset_before(&mut *port, cmd)?;
        }
        let outcome = self.exchange(&mut *port, cmd.opcode(), cmd.expected_ack())?;
        info!(command = %cmd, outcome = ?outcome, "command complete");
        Ok(outcome)
    }

    pub fn ping(&self) -> Result<(), DriverError> {
        self.run(Command::Ping).map(drop)
    }

    pub fn fire(&self) -> Result<(), DriverError> {
        self.run(Command::Fire).map(drop)
    }

    pub fn trigger_fire(&self) -> Result<(), DriverError> {
        self.run(Command::TriggerFire).map(drop)
    }

    pub fn trigger_test(&self) -> Result<(), DriverError> {
        self.run(Command::TriggerTest).map(drop)
    }

    pub fn trigger_charge(&self) -> Result<(), DriverError> {
        self.run(Command::TriggerCharge).map(drop)
    }

    pub fn main_cap_charge(&self) -> Result<(), DriverError> {
        self.run(Command::MainCapCharge).map(drop)
    }

    pub fn charge_reset(&self) -> Result<(), DriverError> {
        self.run(Command::ChargeReset).map(drop)
    }

    pub fn read_register(&self, reg: Register) -> Result<u8, DriverError> {
        let mut port = self.transport.lock();
        let opcode = reg.read().opcode();
        let value = self.transact(&mut *port, opcode)?;
        info!(register = ?reg, opcode = %Hex(opcode), value, "register read");
        Ok(value)
    }

    pub fn read_trigger_duration(&self) -> Result<u8, DriverError> {
        self.read_register(Register::TriggerDuration)
    }

    pub fn read_trigger_resistance(&self) -> Result<u8, DriverError> {
        self.read_register(Register::TriggerResistance)
    }

    pub fn read_main_cap_resistance(&self) -> Result<u8, DriverError> {
        self.read_register(Register::MainCapResistance)
    }

    /// Select `reg`, then write `value` to it. The value byte is only sent
    /// once the select has been acked.
    pub fn write_register(&self, reg: Register, value: u8) -> Result<(), DriverError> {
        let mut port = self.transport.lock();
        let select = reg.select();
        self.exchange(&mut *port, select.opcode(), select.expected_ack())?;
        self.exchange(&mut *port, value, Some(reg.confirm_ack()))?;
        info!(register = ?reg, value, "register written");
        Ok(())
    }

    /// Values above 255 are clamped to 255, negatives to 0.
    pub fn set_trigger_duration(&self, duration: i64) -> Result<(), DriverError> {
        let value = calibration::duration_byte(duration);
        if i64::from(value) != duration {
            warn!(requested = duration, value, "trigger duration out of range, clamped");
        }
        self.write_register(Register::TriggerDuration, value)
    }

    pub fn set_trigger_voltage(&self, voltage: f64) -> Result<(), DriverError> {
        self.set_voltage(Register::TriggerResistance, voltage)
    }

    pub fn set_main_cap_voltage(&self, voltage: f64) -> Result<(), DriverError> {
        self.set_voltage(Register::MainCapResistance, voltage)
    }

    fn set_voltage(&self, reg: Register, voltage: f64) -> Result<(), DriverError> {
        if !voltage.is_finite() || voltage < 0.0 {
            return Err(DriverError::InvalidVoltage(voltage));
        }
        let resistance = calibration::voltage_to_resistance(voltage);
        let code = calibration::resistance_to_code(resistance);
        let value = calibration::voltage_byte(voltage);
        debug!(register = ?reg, voltage, resistance, code, value, "voltage calibrated");
        if !(0.0..256.0).contains(&code) {
            warn!(register = ?reg, voltage, code, value, "potentiometer code saturated");
        }
        self.write_register(reg, value)
    }

    /// Best-effort charge reset ahead of `cmd`. A device-level failure is
    /// logged and `cmd` still goes out; a broken transport aborts.
    fn reset_before(&self, port: &mut T, cmd: Command) -> Result<(), DriverError> {
        let reset = Command::ChargeReset;
        match self.exchange(port, reset.opcode(), reset.expected_ack()) {
            Ok(_) => Ok(()),
            Err(e @ DriverError::Transport(_)) => Err(e),
            Err(e) => {
                warn!(command = %cmd, error = %e, "charge reset failed, continuing");
                Ok(())
            }
        }
    }

    fn exchange(
        &self,
        port: &mut T,
        opcode: u8,
        expected: Option<u8>,
    ) -> Result<Outcome, DriverError> {
        let got = self.transact(port, opcode)?;
        match expected {
            None => {
                debug!(opcode = %Hex(opcode), value = %Hex(got), "value received");
                Ok(Outcome::Value(got))
            }
            Some(e) if e == got => {
                debug!(opcode = %Hex(opcode), ack = %Hex(got), "ack received");
                Ok(Outcome::Ack)
            }
            Some(e) => {
                warn!(opcode = %Hex(opcode), expected = %Hex(e), got = %Hex(got), "unexpected ack");
                Err(DriverError::UnexpectedAck {
                    opcode,
                    expected: e,
                    got,
                })
            }
        }
    }

    /// Write `opcode`, read one response window, and return the single
    /// reply byte.
    fn transact(&self, port: &mut T, opcode: u8) -> Result<u8, DriverError> {
        if let Err(e) = port.write(&[opcode]) {
            warn!(opcode = %Hex(opcode), error = %e, "write failed");
            return Err(e.into());
        }
        let received = match port.read(READ_WINDOW, self.config.timeout) {
            Ok(r) => r,
            Err(e) => {
                warn!(opcode = %Hex(opcode), error = %e, "read failed");
                return Err(e.into());
            }
        };
        match Response::classify(&received) {
            Response::Ack(b) => Ok(b),
            Response::Timeout => {
                warn!(
                    opcode = %Hex(opcode),
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "no reply within timeout"
                );
                Err(DriverError::Timeout { opcode })
            }
            Response::Overrun(bytes) => {
                warn!(opcode = %Hex(opcode), received = %HexBytes(&bytes), "overrun: more than one reply byte");
                Err(DriverError::Overrun {
                    opcode,
                    received: bytes,
                })
            }
        }
    }
}
