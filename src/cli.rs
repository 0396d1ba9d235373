use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use crate::engine::EngineConfig;
use crate::port::PortConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "thruster", about = "Command the thruster firing module over serial")]
pub struct Cli {
    #[command(flatten)]
    pub ser: SerialOpts,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// Check the module answers (repeat with --count for link stats)
    Ping(PingOpts),
    /// Charge reset, then fire
    Fire,
    /// Charge reset, then fire the trigger
    TriggerFire,
    /// Test the trigger circuit
    TriggerTest,
    /// Charge reset, then charge the trigger capacitor
    TriggerCharge,
    /// Charge reset, then charge the main capacitor
    MainCapCharge,
    /// Reset the charge circuit
    ChargeReset,
    /// Print the trigger duration register
    ReadTriggerDuration,
    /// Print the trigger resistance register
    ReadTriggerResistance,
    /// Print the main capacitor resistance register
    ReadMainCapResistance,
    /// Set the trigger duration (clamped to 0..=255)
    SetTriggerDuration {
        #[arg(allow_negative_numbers = true)]
        duration: i64,
    },
    /// Set the trigger charge voltage
    SetTriggerVoltage { voltage: f64 },
    /// Set the main capacitor charge voltage
    SetMainCapVoltage { voltage: f64 },
}

#[derive(Args, Debug, Clone)]
pub struct SerialOpts {
    /// Serial device path
    #[arg(long, global = true, default_value = "/dev/ttyUSB0")]
    pub dev: String,
    /// Baud rate
    #[arg(long, global = true, default_value_t = 115_200)]
    pub baud: u32,
    /// Reply timeout per command in milliseconds
    #[arg(long, global = true, default_value_t = 50)]
    pub timeout_ms: u64,
    /// Debug logging (every byte exchanged)
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,
}

impl SerialOpts {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn port_config(&self) -> PortConfig {
        PortConfig {
            dev: self.dev.clone(),
            baud: self.baud,
            timeout: self.timeout(),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            timeout: self.timeout(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PingOpts {
    /// Number of pings; failures are counted, never retried
    #[arg(long, default_value_t = 1)]
    pub count: u64,
    /// Gap between pings in milliseconds
    #[arg(long, default_value_t = 100)]
    pub interval_ms: u64,
}
