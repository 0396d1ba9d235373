use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};

use crate::cli::{Cmd, PingOpts};
use crate::engine::ProtocolEngine;
use crate::stats::Stats;
use crate::transport::Transport;

/// Run one CLI command; read values go to `out`, one per line.
pub fn run<T: Transport>(
    engine: &ProtocolEngine<T>,
    cmd: Cmd,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        Cmd::Ping(opts) if opts.count > 1 => ping_loop(engine, &opts)?,
        Cmd::Ping(_) => engine.ping().context("ping")?,
        Cmd::Fire => engine.fire().context("fire")?,
        Cmd::TriggerFire => engine.trigger_fire().context("trigger fire")?,
        Cmd::TriggerTest => engine.trigger_test().context("trigger test")?,
        Cmd::TriggerCharge => engine.trigger_charge().context("trigger charge")?,
        Cmd::MainCapCharge => engine.main_cap_charge().context("main cap charge")?,
        Cmd::ChargeReset => engine.charge_reset().context("charge reset")?,
        Cmd::ReadTriggerDuration => {
            let v = engine.read_trigger_duration().context("read trigger duration")?;
            print_value(out, v)?
        }
        Cmd::ReadTriggerResistance => {
            let v = engine.read_trigger_resistance().context("read trigger resistance")?;
            print_value(out, v)?
        }
        Cmd::ReadMainCapResistance => {
            let v = engine.read_main_cap_resistance().context("read main cap resistance")?;
            print_value(out, v)?
        }
        Cmd::SetTriggerDuration { duration } => engine
            .set_trigger_duration(duration)
            .with_context(|| format!("set trigger duration {duration}"))?,
        Cmd::SetTriggerVoltage { voltage } => engine
            .set_trigger_voltage(voltage)
            .with_context(|| format!("set trigger voltage {voltage}"))?,
        Cmd::SetMainCapVoltage { voltage } => engine
            .set_main_cap_voltage(voltage)
            .with_context(|| format!("set main cap voltage {voltage}"))?,
    }
    Ok(())
}

fn print_value(out: &mut impl Write, value: u8) -> Result<()> {
    writeln!(out, "{value}").context("stdout")?;
    Ok(())
}

fn ping_loop<T: Transport>(engine: &ProtocolEngine<T>, opts: &PingOpts) -> Result<()> {
    let mut stats = Stats::new();
    let gap = Duration::from_millis(opts.interval_ms);

    for i in 0..opts.count {
        if i > 0 && !gap.is_zero() {
            std::thread::sleep(gap);
        }
        let t0 = Instant::now();
        let result = engine.ping();
        stats.record(&result, t0.elapsed());
    }

    stats.log_summary();
    if stats.ok == 0 {
        bail!("no ping of {} was acknowledged", stats.total());
    }
    Ok(())
}
