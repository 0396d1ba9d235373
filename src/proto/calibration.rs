// Fixed device calibration for the charge potentiometers.
const VREF_GAIN: f64 = 9.8;
const DIVIDER_OHMS: f64 = 40200.0;
const DIODE_DROP_V: f64 = 0.7;
const WIPER_OHMS: f64 = 60.0;
const POT_FULL_SCALE_OHMS: f64 = 10000.0;
const POT_STEPS: f64 = 256.0;

/// Trigger pulse duration as it goes on the wire.
pub fn duration_byte(duration: i64) -> u8 {
    duration.clamp(0, u8::MAX as i64) as u8
}

/// Potentiometer resistance (ohms) that charges to `voltage`.
pub fn voltage_to_resistance(voltage: f64) -> f64 {
    VREF_GAIN * DIVIDER_OHMS / (voltage + DIODE_DROP_V)
}

/// Raw potentiometer step count for `resistance`, before byte truncation.
pub fn resistance_to_code(resistance: f64) -> f64 {
    (resistance - WIPER_OHMS) / POT_FULL_SCALE_OHMS * POT_STEPS
}

/// Wire byte for a target charge voltage.
///
/// The code is truncated toward zero, then saturated into `0..=255`
/// (a float-to-int `as` cast does both).
pub fn voltage_byte(voltage: f64) -> u8 {
    resistance_to_code(voltage_to_resistance(voltage)) as u8
}
