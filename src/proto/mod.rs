pub mod calibration;
pub mod command;
