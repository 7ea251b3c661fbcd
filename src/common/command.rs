// src/common/command.rs

//! SCD30 command set and wire framing.
//!
//! Every command starts with a big-endian 16-bit code. Commands that carry
//! an argument follow it with the big-endian argument and a CRC-8 computed
//! over the two argument bytes only.

use arrayvec::ArrayVec;
use core::fmt;

use super::crc::crc8;

/// Longest frame on the wire: code (2) + argument (2) + CRC (1).
pub const MAX_FRAME_LEN: usize = 5;

/// Bytes sent for one command. Lives for a single transaction.
pub type CommandFrame = ArrayVec<u8, MAX_FRAME_LEN>;

/// Commands understood by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start continuous measurement (`0x0010`). The sensor free-runs afterwards.
    StartMeasurement,
    /// Set the measurement interval in seconds (`0x4600`).
    SetInterval(u16),
    /// Forced recalibration against a reference CO2 concentration in ppm (`0x5204`).
    Calibrate(u16),
    /// Read the latest measurement (`0x0300`), 18 response bytes.
    ReadMeasurement,
}

impl Command {
    pub const fn code(&self) -> u16 {
        match self {
            Command::StartMeasurement => 0x0010,
            Command::SetInterval(_) => 0x4600,
            Command::Calibrate(_) => 0x5204,
            Command::ReadMeasurement => 0x0300,
        }
    }

    pub const fn argument(&self) -> Option<u16> {
        match self {
            Command::SetInterval(seconds) => Some(*seconds),
            Command::Calibrate(ppm) => Some(*ppm),
            Command::StartMeasurement | Command::ReadMeasurement => None,
        }
    }

    /// Builds the bytes to put on the bus for this command.
    pub fn frame(&self) -> CommandFrame {
        let mut frame = CommandFrame::new();
        frame.extend(self.code().to_be_bytes());
        if let Some(argument) = self.argument() {
            let argument = argument.to_be_bytes();
            frame.extend(argument);
            frame.push(crc8(&argument));
        }
        frame
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::StartMeasurement => write!(f, "start measurement"),
            Command::SetInterval(seconds) => write!(f, "set interval {}s", seconds),
            Command::Calibrate(ppm) => write!(f, "calibrate to {} ppm", ppm),
            Command::ReadMeasurement => write!(f, "read measurement"),
        }
    }
}
