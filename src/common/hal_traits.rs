// src/common/hal_traits.rs

use super::error::Scd30Error;
use super::timestamp::Timestamp;
use core::fmt::Debug;

/// Exclusive, bounded transactions with one device on a two-wire bus.
///
/// An implementation owns (or locks) the bus for the duration of each call
/// and releases it before returning. Nothing is held between calls, so other
/// bus users may run between two transactions of the driver.
pub trait Transport {
    /// Associated error type for bus errors.
    type Error: Debug;

    /// Transmits `bytes` to the device.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Scd30Error<Self::Error>>;

    /// Transmits `bytes`, then fills `buffer` from the device in one combined
    /// transaction.
    fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Scd30Error<Self::Error>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Scd30Error<Self::Error>> {
        (**self).write(bytes)
    }

    fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Scd30Error<Self::Error>> {
        (**self).write_read(bytes, buffer)
    }
}

/// Source of calendar time for stamping samples.
///
/// The sensor has no clock of its own; timestamps always come from the host.
pub trait WallClock {
    fn now(&mut self) -> Timestamp;
}
