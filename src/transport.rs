// src/transport.rs

//! Bus backends for the driver.
//!
//! [`I2cTransport`] owns its `embedded-hal` bus outright, so exclusivity comes
//! from `&mut` and any deadline is whatever the HAL enforces. With the `std`
//! feature, [`SharedI2cTransport`] locks a bus shared with other devices for
//! each transaction and reports transactions that overran [`BUS_TIMEOUT`].
//!
//! Addresses are the 7-bit form; the HAL shifts in the R/W bit on the wire.
//!
//! [`BUS_TIMEOUT`]: crate::common::timing::BUS_TIMEOUT

use embedded_hal::i2c::I2c;

use crate::common::{error::Scd30Error, hal_traits::Transport};

#[cfg(any(test, feature = "std"))]
pub use shared::SharedI2cTransport;

/// Fixed 7-bit I2C address of the SCD30.
pub const SCD30_ADDRESS: u8 = 0x61;

/// Transport over an exclusively owned I2C bus.
#[derive(Debug)]
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cTransport<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SCD30_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        I2cTransport { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Transport for I2cTransport<I2C> {
    type Error = I2C::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Scd30Error<Self::Error>> {
        self.i2c.write(self.address, bytes).map_err(Scd30Error::Io)
    }

    fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Scd30Error<Self::Error>> {
        self.i2c
            .write_read(self.address, bytes, buffer)
            .map_err(Scd30Error::Io)
    }
}

#[cfg(any(test, feature = "std"))]
mod shared {
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::{Duration, Instant};

    use embedded_hal::i2c::I2c;
    use log::warn;

    use super::SCD30_ADDRESS;
    use crate::common::{error::Scd30Error, hal_traits::Transport, timing::BUS_TIMEOUT};

    /// Transport over an I2C bus shared with other devices.
    ///
    /// The bus mutex is held for exactly one transaction. The time budget
    /// starts once the bus is acquired, so waiting for another user does not
    /// count against it. A HAL without its own deadline can still block past
    /// the budget; such a transaction is reported as
    /// [`Scd30Error::Timeout`] after the fact and its data discarded.
    #[derive(Debug)]
    pub struct SharedI2cTransport<I2C> {
        bus: Arc<Mutex<I2C>>,
        address: u8,
        timeout: Duration,
    }

    impl<I2C> Clone for SharedI2cTransport<I2C> {
        fn clone(&self) -> Self {
            SharedI2cTransport {
                bus: Arc::clone(&self.bus),
                address: self.address,
                timeout: self.timeout,
            }
        }
    }

    impl<I2C: I2c> SharedI2cTransport<I2C> {
        pub fn new(bus: Arc<Mutex<I2C>>) -> Self {
            SharedI2cTransport {
                bus,
                address: SCD30_ADDRESS,
                timeout: BUS_TIMEOUT,
            }
        }

        pub fn with_address(mut self, address: u8) -> Self {
            self.address = address;
            self
        }

        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        fn transact<R>(
            &mut self,
            op: impl FnOnce(&mut I2C, u8) -> Result<R, I2C::Error>,
        ) -> Result<R, Scd30Error<I2C::Error>> {
            // Poisoning only means another user panicked mid-transaction.
            let mut bus = self.bus.lock().unwrap_or_else(PoisonError::into_inner);
            let started = Instant::now();
            let result = op(&mut bus, self.address);
            drop(bus);

            let elapsed = started.elapsed();
            let value = result.map_err(Scd30Error::Io)?;
            if elapsed > self.timeout {
                warn!(
                    "I2C transaction to {:#04x} took {} ms",
                    self.address,
                    elapsed.as_millis()
                );
                return Err(Scd30Error::Timeout {
                    limit_ms: u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX),
                });
            }
            Ok(value)
        }
    }

    impl<I2C: I2c> Transport for SharedI2cTransport<I2C> {
        type Error = I2C::Error;

        fn write(&mut self, bytes: &[u8]) -> Result<(), Scd30Error<Self::Error>> {
            self.transact(|bus, address| bus.write(address, bytes))
        }

        fn write_read(&mut self, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Scd30Error<Self::Error>> {
            self.transact(|bus, address| bus.write_read(address, bytes, buffer))
        }
    }
}
