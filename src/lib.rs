// src/lib.rs

//! Driver for the Sensirion SCD30 CO2, temperature and humidity sensor.
//!
//! The core ([`common`], [`driver`], [`transport`]) is `no_std` and talks to
//! the sensor through any `embedded-hal` 1.0 I2C bus. The `std` feature adds
//! a background [`worker`] that polls the sensor on its own thread, the
//! [`consumer`] helpers, a bus shared between threads and a chrono-backed
//! wall clock.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod common;
pub mod driver;
pub mod transport;

#[cfg(any(test, feature = "std"))]
pub mod consumer;
#[cfg(any(test, feature = "std"))]
pub mod worker;

// Re-export key types for convenience
pub use common::{Command, LogRecord, Sample, Scd30Error, Timestamp, Transport, WallClock};
pub use driver::Scd30;
pub use transport::{I2cTransport, SCD30_ADDRESS};

#[cfg(feature = "std")]
pub use common::SystemClock;
#[cfg(any(test, feature = "std"))]
pub use consumer::{CsvLog, FreshSamples};
#[cfg(any(test, feature = "std"))]
pub use transport::SharedI2cTransport;
#[cfg(any(test, feature = "std"))]
pub use worker::{PollingWorker, WorkerConfig, WorkerError, WorkerHandle};
