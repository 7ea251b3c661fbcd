// src/common/sample.rs

use super::error::Scd30Error;
use super::timestamp::Timestamp;

/// One timestamped reading from the sensor.
///
/// Samples are plain values: a newer reading replaces the previous one,
/// nothing ever edits a sample in place. `Sample::default()` is the invalid
/// placeholder held before the first successful read.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Sample {
    /// CO2 concentration in ppm.
    pub co2_ppm: f32,
    /// Temperature in °C.
    pub temperature: f32,
    /// Relative humidity in %.
    pub humidity: f32,
    /// Host wall-clock time at which the reading was taken.
    pub timestamp: Timestamp,
    /// False only for the placeholder.
    pub valid: bool,
}

impl Sample {
    pub fn new(co2_ppm: f32, temperature: f32, humidity: f32, timestamp: Timestamp) -> Self {
        Sample {
            co2_ppm,
            temperature,
            humidity,
            timestamp,
            valid: true,
        }
    }

    /// Passes the sample through if it is worth publishing.
    ///
    /// A CO2 value of zero or below (or NaN) is what the sensor reports
    /// between measurements and is rejected as noise.
    pub fn into_plausible<E: core::fmt::Debug>(self) -> Result<Self, Scd30Error<E>> {
        if self.valid && self.co2_ppm > 0.0 {
            Ok(self)
        } else {
            Err(Scd30Error::InvalidReading {
                co2_ppm: self.co2_ppm,
            })
        }
    }
}
