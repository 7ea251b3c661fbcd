// src/common/error.rs

#[derive(Debug, thiserror::Error)]
pub enum Scd30Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying bus error from the HAL implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The bus transaction did not complete within its time budget.
    #[error("bus transaction exceeded {limit_ms} ms")]
    Timeout { limit_ms: u32 },

    /// The transaction succeeded but the reading is not usable (CO2 at or below zero).
    #[error("implausible reading: {co2_ppm} ppm CO2")]
    InvalidReading { co2_ppm: f32 },
}

impl<E: core::fmt::Debug> Scd30Error<E> {
    /// True for failures of the bus itself, as opposed to a bad reading.
    pub fn is_transport(&self) -> bool {
        matches!(self, Scd30Error::Io(_) | Scd30Error::Timeout { .. })
    }
}
