// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod codec;
pub mod command;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod record;
pub mod sample;
pub mod timestamp;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

pub use codec::{decode_float, encode_float};
pub use command::{Command, CommandFrame};
pub use crc::{crc8, verify_word};
pub use error::Scd30Error;
pub use hal_traits::{Transport, WallClock};
pub use record::LogRecord;
pub use sample::Sample;
pub use timestamp::Timestamp;

#[cfg(feature = "std")]
pub use timestamp::SystemClock;
