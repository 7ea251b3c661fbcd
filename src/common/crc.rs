// src/common/crc.rs

use crc::{Algorithm, Crc};

/// CRC-8 algorithm used by Sensirion sensors (CRC-8/NRSC-5).
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1)
/// Initial Value: 0xFF
/// Input Reflected: false
/// Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xF7 (for "123456789")
/// Residue: 0x00
pub const SCD30_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&SCD30_CRC);

/// Calculates the SCD30 CRC-8 over `data`.
///
/// The sensor protects every 16-bit word it exchanges with one of these.
/// On the command side only the 2-byte argument is covered, never the
/// command code in front of it. Empty input yields the initial value `0xFF`.
#[inline]
pub fn crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

/// Checks a `[msb, lsb, crc]` word as transmitted by the sensor.
///
/// Anything other than exactly three bytes fails.
pub fn verify_word(word: &[u8]) -> bool {
    word.len() == 3 && crc8(&word[..2]) == word[2]
}
