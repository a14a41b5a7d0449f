//! Integrity bytes for both SFA30 interfaces.
//!
//! - I2C: Sensirion CRC-8 (polynomial 0x31, init 0xFF, no reflection, no final
//!   XOR), computed over every 2-byte word on the bus.
//! - UART: one's complement of the truncated byte sum, computed over the SHDLC
//!   frame content between the delimiters.

use crc::{Crc, CRC_8_NRSC_5};

use crate::types::Interface;

/// Sensirion CRC-8 calculator (CRC-8/NRSC-5 in the catalogue).
static CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

/// Calculate the Sensirion CRC-8 of a byte slice.
#[inline]
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// Calculate the SHDLC checksum: the inverted low byte of the sum of `data`.
#[inline]
#[must_use]
pub fn sum_checksum(data: &[u8]) -> u8 {
    !data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Calculate the checksum used by `interface`.
#[inline]
#[must_use]
pub fn checksum(interface: Interface, data: &[u8]) -> u8 {
    match interface {
        Interface::I2c => crc8(data),
        Interface::Uart => sum_checksum(data),
    }
}

/// CRC-8 digest for incremental calculation.
///
/// Used when appending a CRC after each word of an outgoing I2C payload.
pub struct Crc8Digest {
    digest: crc::Digest<'static, u8>,
}

impl Crc8Digest {
    /// Create a new CRC-8 digest.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            digest: CRC8.digest(),
        }
    }

    /// Update the digest with a byte slice.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    /// Finalize and return the checksum value.
    #[inline]
    #[must_use]
    pub fn finalize(self) -> u8 {
        self.digest.finalize()
    }
}

impl Default for Crc8Digest {
    fn default() -> Self {
        Self::new()
    }
}
