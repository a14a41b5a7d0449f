//! I2C command and word codec.
//!
//! Every transfer starts with a 16-bit big-endian command code. Data on the
//! bus travels in 3-byte words: two data bytes followed by their [`crc8`].
//!
//! ```text
//! write:  CMD_HI | CMD_LO | payload...
//! read:   D0_HI | D0_LO | CRC0 | D1_HI | D1_LO | CRC1 | ...
//! ```

use heapless::Vec;

use crate::checksum::{crc8, Crc8Digest};

/// Default 7-bit I2C address of the SFA30.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x5D;

/// Bytes per word on the bus (two data bytes plus CRC).
pub const WORD_LEN: usize = 3;

/// Largest payload that may follow a command code in one write.
pub const MAX_WRITE_PAYLOAD: usize = 14;

/// Command code plus payload.
pub type CommandFrame = Vec<u8, { MAX_WRITE_PAYLOAD + 2 }>;

/// Errors while encoding or decoding bus words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordError {
    /// Input is not a whole number of words or the output is too small.
    Length,
    /// CRC of word `index` does not match.
    Checksum { index: usize, expected: u8, actual: u8 },
}

impl core::fmt::Display for WordError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Length => write!(f, "word buffer length mismatch"),
            Self::Checksum {
                index,
                expected,
                actual,
            } => write!(
                f,
                "crc error in word {}: 0x{:02X} (expected 0x{:02X})",
                index, actual, expected
            ),
        }
    }
}

/// Build the bytes of a command write.
///
/// # Errors
///
/// [`WordError::Length`] if `payload` is longer than [`MAX_WRITE_PAYLOAD`].
pub fn command_frame(code: u16, payload: &[u8]) -> Result<CommandFrame, WordError> {
    if payload.len() > MAX_WRITE_PAYLOAD {
        return Err(WordError::Length);
    }
    let mut frame = CommandFrame::new();
    frame
        .extend_from_slice(&code.to_be_bytes())
        .map_err(|_| WordError::Length)?;
    frame
        .extend_from_slice(payload)
        .map_err(|_| WordError::Length)?;
    Ok(frame)
}

/// Append a CRC after every 2 bytes of `data`.
///
/// Returns the number of bytes written to `out`.
///
/// # Errors
///
/// [`WordError::Length`] if `data` has an odd length or `out` is too small.
pub fn encode_words(data: &[u8], out: &mut [u8]) -> Result<usize, WordError> {
    if data.len() % 2 != 0 {
        return Err(WordError::Length);
    }
    let len = data.len() / 2 * WORD_LEN;
    if out.len() < len {
        return Err(WordError::Length);
    }
    for (word, slot) in data.chunks_exact(2).zip(out.chunks_exact_mut(WORD_LEN)) {
        let mut digest = Crc8Digest::new();
        digest.update(word);
        slot[..2].copy_from_slice(word);
        slot[2] = digest.finalize();
    }
    Ok(len)
}

/// Verify and strip the CRC of every word in `raw`.
///
/// Returns the number of data bytes written to `out`.
///
/// # Errors
///
/// [`WordError::Length`] if `raw` is not a whole number of words or `out` is
/// too small, [`WordError::Checksum`] on the first corrupt word.
pub fn decode_words(raw: &[u8], out: &mut [u8]) -> Result<usize, WordError> {
    if raw.len() % WORD_LEN != 0 {
        return Err(WordError::Length);
    }
    let len = raw.len() / WORD_LEN * 2;
    if out.len() < len {
        return Err(WordError::Length);
    }
    for (index, (word, slot)) in raw
        .chunks_exact(WORD_LEN)
        .zip(out.chunks_exact_mut(2))
        .enumerate()
    {
        let expected = crc8(&word[..2]);
        if word[2] != expected {
            return Err(WordError::Checksum {
                index,
                expected,
                actual: word[2],
            });
        }
        slot.copy_from_slice(&word[..2]);
    }
    Ok(len)
}
