//! Transport trait shared by the I2C and UART bindings.

use sfa30_proto::{Command, Interface};

use crate::error::Error;

/// A command channel to the sensor.
///
/// This trait abstracts the physical interface, so the [`Sfa30`] state
/// machine runs unchanged over I2C or SHDLC. The interface is fixed by the
/// implementing type.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
///
/// [`Sfa30`]: crate::Sfa30
pub trait Transport {
    /// Interface this transport talks over.
    fn interface(&self) -> Interface;

    /// Bring the channel up. Called by `init`.
    fn open(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Shut the channel down. Called by `deinit` and on a failed `init`.
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Default settle time for `command` on this interface.
    fn settle_ms(&self, command: Command) -> u32;

    /// Send `command`, wait `settle_ms`, and copy the response data into
    /// `response`.
    ///
    /// Returns the number of data bytes written to `response`. Commands
    /// without response data return 0.
    fn execute(
        &mut self,
        command: Command,
        settle_ms: u32,
        response: &mut [u8],
    ) -> Result<usize, Error>;
}

/// Copy response data into the caller's buffer.
pub(crate) fn copy_response(data: &[u8], response: &mut [u8]) -> Result<usize, Error> {
    let dst = response
        .get_mut(..data.len())
        .ok_or(Error::Frame(sfa30_proto::FrameError::Overflow))?;
    dst.copy_from_slice(data);
    Ok(data.len())
}
