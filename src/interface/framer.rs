//! Command and data framing on top of a `Transport`.
//!
//! The SSD1327 modules this driver targets buffer only a small number of bytes per bus session,
//! far less than a frame of display RAM. Data frames are therefore split into as many sessions as
//! needed, each one opened with its own data marker, so that the controller sees one contiguous
//! stream of data bytes. Where the split happens carries no meaning for the pixels.

use embedded_hal::delay::DelayNs;
use log::{trace, warn};

use super::{DisplayInterface, Marker, Transport};
use crate::error::BusError;

/// Frames commands and data for the display controller over a `Transport`.
pub struct Framer<T> {
    transport: T,
}

impl<T> Framer<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Give back the wrapped transport.
    pub fn release(self) -> T {
        self.transport
    }

    /// Number of payload bytes that fit into one session after the header.
    fn payload_per_session(&self) -> usize {
        self.transport
            .max_chunk()
            .saturating_sub(self.transport.header_len())
            .max(1)
    }

    fn close(&mut self) -> Result<(), BusError> {
        self.transport.close().map_err(|err| {
            warn!("bus session failed: {}", err);
            err
        })
    }
}

impl<T> DisplayInterface for Framer<T>
where
    T: Transport,
{
    fn send_command(&mut self, opcode: u8, args: &[u8]) -> Result<(), BusError> {
        trace!("command 0x{:02x} {:02x?}", opcode, args);
        self.transport.open();
        self.transport.write_marker(Marker::Command);
        self.transport.write_byte(opcode);
        for &arg in args {
            self.transport.write_byte(arg);
        }
        self.close()
    }

    fn send_data<I>(&mut self, data: I) -> Result<(), BusError>
    where
        I: IntoIterator<Item = u8>,
    {
        let per_session = self.payload_per_session();
        let mut in_session = 0;
        let mut sessions = 1;

        self.transport.open();
        self.transport.write_marker(Marker::Data);
        for byte in data {
            if in_session == per_session {
                self.close()?;
                self.transport.open();
                self.transport.write_marker(Marker::Data);
                in_session = 0;
                sessions += 1;
            }
            self.transport.write_byte(byte);
            in_session += 1;
        }
        trace!("data frame in {} sessions", sessions);
        self.close()
    }

    fn hardware_reset<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        self.transport.hardware_reset(delay)
    }
}
