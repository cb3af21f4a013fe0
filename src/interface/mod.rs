//! Bus plumbing between the display driver and the SSD1327.
//!
//! The driver talks to a `DisplayInterface`, which understands two kinds of messages: command
//! frames (an opcode plus its argument bytes) and data frames (display RAM contents of any
//! length). The `Framer` implements `DisplayInterface` on top of a byte-oriented `Transport`,
//! which is the only part that knows about the physical bus.
//!
//! The SSD1327 distinguishes commands from data by a control marker at the start of every bus
//! session. On I2C this is a control byte following the address; on 4-wire SPI it is the level of
//! the D/C line.

use embedded_hal::delay::DelayNs;

use crate::error::BusError;

pub mod framer;
pub mod i2c;
pub mod spi;

#[cfg(test)]
#[macro_use]
pub mod test_spy;

/// The control marker which opens every bus session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Marker {
    /// The session carries an opcode and its arguments.
    Command = 0x00,
    /// The session carries display RAM data.
    Data = 0x40,
}

/// A byte-oriented bus transaction to the display controller.
///
/// A session is `open`, a `write_marker`, any number of `write_byte`s, then `close`. Writes never
/// fail individually: the first failure of a session is latched and reported by `close`.
pub trait Transport {
    /// Number of bytes of each session's maximum transfer size taken up by the session header
    /// (address and/or control marker), and so not available for payload.
    fn header_len(&self) -> usize;

    /// Maximum number of bytes the bus can move in one atomic session, header included.
    fn max_chunk(&self) -> usize;

    /// Begin a bus session.
    fn open(&mut self);

    /// Emit the control marker of the session that was just opened.
    fn write_marker(&mut self, marker: Marker);

    /// Write one byte in the current session.
    fn write_byte(&mut self, byte: u8);

    /// End the current session and report its status.
    fn close(&mut self) -> Result<(), BusError>;

    /// Pulse the controller's reset line, if one is wired. Returns `false` if no reset line was
    /// pulsed, in which case the caller has to reset the controller in software.
    fn hardware_reset<D: DelayNs>(&mut self, _delay: &mut D) -> bool {
        false
    }
}

/// Something which can deliver command and data frames to the display controller.
pub trait DisplayInterface {
    /// Send a command frame: the opcode followed by its argument bytes, which may be empty.
    fn send_command(&mut self, opcode: u8, args: &[u8]) -> Result<(), BusError>;

    /// Send a data frame containing every byte yielded by `data`.
    fn send_data<I>(&mut self, data: I) -> Result<(), BusError>
    where
        I: IntoIterator<Item = u8>;

    /// Pulse the controller's reset line, if the interface has one. See
    /// `Transport::hardware_reset`.
    fn hardware_reset<D: DelayNs>(&mut self, _delay: &mut D) -> bool {
        false
    }
}

pub use self::framer::Framer;
