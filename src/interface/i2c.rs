//! The I2C interface of the SSD1327.
//!
//! Every I2C transaction starts with the device address followed by a control byte, 0x00 for
//! commands and 0x40 for display data. Display modules buffer at most 32 bytes of a transaction,
//! so sessions are collected into a buffer of that size and written out in one transaction when
//! the session is closed.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};

use super::{Marker, Transport};
use crate::error::{status, BusError};

/// The address of most SSD1327 modules. Some can be strapped to 0x3D.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Bytes one transaction may carry after the address, control byte included.
pub const BUFFER_LEN: usize = 32;

/// More bytes were written in one session than fit in the transaction buffer.
pub const DATA_TOO_LONG: BusError = status(1);
/// The device did not acknowledge its address.
pub const ADDRESS_NACK: BusError = status(2);
/// The device did not acknowledge a data byte.
pub const DATA_NACK: BusError = status(3);
/// Any other bus fault.
pub const BUS_FAULT: BusError = status(4);

fn status_of(kind: ErrorKind) -> BusError {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => ADDRESS_NACK,
        ErrorKind::NoAcknowledge(_) => DATA_NACK,
        _ => BUS_FAULT,
    }
}

pub struct I2cTransport<I2C> {
    /// The I2C master device connected to the SSD1327.
    i2c: I2C,
    /// 7-bit device address.
    address: u8,
    buf: [u8; BUFFER_LEN],
    len: usize,
    overflow: bool,
}

impl<I2C> I2cTransport<I2C>
where
    I2C: I2c,
{
    /// Create a new I2C interface to communicate with the display driver at `DEFAULT_ADDRESS`.
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
            buf: [0; BUFFER_LEN],
            len: 0,
            overflow: false,
        }
    }

    /// Talk to the display at a different 7-bit address.
    pub fn with_address(self, address: u8) -> Self {
        Self {
            address: address & 0x7F,
            ..self
        }
    }

    /// Give back the I2C master device.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn push(&mut self, byte: u8) {
        match self.buf.get_mut(self.len) {
            Some(slot) => {
                *slot = byte;
                self.len += 1;
            }
            None => self.overflow = true,
        }
    }
}

impl<I2C> Transport for I2cTransport<I2C>
where
    I2C: I2c,
{
    fn header_len(&self) -> usize {
        // Address and control byte.
        2
    }

    fn max_chunk(&self) -> usize {
        BUFFER_LEN
    }

    fn open(&mut self) {
        self.len = 0;
        self.overflow = false;
    }

    fn write_marker(&mut self, marker: Marker) {
        self.push(marker as u8);
    }

    fn write_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    fn close(&mut self) -> Result<(), BusError> {
        let len = core::mem::replace(&mut self.len, 0);
        // A truncated session is never put on the bus.
        if core::mem::replace(&mut self.overflow, false) {
            return Err(DATA_TOO_LONG);
        }
        self.i2c
            .write(self.address, &self.buf[..len])
            .map_err(|err| status_of(err.kind()))
    }
}
