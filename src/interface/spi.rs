//! The SPI interface supports the "4-wire" interface of the driver, such that each word on the
//! SPI bus is 8 bits and the D/C line selects whether bytes are commands or display data. The
//! "3-wire" mode replaces the D/C GPIO with a 9th bit on each word, which seems really awkward to
//! implement with embedded_hal SPI.
//!
//! Chip-select and reset lines are optional. The SPI bus is driven as a `SpiBus` so that
//! chip-select stays asserted for a whole session rather than being toggled per write.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::spi::{Error as _, ErrorKind, SpiBus};
use log::warn;

use super::{Marker, Transport};
use crate::error::{status, BusError};

/// Default number of bytes moved per session.
pub const DEFAULT_MAX_CHUNK: usize = 32;

/// A GPIO line could not be driven.
pub const PIN_FAULT: BusError = status(0x20);

fn status_of(kind: ErrorKind) -> BusError {
    match kind {
        ErrorKind::Overrun => status(0x11),
        ErrorKind::ModeFault => status(0x12),
        ErrorKind::FrameFormat => status(0x13),
        ErrorKind::ChipSelectFault => status(0x14),
        _ => status(0x15),
    }
}

/// Stands in for a chip-select or reset line which is not wired.
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

pub struct SpiTransport<SPI, DC, CS = NoPin, RST = NoPin> {
    /// The SPI master device connected to the SSD1327.
    spi: SPI,
    /// A GPIO output pin connected to the D/C (data/command) pin of the SSD1327 (the fourth
    /// "wire" of "4-wire" mode).
    dc: DC,
    /// Active-low chip-select, held low for a whole session.
    cs: Option<CS>,
    /// Active-low reset.
    rst: Option<RST>,
    max_chunk: usize,
    /// First failure of the current session.
    status: Option<BusError>,
}

impl<SPI, DC> SpiTransport<SPI, DC>
where
    SPI: SpiBus,
    DC: OutputPin,
{
    /// Create a new SPI interface to communicate with the display driver. `spi` is the SPI
    /// master device, and `dc` is the GPIO output pin connected to the D/C pin of the SSD1327.
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self {
            spi,
            dc,
            cs: None,
            rst: None,
            max_chunk: DEFAULT_MAX_CHUNK,
            status: None,
        }
    }
}

impl<SPI, DC, CS, RST> SpiTransport<SPI, DC, CS, RST>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Drive the display's chip-select line with `cs`.
    pub fn with_chip_select<C: OutputPin>(self, cs: C) -> SpiTransport<SPI, DC, C, RST> {
        SpiTransport {
            spi: self.spi,
            dc: self.dc,
            cs: Some(cs),
            rst: self.rst,
            max_chunk: self.max_chunk,
            status: self.status,
        }
    }

    /// Drive the display's reset line with `rst`, enabling hardware resets.
    pub fn with_reset<R: OutputPin>(self, rst: R) -> SpiTransport<SPI, DC, CS, R> {
        SpiTransport {
            spi: self.spi,
            dc: self.dc,
            cs: self.cs,
            rst: Some(rst),
            max_chunk: self.max_chunk,
            status: self.status,
        }
    }

    /// Limit how many bytes, D/C marker included, are moved per session.
    pub fn with_max_chunk(self, max_chunk: usize) -> Self {
        Self { max_chunk, ..self }
    }

    /// Give back the bus and pins.
    pub fn release(self) -> (SPI, DC, Option<CS>, Option<RST>) {
        (self.spi, self.dc, self.cs, self.rst)
    }

    fn latch(&mut self, result: Result<(), BusError>) {
        if let Err(err) = result {
            self.status.get_or_insert(err);
        }
    }
}

impl<SPI, DC, CS, RST> Transport for SpiTransport<SPI, DC, CS, RST>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    fn header_len(&self) -> usize {
        // The D/C marker.
        1
    }

    fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    fn open(&mut self) {
        self.status = None;
        let result = match self.cs.as_mut() {
            Some(cs) => cs.set_low().map_err(|_| PIN_FAULT),
            None => Ok(()),
        };
        self.latch(result);
    }

    fn write_marker(&mut self, marker: Marker) {
        let result = match marker {
            Marker::Command => self.dc.set_low(),
            Marker::Data => self.dc.set_high(),
        };
        self.latch(result.map_err(|_| PIN_FAULT));
    }

    fn write_byte(&mut self, byte: u8) {
        let result = self.spi.write(&[byte]).map_err(|err| status_of(err.kind()));
        self.latch(result);
    }

    fn close(&mut self) -> Result<(), BusError> {
        let flushed = self.spi.flush().map_err(|err| status_of(err.kind()));
        self.latch(flushed);
        let released = match self.cs.as_mut() {
            Some(cs) => cs.set_high().map_err(|_| PIN_FAULT),
            None => Ok(()),
        };
        self.latch(released);
        match self.status.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn hardware_reset<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        let rst = match self.rst.as_mut() {
            Some(rst) => rst,
            None => return false,
        };
        if rst.set_low().is_err() {
            warn!("reset line could not be driven low");
            return false;
        }
        delay.delay_ms(100);
        if rst.set_high().is_err() {
            warn!("reset line could not be released");
            return false;
        }
        delay.delay_ms(100);
        true
    }
}
