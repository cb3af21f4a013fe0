//! Driver library for the Solomon Systech SSD1327 128x128 grayscale dot matrix OLED display
//! driver, over I2C or 4-wire SPI.
//!
//! The driver is split in three layers:
//!
//! - a `Transport` moves bytes over one physical bus (`I2cTransport`, `SpiTransport`),
//! - the `Framer` turns command and data frames into bus sessions small enough for the display
//!   module's buffer,
//! - the `Display` sequences commands: power-on configuration, addressing windows, and drawing of
//!   packed 4-bit image data, including regions with an odd width.

#![cfg_attr(not(feature = "std"), no_std)]

// Declared first so the test macros are usable by the mods declared afterwards.
#[macro_use]
pub mod interface;

pub mod command;
pub mod config;
pub mod display;
pub mod error;

// Re-exports for primary API.
pub use crate::command::{
    consts, ColumnRemap, ComLayout, ComScanDirection, DisplayMode, GpioMode, NibbleRemap,
};
pub use crate::config::Config;
pub use crate::display::{region::Region, window::Window, Display, PixelCoord};
pub use crate::error::{BusError, GeometryError};
pub use crate::interface::i2c::I2cTransport;
pub use crate::interface::spi::{NoPin, SpiTransport};
pub use crate::interface::{DisplayInterface, Framer, Marker, Transport};
