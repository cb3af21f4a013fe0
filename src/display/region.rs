//! Region abstraction for drawing into rectangular regions of the display.

use log::debug;

use crate::display::pack::PixelPacker;
use crate::display::{Display, PixelCoord};
use crate::error::BusError;
use crate::interface::DisplayInterface;

/// A handle to a rectangular region of a display which can be drawn into.
pub struct Region<'d, DI>
where
    DI: DisplayInterface,
{
    display: &'d mut Display<DI>,
    upper_left: PixelCoord,
    size: PixelCoord,
}

impl<'d, DI> Region<'d, DI>
where
    DI: DisplayInterface,
{
    /// Construct a new region. This is only called by the factory method `Display::region`.
    pub(super) fn new(
        display: &'d mut Display<DI>,
        upper_left: PixelCoord,
        size: PixelCoord,
    ) -> Self {
        Region {
            display,
            upper_left,
            size,
        }
    }

    /// Draw packed-pixel image data into the region, such that each byte is two 4-bit gray scale
    /// values of horizontally-adjacent pixels. Pixels are drawn left-to-right and top-to-bottom,
    /// with no padding at the end of a row, so rows of an odd-width region do not all start on a
    /// byte boundary.
    ///
    /// The addressing window is set up first; if any of that fails nothing is drawn. For an even
    /// width the buffer is sent unmodified, whatever its length. For an odd width rows are
    /// re-aligned and sending stops at the region height. Odd regions wider than the display are
    /// clamped to full display rows, which misaligns every row after the first.
    pub fn draw_packed(&mut self, image: &[u8]) -> Result<(), BusError> {
        let PixelCoord(x, y) = self.upper_left;
        let PixelCoord(width, height) = self.size;
        if width == 0 || height == 0 {
            return Ok(());
        }
        debug!("drawing {}x{} pixels at ({}, {})", width, height, x, y);

        // The window is computed wide and truncated to register width by the commands.
        let (x, y) = (u16::from(x), u16::from(y));
        let (w, h) = (u16::from(width), u16::from(height));
        self.display.set_row_range(y as u8, (y + h - 1) as u8)?;
        self.display
            .set_column_range((x / 2) as u8, ((x + w) / 2 + w % 2 - 1) as u8)?;
        self.display.start_line(0)?;

        let iface = &mut self.display.iface;
        if width % 2 == 0 {
            return iface.send_data(image.iter().cloned());
        }
        let mut packer = PixelPacker::new(width, height, image);
        while let Some(row) = packer.next_row() {
            iface.send_data(row.iter().cloned())?;
        }
        Ok(())
    }
}
