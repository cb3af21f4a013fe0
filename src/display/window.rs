//! The addressing window: the range of display RAM that image data is written into.

use crate::command::consts::*;

/// Column (segment pair) and row ranges last sent to the controller, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub col_start: u8,
    pub col_end: u8,
    pub row_start: u8,
    pub row_end: u8,
}

impl Window {
    /// The window covering a display of `width` x `height` pixels.
    pub fn full(width: u8, height: u8) -> Self {
        Window {
            col_start: 0,
            col_end: (width / 2).saturating_sub(1) & BUF_COL_MASK,
            row_start: 0,
            row_end: height.saturating_sub(1) & PIXEL_ROW_MASK,
        }
    }

    pub fn with_columns(self, start: u8, end: u8) -> Self {
        Window {
            col_start: start & BUF_COL_MASK,
            col_end: end & BUF_COL_MASK,
            ..self
        }
    }

    pub fn with_rows(self, start: u8, end: u8) -> Self {
        Window {
            row_start: start & PIXEL_ROW_MASK,
            row_end: end & PIXEL_ROW_MASK,
            ..self
        }
    }
}
