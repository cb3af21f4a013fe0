//! Re-aligns image data whose width is an odd number of pixels.
//!
//! Image data is packed two pixels per byte with no padding between rows, so when a row has an odd
//! number of pixels every other row starts in the low nibble of a byte. The controller however
//! starts every row on a fresh column address. Rows alternate between two phases:
//!
//! - An *even* row starts on a byte boundary. `width / 2 + 1` bytes are copied; the low nibble of
//!   the last one is the first pixel of the next row, so the byte is kept as the carry and its low
//!   nibble is cleared.
//! - An *odd* row starts in the carry's low nibble. The carry is followed by the next
//!   `width / 2` bytes and the whole row is shifted left by one nibble.

use log::warn;

use crate::command::consts::{NUM_BUF_COLS, NUM_PIXEL_COLS};

/// The longest row the packer can emit, for a 128-pixel wide region.
pub const MAX_ROW_LEN: usize = NUM_BUF_COLS as usize + 1;

/// Produces the rows of an odd-width region, one controller row per `next_row` call.
pub struct PixelPacker<'img> {
    image: &'img [u8],
    row_len: usize,
    rows_left: usize,
    /// The last byte of the previous even row, present while in the odd phase.
    carry: Option<u8>,
    scratch: [u8; MAX_ROW_LEN],
}

impl<'img> PixelPacker<'img> {
    /// Pack `image`, a region `width` pixels wide and `height` rows high. `width` is expected to
    /// be odd. Rows of regions wider than the display are clamped to `MAX_ROW_LEN` bytes.
    pub fn new(width: u8, height: u8, image: &'img [u8]) -> Self {
        let row_len = usize::from(width) / 2 + 1;
        if row_len > MAX_ROW_LEN {
            warn!(
                "{} pixel wide region exceeds the {} display columns, rows are clamped",
                width, NUM_PIXEL_COLS
            );
        }
        PixelPacker {
            image,
            row_len: row_len.min(MAX_ROW_LEN),
            rows_left: usize::from(height),
            carry: None,
            scratch: [0; MAX_ROW_LEN],
        }
    }

    /// The next row ready to be sent, or `None` once `height` rows were produced or the image is
    /// exhausted. A short last row is sent as it is, with its final low nibble cleared.
    pub fn next_row(&mut self) -> Option<&[u8]> {
        if self.rows_left == 0 {
            return None;
        }
        self.rows_left -= 1;

        // A one pixel wide odd row is made of the carry alone.
        let fresh = match self.carry {
            Some(_) => self.row_len - 1,
            None => self.row_len,
        };
        if self.image.len() < fresh {
            let len = self.image.len();
            self.rows_left = 0;
            if len == 0 {
                return None;
            }
            self.scratch[..len].copy_from_slice(self.image);
            self.scratch[len - 1] &= 0xF0;
            self.image = &[];
            return Some(&self.scratch[..len]);
        }

        let (row, rest) = self.image.split_at(fresh);
        self.image = rest;
        let last = self.row_len - 1;
        let out = &mut self.scratch[..self.row_len];
        match self.carry.take() {
            None => {
                out.copy_from_slice(row);
                self.carry = Some(out[last]);
                out[last] &= 0xF0;
            }
            Some(carry) => {
                out[0] = carry;
                out[1..].copy_from_slice(row);
                for j in 0..last {
                    out[j] = out[j] << 4 | out[j + 1] >> 4;
                }
                out[last] <<= 4;
            }
        }
        Some(&self.scratch[..self.row_len])
    }
}
