//! Error types shared by the transports, the framer and the display driver.
//!
//! A bus failure is a single opaque status code chosen by the transport that produced it. The
//! driver never interprets these codes; it only propagates them, or combines several of them with
//! bitwise OR when a sequence of commands is sent on a best-effort basis (see
//! `StatusAccumulator`).

use core::fmt;
use core::num::NonZeroU8;
use core::ops::BitOr;

/// A nonzero, transport-specific status code reported when a bus session was closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusError(NonZeroU8);

impl BusError {
    /// Wrap a raw status code. Returns `None` for 0, which means success.
    pub const fn new(code: u8) -> Option<Self> {
        match NonZeroU8::new(code) {
            Some(code) => Some(BusError(code)),
            None => None,
        }
    }

    /// The raw status code.
    pub const fn code(self) -> u8 {
        self.0.get()
    }

    /// Convert a raw status into a `Result`, where 0 is success.
    pub fn check(code: u8) -> Result<(), Self> {
        match Self::new(code) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Status code constant for a transport's status table. 0 is not a failure and becomes 0xff.
pub(crate) const fn status(code: u8) -> BusError {
    match NonZeroU8::new(code) {
        Some(code) => BusError(code),
        None => BusError(NonZeroU8::MAX),
    }
}

impl BitOr for BusError {
    type Output = BusError;

    fn bitor(self, rhs: BusError) -> BusError {
        BusError(self.0 | rhs.0)
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus error (status 0x{:02x})", self.code())
    }
}

/// Returned by `Display::new` when the requested display size cannot be driven by an SSD1327.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeometryError;

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("display size not supported by SSD1327")
    }
}

/// Collects the outcome of a series of independent bus operations.
///
/// Every status is OR-ed into one aggregate, so the caller learns *that* something failed but not
/// which step it was.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusAccumulator {
    status: u8,
}

impl StatusAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one operation's result into the aggregate.
    pub fn record(&mut self, result: Result<(), BusError>) {
        if let Err(err) = result {
            self.status |= err.code();
        }
    }

    /// The combined outcome of everything recorded so far.
    pub fn finish(self) -> Result<(), BusError> {
        BusError::check(self.status)
    }
}
