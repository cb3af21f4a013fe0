//! The main API to the display driver. It brings the display up from power-on, keeps track of the
//! addressing window, and provides methods for obtaining `Region` instances which can be used to
//! write image data to the display.

pub mod pack;
pub mod region;
pub mod window;

use embedded_hal::delay::DelayNs;
use itertools::repeat_n;
use log::debug;

use crate::command::consts::*;
use crate::command::*;
use crate::config::{Config, PersistentConfig};
use crate::display::region::Region;
use crate::display::window::Window;
use crate::error::{BusError, GeometryError, StatusAccumulator};
use crate::interface::DisplayInterface;

/// A pixel coordinate pair of `column` and `row`, or a size of `width` and `height` in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelCoord(pub u8, pub u8);

/// A driver for an SSD1327 display.
pub struct Display<DI>
where
    DI: DisplayInterface,
{
    iface: DI,
    display_size: PixelCoord,
    window: Window,
    persistent_config: PersistentConfig,
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Construct a new display driver for a display with viewable dimensions `display_size`,
    /// which is connected to the interface `iface`. Both dimensions must be between 1 and 128.
    ///
    /// Nothing is sent to the display until `init` is called.
    pub fn new(iface: DI, display_size: PixelCoord) -> Result<Self, GeometryError> {
        let PixelCoord(width, height) = display_size;
        if width == 0 || height == 0 || width > NUM_PIXEL_COLS || height > NUM_PIXEL_ROWS {
            return Err(GeometryError);
        }
        Ok(Display {
            iface,
            display_size,
            window: Window::full(width, height),
            persistent_config: PersistentConfig::default(),
        })
    }

    /// Bring the display up: reset it, send every setting of `config` along with the registers
    /// derived from the display size, and switch it on.
    ///
    /// All steps are attempted even if some of them fail. The error returned in that case carries
    /// the status codes of all failed steps OR-ed together.
    pub fn init<D>(&mut self, config: Config, delay: &mut D) -> Result<(), BusError>
    where
        D: DelayNs,
    {
        debug!("initializing {:?} display", self.display_size);
        let mut status = StatusAccumulator::new();
        status.record(self.reset(delay));
        // The controller may have been left locked.
        status.record(self.unlock());
        status.record(self.display_off());
        self.persistent_config = config.persistent_config;
        status.record(self.persistent_config.send_remapping(&mut self.iface));
        status.record(self.start_line(0));
        status.record(self.display_offset(config.display_offset));
        status.record(self.mux_ratio(self.display_size.1));
        status.record(self.vdd_regulator(config.vdd_regulator));
        status.record(self.contrast(config.contrast));
        status.record(self.persistent_config.send_phase_lengths(&mut self.iface));
        status.record(self.reset_range());
        status.record(self.display_clock(config.clock.0, config.clock.1));
        status.record(self.default_grayscale_table());
        status.record(self.precharge_voltage(config.precharge_voltage));
        status.record(self.com_deselect_voltage(config.com_deselect_voltage));
        status.record(self.second_precharge_period(config.second_precharge_period));
        status.record(self.persistent_config.send_function_selection(&mut self.iface));
        status.record(self.display_mode(DisplayMode::Normal));
        status.record(self.display_on());
        delay.delay_ms(100);
        status.finish()
    }

    /// Pulse the reset line, then clear the display RAM, which holds garbage after a reset. Does
    /// nothing when the interface has no reset line.
    pub fn reset<D>(&mut self, delay: &mut D) -> Result<(), BusError>
    where
        D: DelayNs,
    {
        if !self.iface.hardware_reset(delay) {
            return Ok(());
        }
        debug!("hardware reset");
        self.clear()
    }

    /// Fill the currently addressed part of the display RAM with zeros, as many bytes as the
    /// display has pixel pairs.
    pub fn clear(&mut self) -> Result<(), BusError> {
        let PixelCoord(width, height) = self.display_size;
        let len = usize::from(width) * usize::from(height) / 2;
        debug!("clearing {} bytes", len);
        self.iface.send_data(repeat_n(0u8, len))
    }

    /// Draw packed image data, two pixels per byte, into the `size` pixels large rectangle whose
    /// upper left corner is at `upper_left`. See `Region::draw_packed`.
    pub fn render_image_data(
        &mut self,
        upper_left: PixelCoord,
        size: PixelCoord,
        image: &[u8],
    ) -> Result<(), BusError> {
        self.region(upper_left, size).draw_packed(image)
    }

    /// Construct a rectangular region onto which to draw image data.
    ///
    /// Regions are intended to be short-lived, and mutably borrow the display so clashing writes
    /// are prevented.
    pub fn region(&mut self, upper_left: PixelCoord, size: PixelCoord) -> Region<'_, DI> {
        Region::new(self, upper_left, size)
    }

    /// Set the range of column addresses (pixel pairs) written by image data. Values are masked
    /// to 6 bits.
    pub fn set_column_range(&mut self, start: u8, end: u8) -> Result<(), BusError> {
        Command::SetColumnAddress(start, end).send(&mut self.iface)?;
        self.window = self.window.with_columns(start, end);
        Ok(())
    }

    /// Set the range of rows written by image data. Values are masked to 7 bits.
    pub fn set_row_range(&mut self, start: u8, end: u8) -> Result<(), BusError> {
        Command::SetRowAddress(start, end).send(&mut self.iface)?;
        self.window = self.window.with_rows(start, end);
        Ok(())
    }

    /// Address the whole display. Both ranges are sent even if the first one fails.
    pub fn reset_range(&mut self) -> Result<(), BusError> {
        let full = Window::full(self.display_size.0, self.display_size.1);
        let mut status = StatusAccumulator::new();
        status.record(self.set_column_range(full.col_start, full.col_end));
        status.record(self.set_row_range(full.row_start, full.row_end));
        status.finish()
    }

    /// The addressing window last set successfully.
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn size(&self) -> PixelCoord {
        self.display_size
    }

    /// Control sleep mode. The display is off while sleeping.
    pub fn sleep(&mut self, enabled: bool) -> Result<(), BusError> {
        Command::SetSleepMode(enabled).send(&mut self.iface)
    }

    pub fn display_on(&mut self) -> Result<(), BusError> {
        self.sleep(false)
    }

    pub fn display_off(&mut self) -> Result<(), BusError> {
        self.sleep(true)
    }

    pub fn display_mode(&mut self, mode: DisplayMode) -> Result<(), BusError> {
        Command::SetDisplayMode(mode).send(&mut self.iface)
    }

    /// Control the contrast current.
    pub fn contrast(&mut self, level: u8) -> Result<(), BusError> {
        Command::SetContrast(level).send(&mut self.iface)
    }

    /// Set the vertical pan.
    ///
    /// This shifts the display RAM row addresses relative to the active set of COM lines, allowing
    /// any display-height-sized window of the entire 128 rows of display RAM to be made visible.
    pub fn start_line(&mut self, line: u8) -> Result<(), BusError> {
        Command::SetStartLine(line).send(&mut self.iface)
    }

    pub fn display_offset(&mut self, offset: u8) -> Result<(), BusError> {
        Command::SetDisplayOffset(offset).send(&mut self.iface)
    }

    /// Set the number of active rows, 16 to 128.
    pub fn mux_ratio(&mut self, lines: u8) -> Result<(), BusError> {
        Command::SetMuxRatio(lines).send(&mut self.iface)
    }

    /// Change the remapping register. The address increment axis cannot be changed because image
    /// data is always written row by row.
    pub fn remapping(
        &mut self,
        column_remap: ColumnRemap,
        nibble_remap: NibbleRemap,
        com_scan_direction: ComScanDirection,
        com_layout: ComLayout,
    ) -> Result<(), BusError> {
        self.persistent_config.column_remap = column_remap;
        self.persistent_config.nibble_remap = nibble_remap;
        self.persistent_config.com_scan_direction = com_scan_direction;
        self.persistent_config.com_layout = com_layout;
        self.persistent_config.send_remapping(&mut self.iface)
    }

    pub fn vdd_regulator(&mut self, enable: bool) -> Result<(), BusError> {
        Command::SetVddRegulator(enable).send(&mut self.iface)
    }

    /// Set the raw phase length register: pixel reset period in the low nibble, first pre-charge
    /// period in the high nibble.
    pub fn phase_length(&mut self, phase_length: u8) -> Result<(), BusError> {
        self.persistent_config.phase_lengths = (phase_length & 0x0F, phase_length >> 4);
        self.persistent_config.send_phase_lengths(&mut self.iface)
    }

    /// Set the pixel reset period (phase 1), 1 to 15 DCLKs, keeping the first pre-charge period.
    pub fn pixel_reset_period(&mut self, period: u8) -> Result<(), BusError> {
        self.persistent_config.phase_lengths.0 = period.max(1);
        self.persistent_config.send_phase_lengths(&mut self.iface)
    }

    /// Set the first pre-charge period (phase 2), 1 to 15 DCLKs, keeping the pixel reset period.
    pub fn first_precharge_period(&mut self, period: u8) -> Result<(), BusError> {
        self.persistent_config.phase_lengths.1 = period.max(1);
        self.persistent_config.send_phase_lengths(&mut self.iface)
    }

    pub fn second_precharge_period(&mut self, period: u8) -> Result<(), BusError> {
        Command::SetSecondPrechargePeriod(period).send(&mut self.iface)
    }

    /// Set the oscillator frequency and the display clock divider, 4 bits each.
    pub fn display_clock(&mut self, frequency: u8, divider: u8) -> Result<(), BusError> {
        Command::SetClock(frequency, divider).send(&mut self.iface)
    }

    pub fn gpio(&mut self, mode: GpioMode) -> Result<(), BusError> {
        Command::SetGpio(mode).send(&mut self.iface)
    }

    /// Program the pulse widths of gray levels 1 to 15.
    pub fn grayscale_table(&mut self, levels: [u8; 15]) -> Result<(), BusError> {
        Command::SetGrayScaleTable(levels).send(&mut self.iface)
    }

    pub fn default_grayscale_table(&mut self) -> Result<(), BusError> {
        Command::SetDefaultGrayScaleTable.send(&mut self.iface)
    }

    pub fn precharge_voltage(&mut self, voltage: u8) -> Result<(), BusError> {
        Command::SetPreChargeVoltage(voltage).send(&mut self.iface)
    }

    pub fn com_deselect_voltage(&mut self, voltage: u8) -> Result<(), BusError> {
        Command::SetComDeselectVoltage(voltage).send(&mut self.iface)
    }

    /// Enable or disable the second pre-charge phase, keeping the VSL selection.
    pub fn second_precharge(&mut self, enable: bool) -> Result<(), BusError> {
        self.persistent_config.second_precharge = enable;
        self.persistent_config.send_function_selection(&mut self.iface)
    }

    /// Select the internal or external VSL, keeping the second pre-charge selection.
    pub fn internal_vsl(&mut self, enable: bool) -> Result<(), BusError> {
        self.persistent_config.internal_vsl = enable;
        self.persistent_config.send_function_selection(&mut self.iface)
    }

    /// Lock the command interface. Every command but `unlock` is ignored until then.
    pub fn lock(&mut self) -> Result<(), BusError> {
        Command::SetCommandLock(true).send(&mut self.iface)
    }

    pub fn unlock(&mut self) -> Result<(), BusError> {
        Command::SetCommandLock(false).send(&mut self.iface)
    }

    pub fn no_op(&mut self) -> Result<(), BusError> {
        Command::NoOp.send(&mut self.iface)
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }
}
