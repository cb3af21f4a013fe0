//! Defines structs for storing register values of commands in the SSD1327 that are associated with
//! relatively-static configuration.

use crate::command::*;
use crate::error::BusError;
use crate::interface::DisplayInterface;

/// The portion of the configuration which will persist inside the `Display` because it shares
/// registers with functions that can be changed after initialization. The phase length and
/// function selection registers are write-only, so the display keeps their last values here to
/// support changing one field of the register at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PersistentConfig {
    pub(crate) column_remap: ColumnRemap,
    pub(crate) nibble_remap: NibbleRemap,
    pub(crate) com_scan_direction: ComScanDirection,
    pub(crate) com_layout: ComLayout,
    /// Pixel reset (phase 1) and first pre-charge (phase 2) periods.
    pub(crate) phase_lengths: (u8, u8),
    pub(crate) second_precharge: bool,
    pub(crate) internal_vsl: bool,
}

impl PersistentConfig {
    /// Send the remapping register. The increment axis is always horizontal, because image data
    /// is written row by row.
    pub(crate) fn send_remapping<DI>(&self, iface: &mut DI) -> Result<(), BusError>
    where
        DI: DisplayInterface,
    {
        Command::SetRemapping(
            IncrementAxis::Horizontal,
            self.column_remap,
            self.nibble_remap,
            self.com_scan_direction,
            self.com_layout,
        )
        .send(iface)
    }

    pub(crate) fn send_phase_lengths<DI>(&self, iface: &mut DI) -> Result<(), BusError>
    where
        DI: DisplayInterface,
    {
        Command::SetPhaseLengths(self.phase_lengths.0, self.phase_lengths.1).send(iface)
    }

    pub(crate) fn send_function_selection<DI>(&self, iface: &mut DI) -> Result<(), BusError>
    where
        DI: DisplayInterface,
    {
        Command::SetFunctionSelectionB(self.second_precharge, self.internal_vsl).send(iface)
    }
}

impl Default for PersistentConfig {
    fn default() -> Self {
        PersistentConfig {
            column_remap: ColumnRemap::Reverse,
            nibble_remap: NibbleRemap::Forward,
            com_scan_direction: ComScanDirection::RowZeroLast,
            com_layout: ComLayout::OddEvenSplit,
            phase_lengths: (0x01, 0x0F),
            second_precharge: true,
            internal_vsl: false,
        }
    }
}

/// A configuration for the display. Every setting starts at the chip's documented power-on value
/// and is sent during `Display::init`; builder methods override individual values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) persistent_config: PersistentConfig,
    pub(crate) contrast: u8,
    pub(crate) display_offset: u8,
    pub(crate) vdd_regulator: bool,
    pub(crate) clock: (u8, u8),
    pub(crate) precharge_voltage: u8,
    pub(crate) com_deselect_voltage: u8,
    pub(crate) second_precharge_period: u8,
}

impl Config {
    /// Create a new configuration. COM scan direction and COM layout depend on how the display
    /// module wires the panel to the chip, so they must be provided in the constructor. All other
    /// options can be changed by calling the provided builder methods on `Config`.
    pub fn new(com_scan_direction: ComScanDirection, com_layout: ComLayout) -> Self {
        Config {
            persistent_config: PersistentConfig {
                com_scan_direction,
                com_layout,
                ..PersistentConfig::default()
            },
            contrast: 0xFF,
            display_offset: 0,
            vdd_regulator: true,
            clock: (0x0F, 0x00),
            precharge_voltage: 0x05,
            com_deselect_voltage: 0x05,
            second_precharge_period: 0x04,
        }
    }

    /// Configure display contrast current. See `Command::SetContrast`.
    pub fn contrast(self, level: u8) -> Self {
        Self {
            contrast: level,
            ..self
        }
    }

    /// Configure the vertical offset of the COM lines. See `Command::SetDisplayOffset`.
    pub fn display_offset(self, offset: u8) -> Self {
        Self {
            display_offset: offset,
            ..self
        }
    }

    /// Configure OLED drive phase lengths. See `Command::SetPhaseLengths`.
    pub fn phase_lengths(mut self, reset: u8, first_precharge: u8) -> Self {
        self.persistent_config.phase_lengths = (reset, first_precharge);
        self
    }

    /// Configure the oscillator frequency and display clock divider. See `Command::SetClock`.
    pub fn clock(self, fosc: u8, divider: u8) -> Self {
        Self {
            clock: (fosc, divider),
            ..self
        }
    }

    /// Configure OLED drive pre-charge voltage. See `Command::SetPreChargeVoltage`.
    pub fn precharge_voltage(self, voltage: u8) -> Self {
        Self {
            precharge_voltage: voltage,
            ..self
        }
    }

    /// Configure OLED drive COM deselect voltage. See `Command::SetComDeselectVoltage`.
    pub fn com_deselect_voltage(self, voltage: u8) -> Self {
        Self {
            com_deselect_voltage: voltage,
            ..self
        }
    }

    /// Configure OLED drive second pre-charge period length. See
    /// `Command::SetSecondPrechargePeriod`.
    pub fn second_precharge_period(self, period: u8) -> Self {
        Self {
            second_precharge_period: period,
            ..self
        }
    }

    /// Enable or disable the second pre-charge phase. See `Command::SetFunctionSelectionB`.
    pub fn second_precharge(mut self, enable: bool) -> Self {
        self.persistent_config.second_precharge = enable;
        self
    }

    /// Select the internal VSL regulator instead of an external one. See
    /// `Command::SetFunctionSelectionB`.
    pub fn internal_vsl(mut self, enable: bool) -> Self {
        self.persistent_config.internal_vsl = enable;
        self
    }

    /// Enable or disable the internal VDD regulator. See `Command::SetVddRegulator`.
    pub fn vdd_regulator(self, enable: bool) -> Self {
        Self {
            vdd_regulator: enable,
            ..self
        }
    }

    /// Configure column address and nibble remapping, which mirror the image horizontally. See
    /// `Command::SetRemapping`.
    pub fn column_remap(mut self, column_remap: ColumnRemap, nibble_remap: NibbleRemap) -> Self {
        self.persistent_config.column_remap = column_remap;
        self.persistent_config.nibble_remap = nibble_remap;
        self
    }
}

impl Default for Config {
    /// The wiring of the common 128x128 modules: COM lines scanned bottom to top and split
    /// odd/even, columns reversed.
    fn default() -> Self {
        Config::new(ComScanDirection::RowZeroLast, ComLayout::OddEvenSplit)
    }
}
