//! The command set for the SSD1327.
//!
//! Note 1: The display RAM of the SSD1327 is arranged in 128 rows and 64 columns, where each
//! column is 2 adjacent pixels (segments) in the row for a total max resolution of 128x128. Each
//! pixel is 4 bits/16 levels of intensity, so each column refers to exactly one byte of the RAM.
//! Anywhere there is a "column" address, these refer to horizontal pairs of pixels.
//!
//! Note 2: Command arguments are never rejected. A value outside the range of its register is
//! masked to the register's width, exactly as the controller itself would truncate it.

use crate::error::BusError;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Constants describing the display RAM geometry of the SSD1327.

    pub const NUM_PIXEL_COLS: u8 = 128;
    pub const NUM_PIXEL_ROWS: u8 = 128;
    pub const NUM_BUF_COLS: u8 = NUM_PIXEL_COLS / 2;
    /// Column addresses are 6 bits wide.
    pub const BUF_COL_MASK: u8 = 0x3F;
    /// Row addresses, start line and display offset are 7 bits wide.
    pub const PIXEL_ROW_MASK: u8 = 0x7F;
}

use self::consts::*;

/// Opcodes of the commands used by this driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    SetColumnAddress = 0x15,
    SetRowAddress = 0x75,
    SetContrast = 0x81,
    SetRemapping = 0xA0,
    SetStartLine = 0xA1,
    SetDisplayOffset = 0xA2,
    DisplayModeNormal = 0xA4,
    DisplayModeAllOn = 0xA5,
    DisplayModeAllOff = 0xA6,
    DisplayModeInverse = 0xA7,
    SetMuxRatio = 0xA8,
    SetVddRegulator = 0xAB,
    SleepModeOn = 0xAE,
    SleepModeOff = 0xAF,
    SetPhaseLength = 0xB1,
    NoOp = 0xB2,
    SetClock = 0xB3,
    SetGpio = 0xB5,
    SetSecondPrechargePeriod = 0xB6,
    SetGrayScaleTable = 0xB8,
    SetDefaultGrayScaleTable = 0xB9,
    SetPreChargeVoltage = 0xBC,
    SetComDeselectVoltage = 0xBE,
    SetFunctionSelectionB = 0xD5,
    SetCommandLock = 0xFD,
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

/// The address increment orientation when writing image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncrementAxis {
    /// The column address will increment as image data is written, writing bytes (horizontal
    /// pairs of pixels) from left to right in the range set by `SetColumnAddress` command, and
    /// then top to bottom in the range set by `SetRowAddress` command.
    Horizontal,
    /// The row address will increment as image data is written, from top to bottom in the range
    /// set by `SetRowAddress` command, and then left to right in the range set by
    /// `SetColumnAddress` command.
    Vertical,
}

/// Setting of column address remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRemap {
    /// Column addresses 0->63 map to segments 0,1->126,127.
    Forward,
    /// Column addresses 0->63 map to segments 126,127->0,1.
    Reverse,
}

/// Setting of data nibble remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NibbleRemap {
    /// Byte 0xAB maps (in L->R order) to pixels 0,1.
    Forward,
    /// Byte 0xAB maps (in L->R order) to pixels 1,0.
    Reverse,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// COM lines scan row addresses top to bottom.
    RowZeroFirst,
    /// COM lines scan row addresses bottom to top.
    RowZeroLast,
}

/// Setting the layout of the COM lines to the display rows. This setting is dictated by how the
/// display module itself wires the OLED matrix to the driver chip. See the display module
/// datasheet for the correct value to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComLayout {
    /// COM lines are connected to display rows in a progressive arrangement.
    Progressive,
    /// COM lines are split between the left and right side of the panel, alternating rows.
    OddEvenSplit,
}

/// Setting of the display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// The display operates normally, showing the image in the display RAM.
    Normal,
    /// All pixels turned ON at grayscale level 15.
    AllOn,
    /// All pixels turned OFF.
    AllOff,
    /// The display shows the image in the display RAM with the grayscale levels inverted.
    Inverse,
}

/// Setting of the GPIO pin of the SSD1327.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpioMode {
    InputDisabled,
    InputEnabled,
    OutputLow,
    OutputHigh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set the column start and end address range when writing to the display RAM. The column
    /// address pointer is reset to the start column address. Range is 0-63. (Note 1)
    SetColumnAddress(u8, u8),
    /// Set the row start and end address range when writing to the display RAM. The row address
    /// pointer is reset to the start row address. Range is 0-127.
    SetRowAddress(u8, u8),
    /// Set the contrast current. Range 0-255.
    SetContrast(u8),
    /// Set the direction of display address increment, column address remapping, data nibble
    /// remapping, COM scan direction, and COM line layout.
    SetRemapping(
        IncrementAxis,
        ColumnRemap,
        NibbleRemap,
        ComScanDirection,
        ComLayout,
    ),
    /// Set the display RAM row shown on the first display row. Range is 0-127.
    SetStartLine(u8),
    /// Set the vertical offset of the COM lines. Range is 0-127.
    SetDisplayOffset(u8),
    /// Set the display operating mode.
    SetDisplayMode(DisplayMode),
    /// Set the number of active display rows. Range 16-128; sent as the ratio minus one.
    SetMuxRatio(u8),
    /// Enable or disable the internal VDD regulator.
    SetVddRegulator(bool),
    /// Control sleep mode (display off).
    SetSleepMode(bool),
    /// Set the refresh phase lengths: pixel reset (phase 1) and first pre-charge (phase 2), 1-15
    /// DCLKs each.
    SetPhaseLengths(u8, u8),
    /// Do nothing.
    NoOp,
    /// Set the oscillator frequency (0-15) and the display clock divider (0-15).
    SetClock(u8, u8),
    /// Set the mode of the GPIO pin.
    SetGpio(GpioMode),
    /// Set the second pre-charge period. Range 1-15 DCLKs.
    SetSecondPrechargePeriod(u8),
    /// Set the gray scale table: pulse widths for gray levels 1->15. Range 0-63 each.
    SetGrayScaleTable([u8; 15]),
    /// Set the gray scale table to the factory default.
    SetDefaultGrayScaleTable,
    /// Set the pre-charge voltage level. Range 0-15.
    SetPreChargeVoltage(u8),
    /// Set the COM deselect voltage level. Range 0-7.
    SetComDeselectVoltage(u8),
    /// Enable or disable the second pre-charge phase and the internal VSL regulator.
    SetFunctionSelectionB(bool, bool),
    /// Set whether the command lock is enabled or disabled. Enabling the command lock blocks all
    /// commands except `SetCommandLock`.
    SetCommandLock(bool),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        ($cmd, &$buf[..0])
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        ($cmd, &$buf[..1])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        ($cmd, &$buf[..2])
    }};
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), BusError>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 15];
        let (cmd, data) = match self {
            Command::SetColumnAddress(start, end) => ok_command!(
                arg_buf,
                Opcode::SetColumnAddress,
                [start & BUF_COL_MASK, end & BUF_COL_MASK]
            ),
            Command::SetRowAddress(start, end) => ok_command!(
                arg_buf,
                Opcode::SetRowAddress,
                [start & PIXEL_ROW_MASK, end & PIXEL_ROW_MASK]
            ),
            Command::SetContrast(level) => ok_command!(arg_buf, Opcode::SetContrast, [level]),
            Command::SetRemapping(
                increment_axis,
                column_remap,
                nibble_remap,
                com_scan_direction,
                com_layout,
            ) => {
                let cr = match column_remap {
                    ColumnRemap::Forward => 0x00,
                    ColumnRemap::Reverse => 0x01,
                };
                let nr = match nibble_remap {
                    NibbleRemap::Forward => 0x00,
                    NibbleRemap::Reverse => 0x02,
                };
                let ia = match increment_axis {
                    IncrementAxis::Horizontal => 0x00,
                    IncrementAxis::Vertical => 0x04,
                };
                let csd = match com_scan_direction {
                    ComScanDirection::RowZeroFirst => 0x00,
                    ComScanDirection::RowZeroLast => 0x10,
                };
                let split = match com_layout {
                    ComLayout::Progressive => 0x00,
                    ComLayout::OddEvenSplit => 0x40,
                };
                ok_command!(arg_buf, Opcode::SetRemapping, [cr | nr | ia | csd | split])
            }
            Command::SetStartLine(line) => {
                ok_command!(arg_buf, Opcode::SetStartLine, [line & PIXEL_ROW_MASK])
            }
            Command::SetDisplayOffset(line) => {
                ok_command!(arg_buf, Opcode::SetDisplayOffset, [line & PIXEL_ROW_MASK])
            }
            Command::SetDisplayMode(mode) => ok_command!(
                arg_buf,
                match mode {
                    DisplayMode::Normal => Opcode::DisplayModeNormal,
                    DisplayMode::AllOn => Opcode::DisplayModeAllOn,
                    DisplayMode::AllOff => Opcode::DisplayModeAllOff,
                    DisplayMode::Inverse => Opcode::DisplayModeInverse,
                },
                []
            ),
            Command::SetMuxRatio(ratio) => ok_command!(
                arg_buf,
                Opcode::SetMuxRatio,
                [ratio.wrapping_sub(1) & PIXEL_ROW_MASK]
            ),
            Command::SetVddRegulator(ena) => {
                ok_command!(arg_buf, Opcode::SetVddRegulator, [ena as u8])
            }
            Command::SetSleepMode(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => Opcode::SleepModeOn,
                    false => Opcode::SleepModeOff,
                },
                []
            ),
            Command::SetPhaseLengths(reset, first_precharge) => {
                let p1 = reset & 0x0F;
                let p2 = (first_precharge & 0x0F) << 4;
                ok_command!(arg_buf, Opcode::SetPhaseLength, [p1 | p2])
            }
            Command::NoOp => ok_command!(arg_buf, Opcode::NoOp, []),
            Command::SetClock(fosc, divider) => ok_command!(
                arg_buf,
                Opcode::SetClock,
                [(fosc & 0x0F) << 4 | (divider & 0x0F)]
            ),
            Command::SetGpio(mode) => {
                let m = match mode {
                    GpioMode::InputDisabled => 0b00,
                    GpioMode::InputEnabled => 0b01,
                    GpioMode::OutputLow => 0b10,
                    GpioMode::OutputHigh => 0b11,
                };
                ok_command!(arg_buf, Opcode::SetGpio, [m])
            }
            Command::SetSecondPrechargePeriod(period) => ok_command!(
                arg_buf,
                Opcode::SetSecondPrechargePeriod,
                [period.max(1) & 0x0F]
            ),
            Command::SetGrayScaleTable(levels) => {
                for (slot, level) in arg_buf.iter_mut().zip(levels.iter()) {
                    *slot = level & 0x3F;
                }
                (Opcode::SetGrayScaleTable, &arg_buf[..])
            }
            Command::SetDefaultGrayScaleTable => {
                ok_command!(arg_buf, Opcode::SetDefaultGrayScaleTable, [])
            }
            Command::SetPreChargeVoltage(voltage) => {
                ok_command!(arg_buf, Opcode::SetPreChargeVoltage, [voltage & 0x0F])
            }
            Command::SetComDeselectVoltage(voltage) => {
                ok_command!(arg_buf, Opcode::SetComDeselectVoltage, [voltage & 0x07])
            }
            Command::SetFunctionSelectionB(second_precharge, internal_vsl) => {
                let sp = match second_precharge {
                    true => 0b10,
                    false => 0b00,
                };
                let vsl = match internal_vsl {
                    true => 0b01,
                    false => 0b00,
                };
                ok_command!(arg_buf, Opcode::SetFunctionSelectionB, [0x60 | sp | vsl])
            }
            Command::SetCommandLock(ena) => {
                let e = match ena {
                    true => 0x16,
                    false => 0x12,
                };
                ok_command!(arg_buf, Opcode::SetCommandLock, [e])
            }
        };
        iface.send_command(cmd.into(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::TestSpyInterface;

    #[test]
    fn set_column_address() {
        let mut di = TestSpyInterface::new();
        Command::SetColumnAddress(23, 42).send(&mut di).unwrap();
        di.check(0x15, &[23, 42]);
        // Masked to 6 bits, never rejected.
        Command::SetColumnAddress(0x7F, 0x80).send(&mut di).unwrap();
        di.check(0x15, &[0x3F, 0x00]);
    }

    #[test]
    fn set_row_address() {
        let mut di = TestSpyInterface::new();
        Command::SetRowAddress(23, 42).send(&mut di).unwrap();
        di.check(0x75, &[23, 42]);
        Command::SetRowAddress(128, 255).send(&mut di).unwrap();
        di.check(0x75, &[0, 127]);
    }

    #[test]
    fn set_contrast() {
        let mut di = TestSpyInterface::new();
        Command::SetContrast(0xFF).send(&mut di).unwrap();
        di.check(0x81, &[0xFF]);
    }

    #[test]
    fn set_remapping() {
        let mut di = TestSpyInterface::new();
        Command::SetRemapping(
            IncrementAxis::Horizontal,
            ColumnRemap::Forward,
            NibbleRemap::Forward,
            ComScanDirection::RowZeroFirst,
            ComLayout::Progressive,
        )
        .send(&mut di)
        .unwrap();
        di.check(0xA0, &[0x00]);

        Command::SetRemapping(
            IncrementAxis::Vertical,
            ColumnRemap::Reverse,
            NibbleRemap::Reverse,
            ComScanDirection::RowZeroLast,
            ComLayout::OddEvenSplit,
        )
        .send(&mut di)
        .unwrap();
        di.check(0xA0, &[0x57]);

        // Power-on layout of the common 128x128 modules.
        Command::SetRemapping(
            IncrementAxis::Horizontal,
            ColumnRemap::Reverse,
            NibbleRemap::Forward,
            ComScanDirection::RowZeroLast,
            ComLayout::OddEvenSplit,
        )
        .send(&mut di)
        .unwrap();
        di.check(0xA0, &[0x51]);
    }

    #[test]
    fn set_start_line() {
        let mut di = TestSpyInterface::new();
        Command::SetStartLine(23).send(&mut di).unwrap();
        di.check(0xA1, &[23]);
        Command::SetStartLine(128).send(&mut di).unwrap();
        di.check(0xA1, &[0]);
    }

    #[test]
    fn set_display_offset() {
        let mut di = TestSpyInterface::new();
        Command::SetDisplayOffset(23).send(&mut di).unwrap();
        di.check(0xA2, &[23]);
        Command::SetDisplayOffset(0xFF).send(&mut di).unwrap();
        di.check(0xA2, &[0x7F]);
    }

    #[test]
    fn set_display_mode() {
        let mut di = TestSpyInterface::new();
        Command::SetDisplayMode(DisplayMode::Normal)
            .send(&mut di)
            .unwrap();
        di.check(0xA4, &[]);
        Command::SetDisplayMode(DisplayMode::AllOn)
            .send(&mut di)
            .unwrap();
        di.check(0xA5, &[]);
        Command::SetDisplayMode(DisplayMode::AllOff)
            .send(&mut di)
            .unwrap();
        di.check(0xA6, &[]);
        Command::SetDisplayMode(DisplayMode::Inverse)
            .send(&mut di)
            .unwrap();
        di.check(0xA7, &[]);
    }

    #[test]
    fn set_mux_ratio() {
        let mut di = TestSpyInterface::new();
        Command::SetMuxRatio(128).send(&mut di).unwrap();
        di.check(0xA8, &[127]);
        Command::SetMuxRatio(16).send(&mut di).unwrap();
        di.check(0xA8, &[15]);
    }

    #[test]
    fn sleep_mode() {
        let mut di = TestSpyInterface::new();
        Command::SetSleepMode(true).send(&mut di).unwrap();
        di.check(0xAE, &[]);
        Command::SetSleepMode(false).send(&mut di).unwrap();
        di.check(0xAF, &[]);
    }

    #[test]
    fn set_phase_lengths() {
        let mut di = TestSpyInterface::new();
        Command::SetPhaseLengths(1, 15).send(&mut di).unwrap();
        di.check(0xB1, &[0xF1]);
        Command::SetPhaseLengths(2, 3).send(&mut di).unwrap();
        di.check(0xB1, &[0x32]);
        Command::SetPhaseLengths(0x12, 0x34).send(&mut di).unwrap();
        di.check(0xB1, &[0x42]);
    }

    #[test]
    fn set_clock() {
        let mut di = TestSpyInterface::new();
        Command::SetClock(15, 0).send(&mut di).unwrap();
        di.check(0xB3, &[0xF0]);
        Command::SetClock(0x17, 0x1A).send(&mut di).unwrap();
        di.check(0xB3, &[0x7A]);
    }

    #[test]
    fn set_gpio() {
        let mut di = TestSpyInterface::new();
        Command::SetGpio(GpioMode::InputDisabled)
            .send(&mut di)
            .unwrap();
        di.check(0xB5, &[0b00]);
        Command::SetGpio(GpioMode::OutputHigh)
            .send(&mut di)
            .unwrap();
        di.check(0xB5, &[0b11]);
    }

    #[test]
    fn set_second_precharge_period() {
        let mut di = TestSpyInterface::new();
        Command::SetSecondPrechargePeriod(4).send(&mut di).unwrap();
        di.check(0xB6, &[4]);
        Command::SetSecondPrechargePeriod(0).send(&mut di).unwrap();
        di.check(0xB6, &[1]);
        Command::SetSecondPrechargePeriod(0x1F).send(&mut di).unwrap();
        di.check(0xB6, &[0x0F]);
    }

    #[test]
    fn set_gray_scale_table() {
        let mut di = TestSpyInterface::new();
        let table = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0xFF];
        Command::SetGrayScaleTable(table).send(&mut di).unwrap();
        di.check(0xB8, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0x3F]);
        Command::SetDefaultGrayScaleTable.send(&mut di).unwrap();
        di.check(0xB9, &[]);
    }

    #[test]
    fn set_voltages() {
        let mut di = TestSpyInterface::new();
        Command::SetPreChargeVoltage(5).send(&mut di).unwrap();
        di.check(0xBC, &[5]);
        Command::SetPreChargeVoltage(0x18).send(&mut di).unwrap();
        di.check(0xBC, &[0x08]);
        Command::SetComDeselectVoltage(5).send(&mut di).unwrap();
        di.check(0xBE, &[5]);
        Command::SetComDeselectVoltage(9).send(&mut di).unwrap();
        di.check(0xBE, &[1]);
    }

    #[test]
    fn set_function_selection_b() {
        let mut di = TestSpyInterface::new();
        Command::SetFunctionSelectionB(true, false)
            .send(&mut di)
            .unwrap();
        di.check(0xD5, &[0x62]);
        Command::SetFunctionSelectionB(false, true)
            .send(&mut di)
            .unwrap();
        di.check(0xD5, &[0x61]);
    }

    #[test]
    fn set_vdd_regulator() {
        let mut di = TestSpyInterface::new();
        Command::SetVddRegulator(true).send(&mut di).unwrap();
        di.check(0xAB, &[1]);
        Command::SetVddRegulator(false).send(&mut di).unwrap();
        di.check(0xAB, &[0]);
    }

    #[test]
    fn set_command_lock() {
        let mut di = TestSpyInterface::new();
        Command::SetCommandLock(true).send(&mut di).unwrap();
        di.check(0xFD, &[0b00010110]);
        Command::SetCommandLock(false).send(&mut di).unwrap();
        di.check(0xFD, &[0b00010010]);
    }

    #[test]
    fn no_op() {
        let mut di = TestSpyInterface::new();
        Command::NoOp.send(&mut di).unwrap();
        di.check(0xB2, &[]);
    }

    #[test]
    fn failure_is_propagated() {
        let mut di = TestSpyInterface::new();
        di.fail_frame(0, 0x04);
        assert_eq!(
            Command::SetContrast(1).send(&mut di).unwrap_err().code(),
            0x04
        );
    }
}
