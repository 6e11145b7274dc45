//! Register Model - Cortina Access UART register layout
//!
//! Byte offsets and bit fields for the 0x30-byte UART register window,
//! transcribed from the SoC datasheet. This module has no behavior; it is
//! the single place the layout can be checked against the hardware.
//!
//! Every other module uses these symbols exclusively. No raw register
//! literals belong outside this file.

use bitflags::bitflags;
use static_assertions::{const_assert, const_assert_eq};

/// Config register: line format, enables, and the baud divisor field.
pub const UCFG: usize = 0x00;
/// Flow control register (unused by this driver; no flow control).
pub const UFC: usize = 0x04;
/// RX oversampling-rate register.
pub const URX_SAMPLE: usize = 0x08;
/// Fine tune of the UART clock.
pub const URT_TUNE: usize = 0x0C;
/// TX character data.
pub const UTX_DATA: usize = 0x10;
/// RX character data.
pub const URX_DATA: usize = 0x14;
/// FIFO status.
pub const UINFO: usize = 0x18;
/// Interrupt enable.
pub const UINT_EN: usize = 0x1C;
/// Interrupt setting/clearing.
pub const UINT_CLR: usize = 0x24;
/// Interrupt status.
pub const UINT_STAT: usize = 0x2C;

/// Span of meaningful registers.
pub const UART_REG_SIZE: usize = 0x30;

/// Window size the hardware description declares for this block. Larger
/// than [`UART_REG_SIZE`]; the datasheet reserves the remainder. Discovery
/// validates against this value, the driver only ever touches the first
/// 0x30 bytes.
pub const UART_DT_REG_SIZE: usize = 0x1000;

/// The baud divisor occupies the config register above the low 8 bits.
pub const CFG_BAUD_SHIFT: u32 = 8;
/// Mask of the low configuration bits, below the baud divisor field.
pub const CFG_LOW_BITS: u32 = 0xff;

/// Character width is a 2-bit field at the bottom of the config register:
/// values 0-3 encode 5-8 data bits.
pub const CFG_WL_MASK: u32 = 0x3;
pub const CFG_WL_5: u32 = 0;
pub const CFG_WL_6: u32 = 1;
pub const CFG_WL_7: u32 = 2;
pub const CFG_WL_8: u32 = 3;

bitflags! {
    /// Config register bits below the baud divisor field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Cfg: u32 {
        const UART_EN    = 1 << 7;
        const RX_EN      = 1 << 6;
        const TX_EN      = 1 << 5;
        const PARITY_EN  = 1 << 4;
        const PARITY_SEL = 1 << 3;
        const STOP_2BIT  = 1 << 2;
    }

    /// FIFO status bits in the info register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Info: u32 {
        const TX_EMPTY = 1 << 3;
        const TX_FULL  = 1 << 2;
        const RX_EMPTY = 1 << 1;
        const RX_FULL  = 1 << 0;
    }

    /// Interrupt-enable register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntEn: u32 {
        const RX_NON_EMPTY  = 1 << 6;
        const TX_EMPTY      = 1 << 5;
        const RX_UNDERRUN   = 1 << 4;
        const RX_OVERRUN    = 1 << 3;
        const RX_PARITY_ERR = 1 << 2;
        const RX_STOP_ERR   = 1 << 1;
        const TX_OVERRUN    = 1 << 0;

        const RX_ALL = Self::RX_NON_EMPTY.bits()
            | Self::RX_UNDERRUN.bits()
            | Self::RX_OVERRUN.bits()
            | Self::RX_PARITY_ERR.bits()
            | Self::RX_STOP_ERR.bits();
        const TX_ALL = Self::TX_EMPTY.bits() | Self::TX_OVERRUN.bits();
        const MASK_ALL = 0x7f;
    }
}

// Layout invariants checked once, at compile time.
const_assert!(UINT_STAT + 4 <= UART_REG_SIZE);
const_assert!(UART_REG_SIZE <= UART_DT_REG_SIZE);
const_assert_eq!(IntEn::RX_ALL.bits(), 0x5e);
const_assert_eq!(IntEn::TX_ALL.bits(), 0x21);
const_assert_eq!(IntEn::RX_ALL.bits() & IntEn::TX_ALL.bits(), 0);
const_assert_eq!(
    IntEn::RX_ALL.bits() | IntEn::TX_ALL.bits(),
    IntEn::MASK_ALL.bits()
);
