//! Device Discovery Adapter - bind hardware-description nodes to the driver
//!
//! Validation happens against the node's declared properties before any
//! mapping or register access: a node with the wrong window size or no
//! `clocks` property is rejected without touching hardware or allocating an
//! instance.

use alloc::boxed::Box;
use log::{error, info};

use serial::{DeviceNode, DeviceType, DiscoveryError, MapMmio, SerialChip, SerialDriver};

use crate::regs::UART_DT_REG_SIZE;
use crate::uart::CaUart;

/// Match table for the hardware-description tree.
pub const COMPATIBLE: &[&str] = &["cortina-access,serial"];

/// Baud rate discovered consoles are brought up at.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Discovery-side driver for the Cortina Access UART.
pub struct CaUartDriver;

impl SerialDriver for CaUartDriver {
    fn name(&self) -> &'static str {
        "ca-uart"
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Uart
    }

    fn compatible(&self) -> &'static [&'static str] {
        COMPATIBLE
    }

    fn probe(
        &self,
        node: &DeviceNode,
        mmio: &mut dyn MapMmio,
    ) -> core::result::Result<Box<dyn SerialChip>, DiscoveryError> {
        let window = node.reg.ok_or_else(|| {
            error!("ca-uart: {} carries no register window", node.name);
            DiscoveryError::NoRegWindow
        })?;

        if window.size != UART_DT_REG_SIZE {
            error!("ca-uart: unexpected register size: {:#x}", window.size);
            return Err(DiscoveryError::BadRegSize { size: window.size });
        }

        // The baud divisor cannot be computed without the input clock.
        let clock_hz = node.clock_hz.ok_or_else(|| {
            error!("ca-uart: clock not found for {}", node.name);
            DiscoveryError::MissingClock
        })?;
        info!("ca-uart: {} clock is {} Hz", node.name, clock_hz);

        let regs = mmio.map_device(window.paddr, window.size)?;

        let mut uart = Box::new(CaUart::new(regs));
        uart.init(clock_hz, DEFAULT_BAUD_RATE);
        Ok(uart)
    }
}
