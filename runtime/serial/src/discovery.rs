//! Device Discovery - match hardware-description nodes to serial drivers
//!
//! The platform hands us a [`DeviceNode`] distilled from its hardware
//! description (device tree or equivalent); the registry finds a driver
//! whose match table carries one of the node's compatible strings and asks
//! it to probe. Probing allocates the driver instance and returns the
//! [`SerialChip`] capability ready for console registration.
//!
//! No retries happen at this layer; a rejected node is reported upward as a
//! discrete [`DiscoveryError`] and the discovery subsystem above decides
//! what to do with it.

use alloc::boxed::Box;
use alloc::vec::Vec;
use thiserror::Error;

use crate::chip::SerialChip;
use crate::io::{MapError, MapMmio};

/// Device class a driver matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Uart,
}

/// A device's register window as declared by the hardware description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWindow {
    pub paddr: usize,
    pub size: usize,
}

/// A hardware-description node, as supplied by the platform.
///
/// This is deliberately a plain value type: parsing the platform's actual
/// description format (FDT blob, ACPI table) is the platform's business.
#[derive(Debug, Clone, Copy)]
pub struct DeviceNode<'a> {
    pub name: &'a str,
    pub device_type: DeviceType,
    pub compatible: &'a [&'a str],
    pub reg: Option<RegWindow>,
    /// Input clock frequency in Hz, from the node's `clocks` property.
    pub clock_hz: Option<u32>,
}

/// Discovery failures, reported upward as discrete results.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("no driver matches the node")]
    NoMatch,

    #[error("node carries no register window")]
    NoRegWindow,

    #[error("unexpected register window size: {size:#x}")]
    BadRegSize { size: usize },

    #[error("missing clocks property")]
    MissingClock,

    #[error("mapping failed: {0}")]
    MapFailed(#[from] MapError),
}

/// Discovery-side driver interface.
///
/// One implementation per UART hardware type. `probe` validates the node,
/// maps its window through the collaborator, allocates an instance, and
/// initializes the hardware before handing back the capability.
pub trait SerialDriver: Sync {
    fn name(&self) -> &'static str;

    fn device_type(&self) -> DeviceType;

    /// Match table: compatible strings this driver binds to.
    fn compatible(&self) -> &'static [&'static str];

    fn probe(
        &self,
        node: &DeviceNode,
        mmio: &mut dyn MapMmio,
    ) -> core::result::Result<Box<dyn SerialChip>, DiscoveryError>;
}

/// Registry of known serial drivers.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<&'static dyn SerialDriver>,
}

impl DriverRegistry {
    pub const fn new() -> Self {
        Self { drivers: Vec::new() }
    }

    pub fn register(&mut self, driver: &'static dyn SerialDriver) {
        log::debug!("serial: registered driver {}", driver.name());
        self.drivers.push(driver);
    }

    /// Find the first driver whose match table covers the node.
    pub fn find(&self, node: &DeviceNode) -> Option<&'static dyn SerialDriver> {
        self.drivers
            .iter()
            .copied()
            .find(|driver| {
                driver.device_type() == node.device_type
                    && node
                        .compatible
                        .iter()
                        .any(|compat| driver.compatible().contains(compat))
            })
    }

    /// Match the node and delegate to the driver's probe.
    pub fn probe_node(
        &self,
        node: &DeviceNode,
        mmio: &mut dyn MapMmio,
    ) -> core::result::Result<Box<dyn SerialChip>, DiscoveryError> {
        let driver = self.find(node).ok_or(DiscoveryError::NoMatch)?;
        driver.probe(node, mmio)
    }
}
