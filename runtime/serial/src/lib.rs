//! Serial Runtime - Generic serial-device capability and discovery interface
//!
//! # Purpose
//! Hides concrete UART hardware behind a small fixed operation set so the
//! console subsystem can hold a single polymorphic handle. Drivers implement
//! [`SerialChip`] for character I/O and [`SerialDriver`] for device-tree
//! style discovery; the platform supplies register windows through the
//! [`MapMmio`] collaborator.
//!
//! # Integration Points
//! - Depends on: nothing hardware-specific
//! - Provides to: console subsystem, platform bring-up, UART drivers
//! - Capabilities required: a mapped register window per driver instance
//!
//! # Concurrency
//! The drivers behind this interface are polled, blocking, and perform no
//! internal locking. A [`SerialChip`] has a single logical owner; if two
//! execution contexts can reach the same instance, the owner must serialize
//! them (the console slot does this with a spinlock). Blocking operations
//! busy-wait with no timeout by contract.
//!
//! # Testing Strategy
//! - Unit tests: registry matching, console registration, MMIO bounds
//! - Fake backend: [`testing::FakeRegs`] models FIFO drain for drivers

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

mod chip;
mod discovery;
mod io;

pub mod console;
pub mod testing;

pub use chip::SerialChip;
pub use discovery::{
    DeviceNode, DeviceType, DiscoveryError, DriverRegistry, RegWindow, SerialDriver,
};
pub use io::{MapError, MapMmio, MmioRegion, RegIo};

pub type Result<T> = core::result::Result<T, DiscoveryError>;
