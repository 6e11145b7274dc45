//! Cortina Access UART Driver
//!
//! Polled, memory-mapped driver for the UART block found on Cortina Access
//! SoCs, exposed through the generic [`serial::SerialChip`] capability.
//!
//! # Design
//! - All register access goes through the [`regs`] model; no raw offsets or
//!   masks appear anywhere else.
//! - Every blocking operation is a busy-wait on a FIFO status bit with no
//!   timeout. This is early-boot code; no timer service is assumed.
//! - The driver performs no locking. One logical owner per instance;
//!   concurrent configuration from a second core needs external
//!   synchronization (the console slot in `serial` provides it for the
//!   common case).
//!
//! # Testing
//! Unit tests run the driver against `serial::testing::FakeRegs`;
//! `tests/integration_test.rs` covers the discovery-to-putc path.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

pub mod regs;

mod probe;
mod uart;

pub use probe::{CaUartDriver, COMPATIBLE, DEFAULT_BAUD_RATE};
pub use uart::{CaUart, LineFormat, SUPPORTED_BAUD_RATES};
