//! Console - the subsystem consuming the serial capability
//!
//! One global slot holds whichever [`SerialChip`] the platform registered,
//! behind a spinlock so early-boot logging from any context is serialized.
//! Output is polled and blocking; if no chip is registered yet, output is
//! dropped rather than buffered.

use alloc::boxed::Box;
use core::fmt;
use spin::Mutex;

use crate::chip::SerialChip;

static CONSOLE: Mutex<Option<Box<dyn SerialChip>>> = Mutex::new(None);

/// Register a chip as the system console.
///
/// Returns the previously registered chip, if any, so the caller can tear
/// it down (a later-discovered UART may replace the static boot console).
pub fn register(chip: Box<dyn SerialChip>) -> Option<Box<dyn SerialChip>> {
    CONSOLE.lock().replace(chip)
}

pub fn is_registered() -> bool {
    CONSOLE.lock().is_some()
}

/// Write one raw byte. No newline translation.
pub fn putc(ch: u8) {
    if let Some(chip) = CONSOLE.lock().as_mut() {
        chip.putc(ch);
    }
}

/// Write a string, expanding LF to CRLF for raw terminals.
pub fn puts(s: &str) {
    if let Some(chip) = CONSOLE.lock().as_mut() {
        for ch in s.bytes() {
            if ch == b'\n' {
                chip.putc(b'\r');
            }
            chip.putc(ch);
        }
    }
}

/// Drain the transmit FIFO. Blocking, no timeout.
pub fn flush() {
    if let Some(chip) = CONSOLE.lock().as_mut() {
        chip.flush();
    }
}

pub fn have_rx_data() -> bool {
    CONSOLE
        .lock()
        .as_ref()
        .map(|chip| chip.have_rx_data())
        .unwrap_or(false)
}

/// Blocking read of one byte. `None` only when no console is registered.
///
/// Holds the console lock for the whole wait; do not call concurrently with
/// output from another context.
pub fn getchar() -> Option<u8> {
    CONSOLE.lock().as_mut().map(|chip| chip.getchar())
}

/// `core::fmt::Write` adapter for `write!`-style early-boot logging.
pub struct ConsoleWriter;

impl fmt::Write for ConsoleWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        puts(s);
        Ok(())
    }
}
