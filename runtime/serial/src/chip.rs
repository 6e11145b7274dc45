//! Serial Chip Capability - the operation set a console expects
//!
//! A `dyn SerialChip` is the capability handle: the console subsystem holds
//! one and dispatches without knowing the concrete UART type. Recovering the
//! owning driver instance is the vtable's job; there is no structural
//! back-reference to compute.

/// The serial-device capability.
///
/// Exactly the operations a polled console needs. All blocking operations
/// busy-wait on hardware status with no timeout; callers must only invoke
/// them where indefinite blocking is acceptable.
pub trait SerialChip: Send {
    /// Wait until the transmit FIFO drains, or until the UART is disabled
    /// out from under us by another execution context.
    fn flush(&mut self);

    /// Write one byte, waiting for transmit FIFO space first.
    fn putc(&mut self, ch: u8);

    /// Read one byte, waiting until receive data is available.
    fn getchar(&mut self) -> u8;

    /// Non-blocking probe: is there receive data pending? No side effects.
    fn have_rx_data(&self) -> bool;

    /// Unmask the receive interrupt sources. This is a register toggle only;
    /// no interrupt dispatch happens at this layer.
    fn rx_intr_enable(&mut self);

    /// Mask the receive interrupt sources, leaving transmit sources alone.
    fn rx_intr_disable(&mut self);
}
