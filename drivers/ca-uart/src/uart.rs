//! UART Driver Core - register protocol for one hardware instance

use serial::{RegIo, SerialChip};

use crate::regs::{
    Cfg, Info, IntEn, CFG_BAUD_SHIFT, CFG_LOW_BITS, CFG_WL_8, CFG_WL_MASK, UCFG, UINFO, UINT_EN,
    URX_DATA, URX_SAMPLE, UTX_DATA,
};

/// Baud rates the divisor table supports.
pub const SUPPORTED_BAUD_RATES: [u32; 5] = [9600, 19_200, 38_400, 57_600, 115_200];

/// Any other requested rate degrades to this one. Documented behavior of
/// the hardware bring-up code, not a failure.
const FALLBACK_BAUD_RATE: u32 = 38_400;

/// Line format policy. The hardware can do more; this driver cannot.
/// Nothing in the surrounding system ever runs the console at another
/// format, so the option set is deliberately closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// 8 data bits, no parity, 1 stop bit.
    #[default]
    Format8N1,
}

/// One Cortina Access UART instance.
///
/// Owns its register window (`R` is [`serial::MmioRegion`] on hardware, the
/// fake backend in tests), so distinct instances cannot alias one window.
/// States are "unconfigured" and "initialized"; re-running [`CaUart::init`]
/// is the only way back to a known-good configuration.
pub struct CaUart<R: RegIo> {
    regs: R,
    baud_rate: u32,
}

impl<R: RegIo> CaUart<R> {
    /// Wrap a register window. The hardware is not touched until `init`.
    pub const fn new(regs: R) -> Self {
        Self { regs, baud_rate: 0 }
    }

    /// Last configured baud rate; 0 until `init` programs one.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Borrow the register backend (used by tests to inspect state).
    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// One-time hardware bring-up.
    ///
    /// Masks all TX then RX interrupt sources so nothing from a previous
    /// configuration can leak into this session, programs the baud divisor
    /// when both `clock_hz` and `baud_rate` are nonzero, forces 8N1, enables
    /// UART/TX/RX in one final write (no partial-enable window is ever
    /// observable), and flushes stale output.
    ///
    /// Cannot fail: the register window was already resolved by the caller,
    /// and an unsupported baud rate degrades to the 38400 divisor rather
    /// than erroring.
    pub fn init(&mut self, clock_hz: u32, baud_rate: u32) {
        let mut ie = IntEn::from_bits_retain(self.regs.read32(UINT_EN));
        ie.remove(IntEn::TX_ALL);
        self.regs.write32(UINT_EN, ie.bits());

        let mut ie = IntEn::from_bits_retain(self.regs.read32(UINT_EN));
        ie.remove(IntEn::RX_ALL);
        self.regs.write32(UINT_EN, ie.bits());

        if clock_hz != 0 && baud_rate != 0 {
            let divisor = clock_hz / effective_rate(baud_rate);
            self.baud_rate = baud_rate;

            // The divisor lives above the low 8 config bits.
            let cfg = self.regs.read32(UCFG) & CFG_LOW_BITS;
            self.regs.write32(UCFG, cfg | (divisor << CFG_BAUD_SHIFT));

            // Sampling rate is half the baud count on this block.
            self.regs.write32(URX_SAMPLE, divisor / 2);
        }

        self.set_line_format(LineFormat::Format8N1);

        let cfg = self.regs.read32(UCFG);
        self.regs.write32(
            UCFG,
            cfg | (Cfg::UART_EN | Cfg::TX_EN | Cfg::RX_EN).bits(),
        );

        self.flush();
    }

    fn set_line_format(&mut self, format: LineFormat) {
        let LineFormat::Format8N1 = format;
        let mut cfg = self.regs.read32(UCFG);
        cfg = (cfg & !CFG_WL_MASK) | CFG_WL_8;
        cfg &= !(Cfg::STOP_2BIT | Cfg::PARITY_EN).bits();
        self.regs.write32(UCFG, cfg);
    }

    /// Wait for the transmit FIFO to drain. Blocking, no timeout.
    ///
    /// Re-reads the enable bits every iteration: another execution context
    /// (the non-secure world owns this console too) may disable the UART
    /// mid-wait, and spinning on a dead transmitter would never end.
    pub fn flush(&mut self) {
        loop {
            let cfg = Cfg::from_bits_retain(self.regs.read32(UCFG));
            if !cfg.intersects(Cfg::UART_EN | Cfg::TX_EN | Cfg::RX_EN) {
                break;
            }
            let info = Info::from_bits_retain(self.regs.read32(UINFO));
            if info.contains(Info::TX_EMPTY) {
                break;
            }
            core::hint::spin_loop();
        }
    }

    /// Write one byte, waiting for the transmitter to accept it first.
    pub fn putc(&mut self, ch: u8) {
        while !Info::from_bits_retain(self.regs.read32(UINFO)).contains(Info::TX_EMPTY) {
            core::hint::spin_loop();
        }
        self.regs.write32(UTX_DATA, ch as u32);
    }

    /// Blocking read of one byte; returns the low 8 data bits.
    pub fn getchar(&mut self) -> u8 {
        while !self.have_rx_data() {
            core::hint::spin_loop();
        }
        (self.regs.read32(URX_DATA) & 0xff) as u8
    }

    /// Non-blocking probe of the receive FIFO. No side effects.
    pub fn have_rx_data(&self) -> bool {
        !Info::from_bits_retain(self.regs.read32(UINFO)).contains(Info::RX_EMPTY)
    }

    /// Unmask the RX interrupt sources, leaving TX sources untouched.
    pub fn rx_intr_enable(&mut self) {
        let mut ie = IntEn::from_bits_retain(self.regs.read32(UINT_EN));
        ie.insert(IntEn::RX_ALL);
        self.regs.write32(UINT_EN, ie.bits());
    }

    /// Mask the RX interrupt sources, leaving TX sources untouched.
    pub fn rx_intr_disable(&mut self) {
        let mut ie = IntEn::from_bits_retain(self.regs.read32(UINT_EN));
        ie.remove(IntEn::RX_ALL);
        self.regs.write32(UINT_EN, ie.bits());
    }
}

fn effective_rate(baud_rate: u32) -> u32 {
    if SUPPORTED_BAUD_RATES.contains(&baud_rate) {
        baud_rate
    } else {
        FALLBACK_BAUD_RATE
    }
}

impl<R: RegIo + Send> SerialChip for CaUart<R> {
    fn flush(&mut self) {
        CaUart::flush(self)
    }

    fn putc(&mut self, ch: u8) {
        CaUart::putc(self, ch)
    }

    fn getchar(&mut self) -> u8 {
        CaUart::getchar(self)
    }

    fn have_rx_data(&self) -> bool {
        CaUart::have_rx_data(self)
    }

    fn rx_intr_enable(&mut self) {
        CaUart::rx_intr_enable(self)
    }

    fn rx_intr_disable(&mut self) {
        CaUart::rx_intr_disable(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial::testing::FakeRegs;

    /// A fake window whose TX FIFO already reports empty, so init's
    /// trailing flush terminates.
    fn idle_regs() -> FakeRegs {
        let regs = FakeRegs::new();
        regs.set_reg(UINFO, Info::TX_EMPTY.bits());
        regs
    }

    fn init_uart(clock_hz: u32, baud_rate: u32) -> CaUart<FakeRegs> {
        let mut uart = CaUart::new(idle_regs());
        uart.init(clock_hz, baud_rate);
        uart
    }

    #[test]
    fn test_divisor_for_all_supported_rates() {
        let clock_hz = 19_200_000;
        for rate in SUPPORTED_BAUD_RATES {
            let uart = init_uart(clock_hz, rate);
            let cfg = uart.regs().reg(UCFG);
            assert_eq!(cfg >> CFG_BAUD_SHIFT, clock_hz / rate, "rate {rate}");
            assert_eq!(
                uart.regs().reg(URX_SAMPLE),
                (clock_hz / rate) / 2,
                "rate {rate}"
            );
            assert_eq!(uart.baud_rate(), rate);
        }
    }

    #[test]
    fn test_unsupported_rate_degrades_to_38400() {
        let uart = init_uart(19_200_000, 14_400);
        assert_eq!(uart.regs().reg(UCFG) >> CFG_BAUD_SHIFT, 19_200_000 / 38_400);
        assert_eq!(uart.regs().reg(URX_SAMPLE), (19_200_000 / 38_400) / 2);
        // The requested rate is still what the instance reports.
        assert_eq!(uart.baud_rate(), 14_400);
    }

    #[test]
    fn test_zero_clock_or_rate_skips_divisor() {
        for (clock_hz, rate) in [(0, 115_200), (19_200_000, 0), (0, 0)] {
            let uart = init_uart(clock_hz, rate);
            assert!(uart.regs().writes_to(URX_SAMPLE).is_empty());
            assert_eq!(uart.baud_rate(), 0);
        }
    }

    #[test]
    fn test_init_masks_tx_then_rx_interrupts_first() {
        let regs = idle_regs();
        regs.set_reg(UINT_EN, IntEn::MASK_ALL.bits());
        let mut uart = CaUart::new(regs);
        uart.init(19_200_000, 115_200);

        let ie_writes = uart.regs().writes_to(UINT_EN);
        assert_eq!(ie_writes[0], IntEn::RX_ALL.bits()); // TX sources cleared
        assert_eq!(ie_writes[1], 0); // then RX sources
        // And they happen before anything touches the config register.
        let writes = uart.regs().writes();
        assert_eq!(writes[0].0, UINT_EN);
        assert_eq!(writes[1].0, UINT_EN);
    }

    #[test]
    fn test_init_leaves_uart_enabled_in_8n1() {
        let regs = idle_regs();
        // Stale configuration from a previous session: parity on, 2 stop
        // bits, 6 data bits.
        regs.set_reg(
            UCFG,
            (Cfg::PARITY_EN | Cfg::STOP_2BIT).bits() | crate::regs::CFG_WL_6,
        );
        let mut uart = CaUart::new(regs);
        uart.init(19_200_000, 115_200);

        let cfg = uart.regs().reg(UCFG);
        let bits = Cfg::from_bits_retain(cfg);
        assert!(bits.contains(Cfg::UART_EN | Cfg::TX_EN | Cfg::RX_EN));
        assert!(!bits.contains(Cfg::PARITY_EN));
        assert!(!bits.contains(Cfg::STOP_2BIT));
        assert_eq!(cfg & CFG_WL_MASK, CFG_WL_8);
    }

    #[test]
    fn test_enable_bits_set_in_single_write() {
        let uart = init_uart(19_200_000, 115_200);
        let enables = (Cfg::UART_EN | Cfg::TX_EN | Cfg::RX_EN).bits();
        let cfg_writes = uart.regs().writes_to(UCFG);

        // No write may set a strict subset of the enable bits.
        for value in &cfg_writes {
            let set = value & enables;
            assert!(set == 0 || set == enables, "partial enable: {value:#x}");
        }
        assert_eq!(cfg_writes.last().unwrap() & enables, enables);
    }

    #[test]
    fn test_have_rx_data_tracks_rx_empty_bit() {
        let regs = FakeRegs::new();
        regs.set_reg(UINFO, Info::RX_EMPTY.bits());
        let uart = CaUart::new(regs);
        assert!(!uart.have_rx_data());

        uart.regs().set_reg(UINFO, 0);
        assert!(uart.have_rx_data());

        // Other status bits must not influence the probe.
        uart.regs()
            .set_reg(UINFO, (Info::TX_EMPTY | Info::RX_FULL).bits());
        assert!(uart.have_rx_data());

        // Probe is read-only.
        assert_eq!(uart.regs().total_writes(), 0);
    }

    #[test]
    fn test_putc_waits_for_tx_empty() {
        let regs = FakeRegs::new();
        regs.set_reg(UINFO, 0); // transmitter busy
        regs.on_nth_read(UINFO, 3, Info::TX_EMPTY.bits(), 0);
        let mut uart = CaUart::new(regs);

        uart.putc(b'Z');

        assert_eq!(uart.regs().writes_to(UTX_DATA), vec![b'Z' as u32]);
        // 3 reads of a busy FIFO, then one observing empty.
        assert_eq!(uart.regs().read_count(UINFO), 4);
    }

    #[test]
    fn test_flush_blocks_until_tx_drains() {
        let regs = FakeRegs::new();
        regs.set_reg(UCFG, Cfg::UART_EN.bits());
        regs.set_reg(UINFO, 0);
        regs.on_nth_read(UINFO, 5, Info::TX_EMPTY.bits(), 0);
        let mut uart = CaUart::new(regs);

        uart.flush();

        assert_eq!(uart.regs().read_count(UINFO), 6);
        assert_eq!(uart.regs().total_writes(), 0);
    }

    #[test]
    fn test_flush_escapes_when_uart_disabled() {
        let regs = FakeRegs::new();
        regs.set_reg(UCFG, 0); // all enable bits clear
        regs.set_reg(UINFO, 0); // FIFO never drains
        let mut uart = CaUart::new(regs);

        uart.flush(); // must return

        assert_eq!(uart.regs().read_count(UINFO), 0);
    }

    #[test]
    fn test_flush_escapes_on_concurrent_disable() {
        let regs = FakeRegs::new();
        regs.set_reg(UCFG, (Cfg::UART_EN | Cfg::TX_EN | Cfg::RX_EN).bits());
        regs.set_reg(UINFO, 0);
        // Another context disables the UART while we spin.
        regs.on_nth_read(UCFG, 4, 0, (Cfg::UART_EN | Cfg::TX_EN | Cfg::RX_EN).bits());
        let mut uart = CaUart::new(regs);

        uart.flush();

        assert_eq!(uart.regs().read_count(UCFG), 5);
    }

    #[test]
    fn test_getchar_returns_low_byte() {
        let regs = FakeRegs::new();
        regs.set_reg(UINFO, 0); // RX FIFO non-empty
        regs.set_reg(URX_DATA, 0x1c3);
        let mut uart = CaUart::new(regs);
        assert_eq!(uart.getchar(), 0xc3);
    }

    #[test]
    fn test_getchar_waits_for_rx_data() {
        let regs = FakeRegs::new();
        regs.set_reg(UINFO, Info::RX_EMPTY.bits());
        regs.set_reg(URX_DATA, b'q' as u32);
        regs.on_nth_read(UINFO, 2, 0, Info::RX_EMPTY.bits());
        let mut uart = CaUart::new(regs);

        assert_eq!(uart.getchar(), b'q');
        assert_eq!(uart.regs().read_count(UINFO), 3);
    }

    #[test]
    fn test_rx_intr_roundtrip_preserves_tx_bits() {
        let regs = FakeRegs::new();
        regs.set_reg(UINT_EN, IntEn::TX_ALL.bits());
        let mut uart = CaUart::new(regs);

        uart.rx_intr_enable();
        assert_eq!(uart.regs().reg(UINT_EN), IntEn::MASK_ALL.bits());

        uart.rx_intr_disable();
        assert_eq!(uart.regs().reg(UINT_EN), IntEn::TX_ALL.bits());
    }

    #[test]
    fn test_capability_dispatch() {
        let mut uart = init_uart(19_200_000, 115_200);
        uart.regs()
            .set_reg(UINFO, (Info::TX_EMPTY | Info::RX_EMPTY).bits());
        let chip: &mut dyn SerialChip = &mut uart;
        chip.putc(b'A');
        assert!(!chip.have_rx_data());
        assert_eq!(uart.regs().writes_to(UTX_DATA), vec![0x41]);
    }
}
