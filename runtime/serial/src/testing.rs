//! Fake Register Backend - host-side test double for driver code
//!
//! A small register file implementing [`RegIo`], with read/write logs and
//! programmable "flip these bits after the Nth read" rules so blocking
//! FIFO waits can be model-checked: the test arms a rule, the driver spins
//! on the status register, the fake flips the bit after a bounded number of
//! reads, and the test asserts on the logs afterwards.
//!
//! Used only by tests, but compiled unconditionally so integration tests in
//! driver crates can reach it.

use alloc::vec::Vec;
use core::cell::RefCell;

use crate::io::RegIo;

/// Words backing the fake window. Generously sized past any real layout.
const WINDOW_WORDS: usize = 16;

struct ReadRule {
    offset: usize,
    remaining: usize,
    set_mask: u32,
    clear_mask: u32,
}

struct Inner {
    regs: [u32; WINDOW_WORDS],
    reads: Vec<usize>,
    writes: Vec<(usize, u32)>,
    rules: Vec<ReadRule>,
}

/// Fake register window.
///
/// Interior-mutable so reads can be logged through `&self`, matching the
/// `RegIo` contract. Reads return the value stored *before* any armed rule
/// fires on that read.
pub struct FakeRegs {
    inner: RefCell<Inner>,
}

impl FakeRegs {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                regs: [0; WINDOW_WORDS],
                reads: Vec::new(),
                writes: Vec::new(),
                rules: Vec::new(),
            }),
        }
    }

    /// Seed a register value without logging a write.
    pub fn set_reg(&self, offset: usize, value: u32) {
        self.inner.borrow_mut().regs[offset / 4] = value;
    }

    /// Current register value without logging a read.
    pub fn reg(&self, offset: usize) -> u32 {
        self.inner.borrow().regs[offset / 4]
    }

    /// Arm a rule: after `offset` has been read `n` more times, set
    /// `set_mask` bits and clear `clear_mask` bits in the stored value.
    /// The first `n` reads still observe the old value.
    pub fn on_nth_read(&self, offset: usize, n: usize, set_mask: u32, clear_mask: u32) {
        assert!(n > 0, "rule must allow at least one read of the old value");
        self.inner.borrow_mut().rules.push(ReadRule {
            offset,
            remaining: n,
            set_mask,
            clear_mask,
        });
    }

    /// How many times `offset` has been read.
    pub fn read_count(&self, offset: usize) -> usize {
        self.inner
            .borrow()
            .reads
            .iter()
            .filter(|&&o| o == offset)
            .count()
    }

    /// All values written to `offset`, in order.
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.inner
            .borrow()
            .writes
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|&(_, v)| v)
            .collect()
    }

    /// Every write in order, as (offset, value) pairs.
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.inner.borrow().writes.clone()
    }

    pub fn total_writes(&self) -> usize {
        self.inner.borrow().writes.len()
    }

    pub fn total_reads(&self) -> usize {
        self.inner.borrow().reads.len()
    }
}

impl Default for FakeRegs {
    fn default() -> Self {
        Self::new()
    }
}

impl RegIo for FakeRegs {
    fn read32(&self, offset: usize) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.reads.push(offset);
        let value = inner.regs[offset / 4];

        let (mut set, mut clear) = (0u32, 0u32);
        for rule in inner.rules.iter_mut() {
            if rule.offset == offset && rule.remaining > 0 {
                rule.remaining -= 1;
                if rule.remaining == 0 {
                    set |= rule.set_mask;
                    clear |= rule.clear_mask;
                }
            }
        }
        if set != 0 || clear != 0 {
            inner.regs[offset / 4] = (value | set) & !clear;
        }

        value
    }

    fn write32(&mut self, offset: usize, value: u32) {
        let mut inner = self.inner.borrow_mut();
        inner.writes.push((offset, value));
        inner.regs[offset / 4] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_fires_after_nth_read() {
        let regs = FakeRegs::new();
        regs.set_reg(0x18, 0);
        regs.on_nth_read(0x18, 3, 0x8, 0);

        assert_eq!(regs.read32(0x18), 0);
        assert_eq!(regs.read32(0x18), 0);
        assert_eq!(regs.read32(0x18), 0); // rule fires as this read completes
        assert_eq!(regs.read32(0x18), 0x8);
        assert_eq!(regs.read_count(0x18), 4);
    }

    #[test]
    fn test_write_log_ordering() {
        let mut regs = FakeRegs::new();
        regs.write32(0x10, 0x41);
        regs.write32(0x00, 0xe3);
        regs.write32(0x10, 0x42);

        assert_eq!(regs.writes_to(0x10), vec![0x41, 0x42]);
        assert_eq!(regs.writes(), vec![(0x10, 0x41), (0x00, 0xe3), (0x10, 0x42)]);
        assert_eq!(regs.total_writes(), 3);
    }
}
