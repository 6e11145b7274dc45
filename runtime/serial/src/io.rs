//! Register Access - MMIO accessor and the address-resolution collaborator
//!
//! Drivers never touch raw pointers or page tables themselves. They read and
//! write registers through [`RegIo`], and they receive a mapped
//! [`MmioRegion`] from whoever owns the address space via [`MapMmio`].
//! Keeping the seam here is what lets every driver run unmodified against
//! the fake backend in [`crate::testing`].

use thiserror::Error;

/// Address-resolution failure: the window could not be mapped or validated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot map device window at {paddr:#x} ({size:#x} bytes)")]
pub struct MapError {
    pub paddr: usize,
    pub size: usize,
}

/// 32-bit register access.
///
/// Offsets are in bytes from the start of the device's register window.
pub trait RegIo {
    fn read32(&self, offset: usize) -> u32;
    fn write32(&mut self, offset: usize, value: u32);
}

/// Address-resolution collaborator.
///
/// Maps a physical device window into something a driver can poke. Mapping
/// policy (page granularity, caching attributes, permissions) belongs to the
/// implementor, not to the driver.
pub trait MapMmio {
    fn map_device(&mut self, paddr: usize, size: usize) -> core::result::Result<MmioRegion, MapError>;
}

/// A mapped memory-mapped I/O region.
///
/// Owns the window: `MmioRegion` is deliberately not `Clone`, so exactly one
/// driver instance can hold a given register window at a time.
pub struct MmioRegion {
    paddr: usize,
    vaddr: usize,
    size: usize,
}

impl MmioRegion {
    /// Create a new MMIO region.
    ///
    /// # Safety
    /// Caller must ensure `vaddr..vaddr + size` is a valid, device-attributed
    /// mapping of the physical window at `paddr`, and that no other
    /// `MmioRegion` covers an overlapping range.
    pub const unsafe fn new(paddr: usize, vaddr: usize, size: usize) -> Self {
        Self { paddr, vaddr, size }
    }

    /// Physical address of the window.
    pub fn paddr(&self) -> usize {
        self.paddr
    }

    /// Virtual address the window is mapped at.
    pub fn vaddr(&self) -> usize {
        self.vaddr
    }

    /// Size of the window in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl RegIo for MmioRegion {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        debug_assert!(offset + 4 <= self.size);
        debug_assert!(offset % 4 == 0);
        unsafe { core::ptr::read_volatile((self.vaddr + offset) as *const u32) }
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        debug_assert!(offset + 4 <= self.size);
        debug_assert!(offset % 4 == 0);
        unsafe { core::ptr::write_volatile((self.vaddr + offset) as *mut u32, value) }
    }
}

// The region is an exclusive handle to device memory; no shared mutable
// state lives on the Rust side.
unsafe impl Send for MmioRegion {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmio_region_roundtrip() {
        let buf = std::boxed::Box::leak(std::boxed::Box::new([0u32; 4]));
        let base = buf.as_ptr() as usize;
        let mut region = unsafe { MmioRegion::new(0x1000_0000, base, 16) };

        region.write32(0x8, 0xdead_beef);
        assert_eq!(region.read32(0x8), 0xdead_beef);
        assert_eq!(region.read32(0x0), 0);
        assert_eq!(region.paddr(), 0x1000_0000);
        assert_eq!(region.size(), 16);
    }
}
