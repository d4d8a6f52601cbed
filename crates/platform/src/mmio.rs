//! Memory-mapped register access
//!
//! Every SoC register the bring-up code touches is modelled as a typed value
//! implementing [`Register`]. Values are moved between the type system and
//! the hardware through a [`RegisterBus`] (`read32` / `write32`), addressed as
//! `base + Register::OFFSET` by a [`RegisterBlock`].
//!
//! # Read-modify-write discipline
//!
//! A field inside a shared register must only change through a read-modify-
//! write whose mask is scoped to that field. [`RegisterBlock::modify`] is the
//! only RMW entry point and it is restricted to registers marked
//! [`ReadWrite`]. Write-one-to-set / write-one-to-clear registers (`*SETR`,
//! `*CLRR`) do not implement [`ReadWrite`]: writing them with exactly the
//! bits to change is already field-scoped, and reading them back to "modify"
//! would re-set every bit that happens to be active.

use thiserror_no_std::Error;

/// 32-bit memory-mapped bus (`read32(addr)` / `write32(addr, val)`).
///
/// Implemented by [`VolatileBus`] on hardware and by
/// [`MockBus`](crate::mocks::MockBus) in host tests.
pub trait RegisterBus {
    /// Read the 32-bit register at absolute address `addr`.
    fn read32(&mut self, addr: usize) -> u32;

    /// Write `value` to the 32-bit register at absolute address `addr`.
    fn write32(&mut self, addr: usize, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read32(&mut self, addr: usize) -> u32 {
        (**self).read32(addr)
    }

    fn write32(&mut self, addr: usize, value: u32) {
        (**self).write32(addr, value);
    }
}

/// A typed view of one hardware register.
pub trait Register: Copy {
    /// Byte offset of the register from its block base.
    const OFFSET: usize;

    /// Wrap a raw register value.
    fn from_bits(bits: u32) -> Self;

    /// Raw register value.
    fn bits(self) -> u32;
}

/// Marker for registers that hold state and may be read-modify-written.
pub trait ReadWrite: Register {}

/// A field value does not fit in its register field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("value {value:#x} does not fit in a {width}-bit field")]
pub struct FieldOverflow {
    /// Rejected value.
    pub value: u32,
    /// Field width in bits.
    pub width: u8,
}

/// A register block at a fixed base address on a [`RegisterBus`].
pub struct RegisterBlock<B> {
    bus: B,
    base: usize,
}

impl<B: RegisterBus> RegisterBlock<B> {
    /// Create a view of the block at `base`.
    pub fn new(bus: B, base: usize) -> Self {
        Self { bus, base }
    }

    /// Block base address.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Absolute address of register `R` in this block.
    pub fn address_of<R: Register>(&self) -> usize {
        self.base.wrapping_add(R::OFFSET)
    }

    /// Read register `R`.
    pub fn read<R: Register>(&mut self) -> R {
        let addr = self.address_of::<R>();
        R::from_bits(self.bus.read32(addr))
    }

    /// Write register `R` in full.
    ///
    /// For stateful registers prefer [`modify`](Self::modify); a full write is
    /// only field-scoped for set/clear registers.
    pub fn write<R: Register>(&mut self, value: R) {
        let addr = self.address_of::<R>();
        self.bus.write32(addr, value.bits());
    }

    /// Read-modify-write register `R`.
    ///
    /// `f` receives the current value and returns the new one; the typed
    /// mutators on each register only touch their own field.
    pub fn modify<R: ReadWrite>(&mut self, f: impl FnOnce(R) -> R) {
        let current = self.read::<R>();
        self.write(f(current));
    }

    /// Release the bus.
    pub fn into_inner(self) -> B {
        self.bus
    }
}

/// Replace the bits selected by `mask` in `bits` with `value << shift`.
///
/// Bits outside `mask` are preserved; bits of `value` that would land
/// outside `mask` are dropped.
#[inline]
#[must_use]
pub const fn replace_field(bits: u32, mask: u32, shift: u32, value: u32) -> u32 {
    (bits & !mask) | (value.wrapping_shl(shift) & mask)
}

/// Extract the field selected by `mask` from `bits`, shifted down to bit 0.
#[inline]
#[must_use]
pub const fn extract_field(bits: u32, mask: u32, shift: u32) -> u32 {
    (bits & mask).wrapping_shr(shift)
}

/// Volatile MMIO access to the physical address space.
#[cfg(feature = "hardware")]
pub struct VolatileBus {
    _private: (),
}

#[cfg(feature = "hardware")]
impl VolatileBus {
    /// Create the bus.
    ///
    /// # Safety
    ///
    /// Every address later passed to [`RegisterBus`] must be a mapped,
    /// 4-byte-aligned device register, and no other code may be accessing
    /// the same registers concurrently (single-core, pre-OS boot context).
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(feature = "hardware")]
impl RegisterBus for VolatileBus {
    #[allow(unsafe_code)]
    fn read32(&mut self, addr: usize) -> u32 {
        // SAFETY: `VolatileBus::new` contract: addr is an aligned, mapped device register.
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[allow(unsafe_code)]
    fn write32(&mut self, addr: usize, value: u32) {
        // SAFETY: `VolatileBus::new` contract: addr is an aligned, mapped device register.
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }
}
