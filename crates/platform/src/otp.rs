//! One-time-programmable fuse access (BSEC)
//!
//! BSEC exposes the OTP array through a shadow copy loaded at reset. Word `n`
//! lives at byte offset `n * 4` of the shadow area. Bring-up code only ever
//! reads shadows.

use core::fmt::Debug;

/// OTP word 18: HW configuration word 0.
pub const OTP_HW_WORD_0: u32 = 18;

/// Bit of [`OTP_HW_WORD_0`] declaring the product is limited to VDD < 2.5 V.
pub const HW_WORD_0_PRODUCT_BELOW_2V5: u32 = 1 << 13;

/// OTP word 59: board identifier programmed at manufacturing.
pub const OTP_BOARD_WORD: u32 = 59;

/// BSEC shadow-area byte offset of OTP word `word`.
///
/// Returns `None` if the offset does not fit the 32-bit BSEC address space.
pub const fn bsec_shadow(word: u32) -> Option<u32> {
    word.checked_mul(4)
}

/// Read access to the fuse controller.
pub trait FuseStorage {
    /// Error type for transfer failures.
    type Error: Debug;

    /// Copy up to `buf.len()` bytes starting at byte `offset` into `buf`.
    ///
    /// Returns the number of bytes actually read; a short count is not an
    /// error at this layer.
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<F: FuseStorage + ?Sized> FuseStorage for &mut F {
    type Error = F::Error;

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(offset, buf)
    }
}
