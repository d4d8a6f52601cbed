//! Analog-to-digital conversion
//!
//! Bring-up only needs blocking single-shot conversions on a named ADC
//! device, followed by conversion of the raw code to microvolts using the
//! device's own reference and resolution.

use core::fmt::Debug;

/// One channel of a named ADC device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcChannel {
    /// Device name (e.g. `"adc@0"`).
    pub device: &'static str,
    /// Channel number on that device.
    pub channel: u8,
}

impl AdcChannel {
    /// Channel `channel` of `device`.
    pub const fn new(device: &'static str, channel: u8) -> Self {
        Self { device, channel }
    }
}

/// Single-shot ADC access.
pub trait AdcBank {
    /// Error type for missing devices and conversion failures.
    type Error: Debug;

    /// Start a conversion on `ch` and block until the raw code is available.
    fn single_shot(&mut self, ch: AdcChannel) -> Result<u32, Self::Error>;

    /// Convert a raw code from `ch` to microvolts.
    fn raw_to_microvolts(&mut self, ch: AdcChannel, raw: u32) -> Result<i32, Self::Error>;
}

impl<A: AdcBank + ?Sized> AdcBank for &mut A {
    type Error = A::Error;

    fn single_shot(&mut self, ch: AdcChannel) -> Result<u32, Self::Error> {
        (**self).single_shot(ch)
    }

    fn raw_to_microvolts(&mut self, ch: AdcChannel, raw: u32) -> Result<i32, Self::Error> {
        (**self).raw_to_microvolts(ch, raw)
    }
}
