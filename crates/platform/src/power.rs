//! Supply-voltage readings from the PMIC regulator framework
//!
//! Voltages are carried as signed microvolts because regulator drivers report
//! failures in-band with negative values; [`Microvolts`] only wraps readings
//! that have already been validated as physical.

use core::fmt::Debug;

/// Name of the I/O supply regulator on every STM32MP1 board tree.
pub const VDD_SUPPLY: &str = "vdd-supply";

/// Highest VDD at which enabling HSLVEN is harmless (2.7 V).
pub const VDD_HSLV_CEILING: Microvolts = Microvolts(2_700_000);

/// A validated (non-negative) voltage in microvolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Microvolts(i32);

impl Microvolts {
    /// Wrap a raw regulator reading.
    ///
    /// Returns `None` for negative values, which regulator drivers use as
    /// error codes.
    pub const fn from_reading(uv: i32) -> Option<Self> {
        if uv < 0 {
            None
        } else {
            Some(Self(uv))
        }
    }

    /// Raw microvolt value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Regulator voltage source.
pub trait Pmic {
    /// Error type for lookup or transfer failures.
    type Error: Debug;

    /// Current output voltage of the regulator bound to `supply`, in µV.
    ///
    /// Drivers may return a negative value instead of an `Err`; callers must
    /// treat both as "unreadable".
    fn supply_microvolts(&mut self, supply: &str) -> Result<i32, Self::Error>;
}

impl<P: Pmic + ?Sized> Pmic for &mut P {
    type Error = P::Error;

    fn supply_microvolts(&mut self, supply: &str) -> Result<i32, Self::Error> {
        (**self).supply_microvolts(supply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_readings_are_rejected() {
        assert_eq!(Microvolts::from_reading(-19), None);
        assert_eq!(
            Microvolts::from_reading(3_300_000).map(Microvolts::get),
            Some(3_300_000)
        );
    }

    #[test]
    fn ceiling_comparison() {
        assert!(Microvolts(3_300_000) > VDD_HSLV_CEILING);
        assert!(Microvolts(2_700_000) <= VDD_HSLV_CEILING);
    }
}
