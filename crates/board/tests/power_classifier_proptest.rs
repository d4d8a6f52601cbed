//! Property-based tests for the USB Type-C power classifier.
//! Each bucket of the threshold table holds for every envelope in its range,
//! not just the datasheet examples.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use board::power_check::classify::{
    banner, USB_LOW_THRESHOLD_UV, USB_START_HIGH_THRESHOLD_UV, USB_START_LOW_THRESHOLD_UV,
    USB_WARNING_LOW_THRESHOLD_UV,
};
use board::power_check::{classify, BlinkDirective, PowerVerdict, VoltageEnvelope};
use proptest::prelude::*;

const LOW: i32 = USB_LOW_THRESHOLD_UV;
const WARN: i32 = USB_WARNING_LOW_THRESHOLD_UV;
const START_LOW: i32 = USB_START_LOW_THRESHOLD_UV;
const START_HIGH: i32 = USB_START_HIGH_THRESHOLD_UV;

proptest! {
    /// A 3 A source with the other CC line grounded proceeds silently.
    #[test]
    fn three_amp_source_proceeds(max in (START_LOW + 1)..=START_HIGH, min in 0..=LOW) {
        let c = classify(VoltageEnvelope::new(max, min));
        prop_assert_eq!(c.verdict, PowerVerdict::Proceed);
        prop_assert_eq!(c.directive, BlinkDirective::None);
        prop_assert!(c.banners.is_empty());
    }

    /// Both CC lines grounded: no cable.
    #[test]
    fn both_lines_low_is_unattached(a in 0..=LOW, b in 0..=LOW) {
        let c = classify(VoltageEnvelope::new(a.max(b), a.min(b)));
        prop_assert_eq!(c.verdict, PowerVerdict::Unattached);
        prop_assert_eq!(c.directive, BlinkDirective::Unbounded);
        prop_assert_eq!(c.banners.first().copied(), Some(banner::UNATTACHED));
    }

    /// Both CC lines pulled up below the non-compliant level: unattached.
    #[test]
    fn both_lines_high_is_unattached(a in (LOW + 1)..=START_HIGH, b in (LOW + 1)..=START_HIGH) {
        let c = classify(VoltageEnvelope::new(a.max(b), a.min(b)));
        prop_assert_eq!(c.verdict, PowerVerdict::Unattached);
        prop_assert!(c.verdict.halts());
    }

    /// Default USB power blinks twice and continues.
    #[test]
    fn default_usb_warns_with_two_blinks(max in (LOW + 1)..=WARN, min in 0..=LOW) {
        let c = classify(VoltageEnvelope::new(max, min));
        prop_assert_eq!(c.verdict, PowerVerdict::WarnLow500mA);
        prop_assert_eq!(c.directive, BlinkDirective::Finite(2));
        prop_assert!(!c.verdict.halts());
    }

    /// 1.5 A source blinks three times and continues.
    #[test]
    fn one_and_a_half_amp_warns_with_three_blinks(max in (WARN + 1)..=START_LOW, min in 0..=LOW) {
        let c = classify(VoltageEnvelope::new(max, min));
        prop_assert_eq!(c.verdict, PowerVerdict::WarnLow1A5);
        prop_assert_eq!(c.directive, BlinkDirective::Finite(3));
        prop_assert_eq!(c.banners.last().copied(), Some(banner::CURRENT_TOO_LOW));
    }

    /// Over-advertising sources halt whatever the other line reads.
    #[test]
    fn over_advertising_source_halts(max in (START_HIGH + 1)..=3_300_000i32, min in 0..=3_300_000i32) {
        let c = classify(VoltageEnvelope::new(max, min.min(max)));
        prop_assert_eq!(c.verdict, PowerVerdict::NonCompliantHigh);
        prop_assert_eq!(c.directive, BlinkDirective::Unbounded);
        prop_assert!(c.banners.contains(&banner::NOT_COMPLIANT));
        prop_assert!(!c.banners.contains(&banner::CURRENT_TOO_LOW));
    }

    /// Every consistent envelope lands in a named bucket.
    #[test]
    fn consistent_envelope_is_never_undetermined(a in 0..=3_300_000i32, b in 0..=3_300_000i32) {
        let c = classify(VoltageEnvelope::new(a.max(b), a.min(b)));
        prop_assert_ne!(c.verdict, PowerVerdict::Undetermined);
    }
}

#[test]
fn datasheet_examples() {
    assert_eq!(
        classify(VoltageEnvelope::new(500_000, 100_000)).verdict,
        PowerVerdict::WarnLow500mA
    );
    assert_eq!(
        classify(VoltageEnvelope::new(1_000_000, 100_000)).verdict,
        PowerVerdict::WarnLow1A5
    );
    assert_eq!(
        classify(VoltageEnvelope::new(2_200_000, 2_200_000)).verdict,
        PowerVerdict::NonCompliantHigh
    );
}

#[test]
fn empty_envelope_is_undetermined_and_continues() {
    let c = classify(VoltageEnvelope::EMPTY);
    assert_eq!(c.verdict, PowerVerdict::Undetermined);
    assert_eq!(c.directive, BlinkDirective::Finite(1));
    assert_eq!(c.banners.as_slice(), &[banner::CURRENT_TOO_LOW]);
}
