//! Integration test: SYSCFG bring-up against a recorded register file.
//!
//! Tests that:
//!   1. The four steps write ICNR, BOOTR, IOCTRLSETR, CMPENSETR in that order
//!   2. HSLVEN is never written when the regulator fails or reads >= 2.7 V,
//!      whatever the fuse says
//!   3. Reserved bits in ICNR, BOOTR and CMPCR survive the sequence
//!   4. A missing SYSCFG base is the only fatal outcome
//!
//! Run with: cargo test -p board --test integration_sysconf

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
)]

use board::config::BoardConfig;
use board::context::BoardContext;
use board::error::BringUpError;
use board::sysconf::{sysconf_init, FuseDiagnostic, HslvDecision, HslvSkipReason};
use platform::mocks::{MockBus, MockFuses, MockPmic, MockWatchdog};
use platform::otp::{HW_WORD_0_PRODUCT_BELOW_2V5, OTP_HW_WORD_0};
use platform::power::VDD_SUPPLY;
use platform::syscfg::{Bootr, CmpEnSet, Cmpcr, Icnr, SYSCFG_BASE};
use proptest::prelude::*;

const BOOTR: usize = SYSCFG_BASE;
const IOCTRLSETR: usize = SYSCFG_BASE + 0x18;
const ICNR: usize = SYSCFG_BASE + 0x1C;
const CMPCR: usize = SYSCFG_BASE + 0x20;
const CMPENSETR: usize = SYSCFG_BASE + 0x24;

fn context(product_below_2v5: bool) -> BoardContext {
    let hw0 = if product_below_2v5 {
        HW_WORD_0_PRODUCT_BELOW_2V5
    } else {
        0
    };
    let mut fuses = MockFuses::new().with_word(OTP_HW_WORD_0, hw0);
    BoardContext::probe(BoardConfig::dk2(), Some(SYSCFG_BASE), Some(&mut fuses))
}

fn ready_bus() -> MockBus {
    let mut bus = MockBus::new();
    bus.preset(CMPCR, Cmpcr::SW_CTRL);
    bus.set_bits_after_reads(CMPCR, Cmpcr::READY, 3);
    bus
}

#[test]
fn writes_follow_fixed_order() {
    let ctx = context(true);
    let mut bus = ready_bus();
    let mut pmic = MockPmic::new().with_supply(VDD_SUPPLY, 1_800_000);

    let report = sysconf_init(&ctx, &mut bus, Some(&mut pmic), &mut MockWatchdog::new()).unwrap();

    assert_eq!(report.hslv, HslvDecision::Enable { vdd_uv: 1_800_000 });
    assert_eq!(report.diagnostic, None);
    assert_eq!(
        bus.write_addresses(),
        vec![ICNR, BOOTR, IOCTRLSETR, CMPENSETR, CMPCR]
    );
    assert_eq!(bus.writes_to(IOCTRLSETR), vec![0x1F]);
    assert_eq!(bus.writes_to(CMPENSETR), vec![CmpEnSet::MPU_EN]);
    assert_eq!(bus.value(CMPCR) & Cmpcr::SW_CTRL, 0);
}

#[test]
fn skipped_hslv_keeps_the_remaining_order() {
    let ctx = context(false);
    let mut bus = ready_bus();

    let report =
        sysconf_init(&ctx, &mut bus, None::<&mut MockPmic>, &mut MockWatchdog::new()).unwrap();

    assert_eq!(report.hslv, HslvDecision::Skip(HslvSkipReason::NoPmic));
    assert_eq!(bus.write_addresses(), vec![ICNR, BOOTR, CMPENSETR, CMPCR]);
}

#[test]
fn mismatched_fuse_is_reported_not_acted_on() {
    let ctx = context(false);
    let mut bus = ready_bus();
    let mut pmic = MockPmic::new().with_supply(VDD_SUPPLY, 1_800_000);

    let report = sysconf_init(&ctx, &mut bus, Some(&mut pmic), &mut MockWatchdog::new()).unwrap();

    assert!(report.hslv.enables());
    assert_eq!(report.diagnostic, Some(FuseDiagnostic::ProtectedByHardware));
}

#[test]
fn neighbouring_bits_survive() {
    let ctx = context(true);
    let mut bus = ready_bus();
    bus.preset(BOOTR, 0xDEAD_0005);
    bus.preset(ICNR, 0x0000_0401);

    sysconf_init(&ctx, &mut bus, None::<&mut MockPmic>, &mut MockWatchdog::new()).unwrap();

    let bootr = bus.value(BOOTR);
    assert_eq!(bootr & !Bootr::BOOTPD_MASK, 0xDEAD_0005);
    assert_eq!(bootr & Bootr::BOOTPD_MASK, 0x50);
    assert_eq!(bus.value(ICNR), 0x0000_0401 | Icnr::AXI_M9);
}

#[test]
fn missing_syscfg_base_is_fatal() {
    let mut fuses = MockFuses::new();
    let ctx = BoardContext::probe(BoardConfig::dk2(), None, Some(&mut fuses));
    let mut bus = MockBus::new();

    let err = sysconf_init(&ctx, &mut bus, None::<&mut MockPmic>, &mut MockWatchdog::new());

    assert_eq!(err, Err(BringUpError::FatalHardwareUnavailable));
    assert!(bus.ops().is_empty());
}

proptest! {
    /// An unreadable regulator never leads to an IOCTRLSETR write.
    #[test]
    fn failing_regulator_never_writes_hslv(fuse in any::<bool>()) {
        let ctx = context(fuse);
        let mut bus = ready_bus();
        let mut pmic = MockPmic::new().with_failing_supply(VDD_SUPPLY);

        let report = sysconf_init(&ctx, &mut bus, Some(&mut pmic), &mut MockWatchdog::new()).unwrap();

        prop_assert!(!report.hslv.enables());
        prop_assert!(bus.writes_to(IOCTRLSETR).is_empty());
    }

    /// VDD at or above 2.7 V never leads to an IOCTRLSETR write.
    #[test]
    fn high_vdd_never_writes_hslv(fuse in any::<bool>(), vdd in 2_700_000i32..=5_000_000) {
        let ctx = context(fuse);
        let mut bus = ready_bus();
        let mut pmic = MockPmic::new().with_supply(VDD_SUPPLY, vdd);

        let report = sysconf_init(&ctx, &mut bus, Some(&mut pmic), &mut MockWatchdog::new()).unwrap();

        prop_assert_eq!(report.hslv, HslvDecision::Skip(HslvSkipReason::VddTooHigh(i64::from(vdd))));
        prop_assert!(bus.writes_to(IOCTRLSETR).is_empty());
    }

    /// Negative regulator readings count as unreadable.
    #[test]
    fn negative_vdd_never_writes_hslv(fuse in any::<bool>(), vdd in i32::MIN..0) {
        let ctx = context(fuse);
        let mut bus = ready_bus();
        let mut pmic = MockPmic::new().with_supply(VDD_SUPPLY, vdd);

        sysconf_init(&ctx, &mut bus, Some(&mut pmic), &mut MockWatchdog::new()).unwrap();

        prop_assert!(bus.writes_to(IOCTRLSETR).is_empty());
    }
}
