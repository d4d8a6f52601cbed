//! Field-scoped read-modify-write on the SYSCFG and TAMP registers.
//!
//! Every typed mutator must change only the bits of its own field, whatever
//! the rest of the register holds. Other boot stages read those neighbouring
//! bits later, so clobbering them would be a latent bug.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]

use std::collections::BTreeMap;

use platform::mmio::{Register, RegisterBlock, RegisterBus};
use platform::syscfg::{Bootr, Cmpcr, Icnr, SYSCFG_BASE};
use platform::tamp::{BootContextReg, ForcedBootMode, TAMP_BASE};
use proptest::prelude::*;

/// Minimal recording bus; the shared mocks are only built for dependents.
#[derive(Default)]
struct RecordingBus {
    regs: BTreeMap<usize, u32>,
    log: Vec<(char, usize, u32)>,
}

impl RegisterBus for RecordingBus {
    fn read32(&mut self, addr: usize) -> u32 {
        let v = self.regs.get(&addr).copied().unwrap_or(0);
        self.log.push(('r', addr, v));
        v
    }

    fn write32(&mut self, addr: usize, value: u32) {
        self.log.push(('w', addr, value));
        self.regs.insert(addr, value);
    }
}

proptest! {
    /// Mirroring BOOT into BOOTPD leaves every bit outside 6:4 untouched.
    #[test]
    fn bootr_mirror_is_scoped_to_bootpd(bits in any::<u32>()) {
        let out = Bootr::from_bits(bits).with_pulldown_mirroring_boot_pins();
        prop_assert_eq!(out.bits() & !Bootr::BOOTPD_MASK, bits & !Bootr::BOOTPD_MASK);
        prop_assert_eq!(u32::from(out.boot_pulldown()), bits & Bootr::BOOT_MASK);
    }

    /// Setting ICNR bit 9 never touches any other bit.
    #[test]
    fn icnr_update_is_scoped_to_bit_9(bits in any::<u32>(), enable in any::<bool>()) {
        let out = Icnr::from_bits(bits).with_axi_m9_port1(enable);
        prop_assert_eq!(out.bits() & !Icnr::AXI_M9, bits & !Icnr::AXI_M9);
        prop_assert_eq!(out.axi_m9_port1(), enable);
    }

    /// Clearing SW_CTRL never touches any other bit.
    #[test]
    fn cmpcr_update_is_scoped_to_sw_ctrl(bits in any::<u32>()) {
        let out = Cmpcr::from_bits(bits).with_sw_ctrl(false);
        prop_assert_eq!(out.bits(), bits & !Cmpcr::SW_CTRL);
    }

    /// Forcing a boot mode keeps the latched boot mode code.
    #[test]
    fn forced_boot_mode_keeps_boot_mode_code(bits in any::<u32>(), raw in any::<u8>()) {
        let reg = BootContextReg::from_bits(bits);
        let out = reg.with_forced(ForcedBootMode::from_raw(raw));
        prop_assert_eq!(out.boot_mode(), reg.boot_mode());
        prop_assert_eq!(out.bits() & !BootContextReg::FORCED_MASK, bits & !BootContextReg::FORCED_MASK);
        prop_assert_eq!(out.forced().raw(), raw);
    }
}

#[test]
fn modify_reads_then_writes_the_same_address() {
    let mut bus = RecordingBus::default();
    bus.regs.insert(SYSCFG_BASE + 0x1C, 0x0000_0100);

    let mut regs = RegisterBlock::new(&mut bus, SYSCFG_BASE);
    regs.modify::<Icnr>(|r| r.with_axi_m9_port1(true));

    assert_eq!(
        bus.log,
        vec![('r', SYSCFG_BASE + 0x1C, 0x100), ('w', SYSCFG_BASE + 0x1C, 0x300)]
    );
}

#[test]
fn tamp_boot_context_address() {
    let mut bus = RecordingBus::default();
    let mut regs = RegisterBlock::new(&mut bus, TAMP_BASE);
    assert_eq!(regs.address_of::<BootContextReg>(), 0x5C00_A150);
    let _ = regs.read::<BootContextReg>();
    assert_eq!(bus.log, vec![('r', 0x5C00_A150, 0)]);
}
