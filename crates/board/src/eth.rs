//! Ethernet PHY interface selection in SYSCFG
//!
//! The GMAC samples `ETH_SEL` at reset release, so the ethernet driver calls
//! [`configure_eth_interface`] before bringing the MAC out of reset. All
//! selection bits are first cleared through PMCCLRR, then the wanted ones
//! are set through PMCSETR; both registers are write-one, so no other PMC
//! field is touched.

use platform::mmio::{RegisterBlock, RegisterBus};
use platform::syscfg::{PmcClr, PmcEth, PmcSet};

use crate::error::{BringUpError, EthConfigError};

/// PHY interface mode from the device tree `phy-mode` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyInterfaceMode {
    /// MII.
    Mii,
    /// GMII.
    Gmii,
    /// RMII.
    Rmii,
    /// RGMII, no internal delay.
    Rgmii,
    /// RGMII, internal RX and TX delay.
    RgmiiId,
    /// RGMII, internal RX delay.
    RgmiiRxid,
    /// RGMII, internal TX delay.
    RgmiiTxid,
    /// Anything the GMAC glue cannot select (SGMII, RTBI, ...).
    Other,
}

/// Ethernet wiring of one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EthSettings {
    /// PHY interface.
    pub interface: PhyInterfaceMode,
    /// `st,eth_clk_sel`: 125 MHz clock comes from the RCC.
    pub eth_clk_sel: bool,
    /// `st,eth_ref_clk_sel`: RMII 50 MHz reference comes from the RCC.
    pub eth_ref_clk_sel: bool,
}

/// PMCSETR value for `settings`.
pub fn eth_selection(settings: &EthSettings) -> Result<PmcEth, EthConfigError> {
    let mut bits = match settings.interface {
        PhyInterfaceMode::Mii => PmcEth::REF_CLK_SEL,
        PhyInterfaceMode::Gmii => PmcEth::empty(),
        PhyInterfaceMode::Rmii => PmcEth::SEL_RMII,
        PhyInterfaceMode::Rgmii
        | PhyInterfaceMode::RgmiiId
        | PhyInterfaceMode::RgmiiRxid
        | PhyInterfaceMode::RgmiiTxid => PmcEth::SEL_RGMII,
        PhyInterfaceMode::Other => return Err(EthConfigError::UnsupportedInterface),
    };

    match settings.interface {
        PhyInterfaceMode::Gmii
        | PhyInterfaceMode::Rgmii
        | PhyInterfaceMode::RgmiiId
        | PhyInterfaceMode::RgmiiRxid
        | PhyInterfaceMode::RgmiiTxid
            if settings.eth_clk_sel =>
        {
            bits |= PmcEth::CLK_SEL;
        }
        PhyInterfaceMode::Rmii if settings.eth_ref_clk_sel => bits |= PmcEth::REF_CLK_SEL,
        _ => {}
    }

    Ok(bits)
}

/// Program the ethernet interface selection into SYSCFG.
pub fn configure_eth_interface<B: RegisterBus>(
    bus: B,
    syscfg_base: Option<usize>,
    settings: &EthSettings,
) -> Result<(), EthConfigError> {
    let base = syscfg_base.ok_or(BringUpError::FatalHardwareUnavailable)?;
    let bits = eth_selection(settings)?;

    let mut regs = RegisterBlock::new(bus, base);
    regs.write(PmcClr::eth(PmcClr::ETH_ALL));
    regs.write(PmcSet::eth(bits));

    debug!("ETH PMCSETR = {:#x}", bits.bits());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::MockBus;
    use platform::syscfg::SYSCFG_BASE;

    fn settings(interface: PhyInterfaceMode, clk: bool, ref_clk: bool) -> EthSettings {
        EthSettings {
            interface,
            eth_clk_sel: clk,
            eth_ref_clk_sel: ref_clk,
        }
    }

    #[test]
    fn mii_always_takes_ref_clock_from_rcc() {
        let bits = eth_selection(&settings(PhyInterfaceMode::Mii, false, false)).unwrap();
        assert_eq!(bits, PmcEth::REF_CLK_SEL);
    }

    #[test]
    fn gmii_clock_select_is_optional() {
        assert_eq!(
            eth_selection(&settings(PhyInterfaceMode::Gmii, false, true)).unwrap(),
            PmcEth::empty()
        );
        assert_eq!(
            eth_selection(&settings(PhyInterfaceMode::Gmii, true, false)).unwrap(),
            PmcEth::CLK_SEL
        );
    }

    #[test]
    fn rmii_uses_ref_clock_flag_only() {
        assert_eq!(
            eth_selection(&settings(PhyInterfaceMode::Rmii, true, false)).unwrap(),
            PmcEth::SEL_RMII
        );
        assert_eq!(
            eth_selection(&settings(PhyInterfaceMode::Rmii, false, true)).unwrap(),
            PmcEth::SEL_RMII | PmcEth::REF_CLK_SEL
        );
    }

    #[test]
    fn every_rgmii_variant_selects_rgmii() {
        for mode in [
            PhyInterfaceMode::Rgmii,
            PhyInterfaceMode::RgmiiId,
            PhyInterfaceMode::RgmiiRxid,
            PhyInterfaceMode::RgmiiTxid,
        ] {
            assert_eq!(
                eth_selection(&settings(mode, true, true)).unwrap(),
                PmcEth::SEL_RGMII | PmcEth::CLK_SEL
            );
        }
    }

    #[test]
    fn unsupported_mode_writes_nothing() {
        let mut bus = MockBus::new();
        let err = configure_eth_interface(
            &mut bus,
            Some(SYSCFG_BASE),
            &settings(PhyInterfaceMode::Other, false, false),
        );
        assert_eq!(err, Err(EthConfigError::UnsupportedInterface));
        assert!(bus.ops().is_empty());
    }

    #[test]
    fn missing_syscfg_is_fatal() {
        let mut bus = MockBus::new();
        let err = configure_eth_interface(
            &mut bus,
            None,
            &settings(PhyInterfaceMode::Rgmii, false, false),
        );
        assert_eq!(
            err,
            Err(EthConfigError::Hardware(BringUpError::FatalHardwareUnavailable))
        );
    }

    #[test]
    fn clears_then_sets() {
        let mut bus = MockBus::new();
        configure_eth_interface(
            &mut bus,
            Some(SYSCFG_BASE),
            &settings(PhyInterfaceMode::Rmii, false, true),
        )
        .unwrap();
        assert_eq!(
            bus.write_addresses(),
            vec![SYSCFG_BASE + 0x44, SYSCFG_BASE + 0x04]
        );
        assert_eq!(bus.writes_to(SYSCFG_BASE + 0x44), vec![0x00F3_0000]);
        assert_eq!(bus.writes_to(SYSCFG_BASE + 0x04), vec![0x0082_0000]);
    }
}
