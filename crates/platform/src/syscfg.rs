//! SYSCFG register map (STM32MP15x)
//!
//! Reference: STM32MP157 reference manual RM0436, §13 "System configuration
//! controller (SYSCFG)".
//!
//! | Offset | Register   | Kind              | Used for                          |
//! |--------|------------|-------------------|-----------------------------------|
//! | 0x00   | BOOTR      | read/write        | BOOT pin value + BOOT pull-downs  |
//! | 0x04   | PMCSETR    | write-one-to-set  | Ethernet PHY interface selection  |
//! | 0x18   | IOCTRLSETR | write-one-to-set  | HSLVEN high-speed low-voltage pads|
//! | 0x1C   | ICNR       | read/write        | AXI interconnect master port      |
//! | 0x20   | CMPCR      | read/write        | I/O compensation status + control |
//! | 0x24   | CMPENSETR  | write-one-to-set  | I/O compensation enable           |
//! | 0x44   | PMCCLRR    | write-one-to-clear| Ethernet PHY interface selection  |
//!
//! # HSLVEN hazard
//!
//! Enabling a high-speed low-voltage pad group while VDD > 2.7 V on a part
//! whose OTP `product_below_2v5` bit is erroneously set can damage the IC.
//! [`IoCtrlSet`] therefore has no RMW path and no default value: it can only
//! be written with an explicit [`HslvPads`] set.

use bitflags::bitflags;

use crate::mmio::{extract_field, replace_field, FieldOverflow, ReadWrite, Register};

/// SYSCFG base address in the STM32MP15x memory map.
pub const SYSCFG_BASE: usize = 0x5002_0000;

// ── BOOTR ────────────────────────────────────────────────────────────────────

/// BOOTR: BOOT pin sampled value (bits 2:0, read-only) and BOOT pin
/// pull-down disable (bits 6:4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Bootr(u32);

impl Bootr {
    /// BOOT[2:0] sampled pin value.
    pub const BOOT_MASK: u32 = 0x0000_0007;
    /// BOOTPD[2:0] pull-down control.
    pub const BOOTPD_MASK: u32 = 0x0000_0070;
    /// Bit position of BOOTPD[0].
    pub const BOOTPD_SHIFT: u32 = 4;

    /// Sampled BOOT[2:0] pin value.
    pub const fn boot_pins(self) -> u8 {
        extract_field(self.0, Self::BOOT_MASK, 0) as u8
    }

    /// BOOTPD[2:0] field.
    pub const fn boot_pulldown(self) -> u8 {
        extract_field(self.0, Self::BOOTPD_MASK, Self::BOOTPD_SHIFT) as u8
    }

    /// Replace only BOOTPD[2:0].
    pub fn with_boot_pulldown(self, value: u8) -> Result<Self, FieldOverflow> {
        if u32::from(value) > Self::BOOT_MASK {
            return Err(FieldOverflow {
                value: u32::from(value),
                width: 3,
            });
        }
        Ok(Self(replace_field(
            self.0,
            Self::BOOTPD_MASK,
            Self::BOOTPD_SHIFT,
            u32::from(value),
        )))
    }

    /// Disable the pull-down on every BOOT pin that is strapped to VDD.
    ///
    /// Clears BOOTPD and copies BOOT[2:0] into it; the pins reading `1` get
    /// their pull-down disabled. Every other bit is preserved.
    #[must_use]
    pub const fn with_pulldown_mirroring_boot_pins(self) -> Self {
        Self(replace_field(
            self.0,
            Self::BOOTPD_MASK,
            Self::BOOTPD_SHIFT,
            extract_field(self.0, Self::BOOT_MASK, 0),
        ))
    }
}

impl Register for Bootr {
    const OFFSET: usize = 0x00;

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

impl ReadWrite for Bootr {}

// ── ICNR ─────────────────────────────────────────────────────────────────────

/// ICNR: interconnect master port selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Icnr(u32);

impl Icnr {
    /// AXI master 8 (GPU) uses port 1.
    pub const AXI_M8: u32 = 0x0000_0100;
    /// AXI master 9 (LTDC) uses port 1.
    pub const AXI_M9: u32 = 0x0000_0200;

    /// LTDC (AXI master 9) routed through port 1.
    pub const fn axi_m9_port1(self) -> bool {
        self.0 & Self::AXI_M9 != 0
    }

    /// GPU (AXI master 8) routed through port 1.
    pub const fn axi_m8_port1(self) -> bool {
        self.0 & Self::AXI_M8 != 0
    }

    /// Set or clear only the AXI master 9 port bit.
    #[must_use]
    pub const fn with_axi_m9_port1(self, enable: bool) -> Self {
        Self(replace_field(self.0, Self::AXI_M9, 9, enable as u32))
    }
}

impl Register for Icnr {
    const OFFSET: usize = 0x1C;

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

impl ReadWrite for Icnr {}

// ── IOCTRLSETR ───────────────────────────────────────────────────────────────

bitflags! {
    /// High-speed low-voltage pad groups (IOCTRLSETR.HSLVEN_*).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HslvPads: u32 {
        /// TRACE pads.
        const TRACE = 1 << 0;
        /// QUADSPI pads.
        const QUADSPI = 1 << 1;
        /// ETH pads.
        const ETH = 1 << 2;
        /// SDMMC pads.
        const SDMMC = 1 << 3;
        /// SPI pads.
        const SPI = 1 << 4;
    }
}

/// IOCTRLSETR: write-one-to-set HSLVEN control.
///
/// Writing a `0` bit has no effect, so a full write of the wanted groups
/// never disturbs the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct IoCtrlSet(HslvPads);

impl IoCtrlSet {
    /// Set HSLVEN for `pads`.
    pub const fn enable(pads: HslvPads) -> Self {
        Self(pads)
    }

    /// Pad groups carried by this value.
    pub const fn pads(self) -> HslvPads {
        self.0
    }
}

impl Register for IoCtrlSet {
    const OFFSET: usize = 0x18;

    fn from_bits(bits: u32) -> Self {
        Self(HslvPads::from_bits_truncate(bits))
    }

    fn bits(self) -> u32 {
        self.0.bits()
    }
}

// ── CMPCR ────────────────────────────────────────────────────────────────────

/// CMPCR: I/O compensation cell control and status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Cmpcr(u32);

impl Cmpcr {
    /// SW_CTRL: software override of the compensation codes.
    pub const SW_CTRL: u32 = 0x0000_0002;
    /// READY: compensation cell has converged.
    pub const READY: u32 = 0x0000_0100;

    /// Compensation cell ready.
    pub const fn ready(self) -> bool {
        self.0 & Self::READY != 0
    }

    /// Software override active.
    pub const fn sw_ctrl(self) -> bool {
        self.0 & Self::SW_CTRL != 0
    }

    /// Set or clear only SW_CTRL.
    #[must_use]
    pub const fn with_sw_ctrl(self, enable: bool) -> Self {
        Self(replace_field(self.0, Self::SW_CTRL, 1, enable as u32))
    }
}

impl Register for Cmpcr {
    const OFFSET: usize = 0x20;

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

impl ReadWrite for Cmpcr {}

// ── CMPENSETR ────────────────────────────────────────────────────────────────

/// CMPENSETR: write-one-to-set compensation enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct CmpEnSet(u32);

impl CmpEnSet {
    /// MPU_EN: enable automatic compensation for the MPU domain.
    pub const MPU_EN: u32 = 0x0000_0001;

    /// Enable automatic I/O compensation.
    pub const fn mpu_enable() -> Self {
        Self(Self::MPU_EN)
    }
}

impl Register for CmpEnSet {
    const OFFSET: usize = 0x24;

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

// ── PMCSETR / PMCCLRR ────────────────────────────────────────────────────────

bitflags! {
    /// Ethernet fields shared by PMCSETR and PMCCLRR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PmcEth: u32 {
        /// ETH_CLK_SEL: 125 MHz GMII/RGMII clock from RCC.
        const CLK_SEL = 1 << 16;
        /// ETH_REF_CLK_SEL: 50 MHz RMII / 25 MHz MII reference clock from RCC.
        const REF_CLK_SEL = 1 << 17;
        /// ETH_SELMII: MII instead of GMII when ETH_SEL = 000.
        const SELMII = 1 << 20;
        /// ETH_SEL = 001: RGMII.
        const SEL_RGMII = 1 << 21;
        /// ETH_SEL bit 1 (reserved encoding, cleared with the field).
        const SEL_BIT1 = 1 << 22;
        /// ETH_SEL = 100: RMII.
        const SEL_RMII = 1 << 23;
        /// ETH_SEL[2:0] field (GMII/MII when all zero).
        const SEL_MASK = Self::SEL_RGMII.bits() | Self::SEL_BIT1.bits() | Self::SEL_RMII.bits();
    }
}

/// PMCSETR: write-one-to-set peripheral mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct PmcSet(PmcEth);

impl PmcSet {
    /// Set the given ethernet bits.
    pub const fn eth(bits: PmcEth) -> Self {
        Self(bits)
    }

    /// Ethernet bits carried by this value.
    pub const fn eth_bits(self) -> PmcEth {
        self.0
    }
}

impl Register for PmcSet {
    const OFFSET: usize = 0x04;

    fn from_bits(bits: u32) -> Self {
        Self(PmcEth::from_bits_truncate(bits))
    }

    fn bits(self) -> u32 {
        self.0.bits()
    }
}

/// PMCCLRR: write-one-to-clear peripheral mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct PmcClr(PmcEth);

impl PmcClr {
    /// Every ethernet selection bit (ETH_SEL, ETH_SELMII, both clock selects).
    pub const ETH_ALL: PmcEth = PmcEth::SEL_MASK
        .union(PmcEth::SELMII)
        .union(PmcEth::REF_CLK_SEL)
        .union(PmcEth::CLK_SEL);

    /// Clear the given ethernet bits.
    pub const fn eth(bits: PmcEth) -> Self {
        Self(bits)
    }

    /// Ethernet bits carried by this value.
    pub const fn eth_bits(self) -> PmcEth {
        self.0
    }
}

impl Register for PmcClr {
    const OFFSET: usize = 0x44;

    fn from_bits(bits: u32) -> Self {
        Self(PmcEth::from_bits_truncate(bits))
    }

    fn bits(self) -> u32 {
        self.0.bits()
    }
}
