//! TAMP backup-register boot context
//!
//! The ROM code and the first-stage loader leave the selected boot source in
//! TAMP backup register 20 (`TAMP_BOOT_CONTEXT`):
//!
//! ```text
//!  31        16 15      8 7        0
//! +------------+---------+----------+
//! |  reserved  | BOOTMODE| FORCED   |
//! +------------+---------+----------+
//!               dev|inst   boot mode requested for the next reset
//! ```
//!
//! `BOOTMODE` high nibble is the device class, low nibble the 1-based
//! instance (e.g. `0x12` = SD card on SDMMC2).

use crate::mmio::{extract_field, replace_field, ReadWrite, Register, RegisterBlock, RegisterBus};

/// TAMP base address in the STM32MP15x memory map.
pub const TAMP_BASE: usize = 0x5C00_A000;

/// `TAMP_BOOT_CONTEXT` register (backup register 20).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct BootContextReg(u32);

impl BootContextReg {
    /// Boot mode code, bits 15:8.
    pub const BOOT_MODE_MASK: u32 = 0x0000_FF00;
    /// Bit position of the boot mode code.
    pub const BOOT_MODE_SHIFT: u32 = 8;
    /// Forced boot mode, bits 7:0.
    pub const FORCED_MASK: u32 = 0x0000_00FF;

    /// Boot mode code latched by the ROM code.
    pub const fn boot_mode(self) -> BootModeCode {
        BootModeCode(extract_field(self.0, Self::BOOT_MODE_MASK, Self::BOOT_MODE_SHIFT) as u8)
    }

    /// Forced boot mode requested for the next reset.
    pub const fn forced(self) -> ForcedBootMode {
        ForcedBootMode::from_raw(extract_field(self.0, Self::FORCED_MASK, 0) as u8)
    }

    /// Replace only the forced boot mode byte.
    #[must_use]
    pub const fn with_forced(self, mode: ForcedBootMode) -> Self {
        Self(replace_field(
            self.0,
            Self::FORCED_MASK,
            0,
            mode.raw() as u32,
        ))
    }
}

impl Register for BootContextReg {
    const OFFSET: usize = 0x150;

    fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    fn bits(self) -> u32 {
        self.0
    }
}

impl ReadWrite for BootContextReg {}

/// Boot device class (high nibble of the boot mode code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootDevice {
    /// SD card on an SDMMC instance.
    Sd,
    /// eMMC on an SDMMC instance.
    Emmc,
    /// Parallel NAND on the FMC.
    Nand,
    /// Serial NOR on QSPI.
    Nor,
    /// Serial download over UART/USART.
    Uart,
    /// Serial download over USB (DFU).
    Usb,
    /// SPI-NAND on QSPI.
    SpiNand,
    /// Device class not known to this loader (raw high nibble).
    Unknown(u8),
}

impl BootDevice {
    /// Decode a device-class nibble already shifted into bits 7:4.
    pub const fn from_class(class: u8) -> Self {
        match class & BootModeCode::DEVICE_MASK {
            0x10 => Self::Sd,
            0x20 => Self::Emmc,
            0x30 => Self::Nand,
            0x40 => Self::Nor,
            0x50 => Self::Uart,
            0x60 => Self::Usb,
            0x70 => Self::SpiNand,
            other => Self::Unknown(other),
        }
    }

    /// Human-readable device name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sd => "sd",
            Self::Emmc => "emmc",
            Self::Nand => "nand",
            Self::Nor => "nor",
            Self::Uart => "uart",
            Self::Usb => "usb",
            Self::SpiNand => "spi-nand",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// 8-bit boot mode code: device class in the high nibble, instance in the low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct BootModeCode(pub u8);

impl BootModeCode {
    /// Device-class nibble.
    pub const DEVICE_MASK: u8 = 0xF0;
    /// Instance nibble.
    pub const INSTANCE_MASK: u8 = 0x0F;

    /// Device class.
    pub const fn device(self) -> BootDevice {
        BootDevice::from_class(self.0)
    }

    /// 1-based device instance (0 when the ROM code did not report one).
    pub const fn instance(self) -> u8 {
        self.0 & Self::INSTANCE_MASK
    }

    /// Raw code.
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Boot mode requested for the next reset (TAMP boot context bits 7:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ForcedBootMode {
    /// No forced mode.
    Normal,
    /// Android fastboot.
    Fastboot,
    /// Recovery.
    Recovery,
    /// STM32CubeProgrammer download.
    Stm32Prog,
    /// USB mass storage exporting the given MMC instance.
    UmsMmc(u8),
    /// Unrecognised value left by another agent.
    Other(u8),
}

impl ForcedBootMode {
    const UMS_MMC_BASE: u8 = 0x10;

    /// Decode the raw byte.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Self::Normal,
            0x01 => Self::Fastboot,
            0x02 => Self::Recovery,
            0x03 => Self::Stm32Prog,
            0x10..=0x1F => Self::UmsMmc(raw & 0x0F),
            other => Self::Other(other),
        }
    }

    /// Encode to the raw byte.
    pub const fn raw(self) -> u8 {
        match self {
            Self::Normal => 0x00,
            Self::Fastboot => 0x01,
            Self::Recovery => 0x02,
            Self::Stm32Prog => 0x03,
            Self::UmsMmc(instance) => Self::UMS_MMC_BASE | (instance & 0x0F),
            Self::Other(raw) => raw,
        }
    }
}

/// Source of the boot mode code latched at reset.
pub trait BootContext {
    /// Boot mode code for this boot.
    fn boot_mode(&mut self) -> BootModeCode;

    /// Request `mode` for the next reset, leaving the boot mode code intact.
    fn force_boot_mode(&mut self, mode: ForcedBootMode);
}

/// [`BootContext`] backed by the TAMP backup register.
pub struct TampBootContext<B> {
    regs: RegisterBlock<B>,
}

impl<B: RegisterBus> TampBootContext<B> {
    /// TAMP block at its default base address.
    pub fn new(bus: B) -> Self {
        Self::with_base(bus, TAMP_BASE)
    }

    /// TAMP block at `base`.
    pub fn with_base(bus: B, base: usize) -> Self {
        Self {
            regs: RegisterBlock::new(bus, base),
        }
    }

    /// Raw boot context register.
    pub fn read(&mut self) -> BootContextReg {
        self.regs.read()
    }

    /// Release the bus.
    pub fn into_inner(self) -> B {
        self.regs.into_inner()
    }
}

impl<B: RegisterBus> BootContext for TampBootContext<B> {
    fn boot_mode(&mut self) -> BootModeCode {
        self.read().boot_mode()
    }

    fn force_boot_mode(&mut self, mode: ForcedBootMode) {
        self.regs
            .modify::<BootContextReg>(|r| r.with_forced(mode));
    }
}
