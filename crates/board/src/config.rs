//! Board configuration
//!
//! Everything the bring-up code needs to know about the board that is not
//! read from hardware: the security mode the image was built for, which
//! environment backends were compiled in, the USB-PD sense channels and the
//! ethernet wiring. Presets cover the two reference boards.

use platform::AdcChannel;

use crate::eth::{EthSettings, PhyInterfaceMode};

/// DDR base address.
pub const DDR_BASE: usize = 0xC000_0000;

/// Offset of the boot parameters (ATAGs / FDT pointer) from [`DDR_BASE`].
pub const BOOT_PARAMS_OFFSET: usize = 0x100;

/// Upper bound on USB-PD sense channels sampled by the power check.
pub const MAX_USB_PD_CHANNELS: usize = 4;

/// Default STUSB1600 I²C address.
pub const STUSB1600_ADDR: u8 = 0x28;

/// Which firmware owns the secure world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecurityMode {
    /// This loader runs secure and owns SYSCFG.
    Basic,
    /// TF-A owns the secure world.
    Trusted,
    /// TF-A with OP-TEE as secure OS.
    TrustedOpTee,
}

impl SecurityMode {
    /// Banner fragment shown by `checkboard`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Trusted => "trusted",
            Self::TrustedOpTee => "trusted with OP-TEE",
        }
    }

    /// Whether SYSCFG is ours to configure.
    pub const fn owns_syscfg(self) -> bool {
        matches!(self, Self::Basic)
    }
}

/// Environment storage backends compiled into the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvBackends {
    /// ext4 file on an SD/eMMC partition.
    pub ext4: bool,
    /// UBI volume on NAND.
    pub ubi: bool,
    /// Raw offset in SPI NOR.
    pub spi_flash: bool,
}

impl EnvBackends {
    /// Every backend.
    pub const ALL: Self = Self {
        ext4: true,
        ubi: true,
        spi_flash: true,
    };

    /// No backend; the environment lives only in RAM.
    pub const NONE: Self = Self {
        ext4: false,
        ubi: false,
        spi_flash: false,
    };

    /// Backends selected by the `env-ext4`, `env-ubi` and `env-spi-flash`
    /// Cargo features.
    pub const fn from_features() -> Self {
        Self {
            ext4: cfg!(feature = "env-ext4"),
            ubi: cfg!(feature = "env-ubi"),
            spi_flash: cfg!(feature = "env-spi-flash"),
        }
    }
}

impl Default for EnvBackends {
    fn default() -> Self {
        Self::from_features()
    }
}

/// Static description of one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Secure-world ownership.
    pub security: SecurityMode,
    /// Environment backends.
    pub env: EnvBackends,
    /// ADC channels wired to the USB Type-C CC lines. Empty disables the
    /// power check.
    pub usb_pd_channels: &'static [AdcChannel],
    /// STUSB1600 Type-C controller address, if fitted.
    pub stusb1600: Option<u8>,
    /// Ethernet wiring.
    pub eth: EthSettings,
    /// Root `compatible` string of the device tree.
    pub compatible: &'static str,
    /// Address handed to the OS as boot parameters.
    pub boot_params_addr: usize,
}

const DK2_USB_PD: &[AdcChannel] = &[AdcChannel::new("adc@0", 18), AdcChannel::new("adc@0", 19)];

impl BoardConfig {
    /// STM32MP157C-DK2 discovery kit: CC lines sensed on ADC1 in18/in19.
    pub const fn dk2() -> Self {
        Self {
            security: SecurityMode::Basic,
            env: EnvBackends::from_features(),
            usb_pd_channels: DK2_USB_PD,
            stusb1600: None,
            eth: EthSettings {
                interface: PhyInterfaceMode::Rgmii,
                eth_clk_sel: false,
                eth_ref_clk_sel: false,
            },
            compatible: "st,stm32mp157c-dk2",
            boot_params_addr: DDR_BASE.wrapping_add(BOOT_PARAMS_OFFSET),
        }
    }

    /// STM32MP157C-EV1 evaluation board: STUSB1600 on I²C, no CC sensing.
    pub const fn ev1() -> Self {
        Self {
            security: SecurityMode::Basic,
            env: EnvBackends::from_features(),
            usb_pd_channels: &[],
            stusb1600: Some(STUSB1600_ADDR),
            eth: EthSettings {
                interface: PhyInterfaceMode::Rgmii,
                eth_clk_sel: true,
                eth_ref_clk_sel: false,
            },
            compatible: "st,stm32mp157c-ev1",
            boot_params_addr: DDR_BASE.wrapping_add(BOOT_PARAMS_OFFSET),
        }
    }

    /// Same board, different secure-world ownership.
    #[must_use]
    pub const fn with_security(mut self, security: SecurityMode) -> Self {
        self.security = security;
        self
    }

    /// Same board, different USB-PD sense channels.
    #[must_use]
    pub const fn with_usb_pd_channels(mut self, channels: &'static [AdcChannel]) -> Self {
        self.usb_pd_channels = channels;
        self
    }

    /// `board_name`: the compatible string without its `st,` vendor prefix.
    pub fn board_name(&self) -> &'static str {
        self.compatible
            .strip_prefix("st,")
            .unwrap_or(self.compatible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_params_follow_ddr_base() {
        assert_eq!(BoardConfig::dk2().boot_params_addr, 0xC000_0100);
    }

    #[test]
    fn board_name_strips_vendor_prefix() {
        assert_eq!(BoardConfig::dk2().board_name(), "stm32mp157c-dk2");
        let custom = BoardConfig {
            compatible: "acme,widget",
            ..BoardConfig::ev1()
        };
        assert_eq!(custom.board_name(), "acme,widget");
    }

    #[test]
    fn only_basic_mode_owns_syscfg() {
        assert!(SecurityMode::Basic.owns_syscfg());
        assert!(!SecurityMode::Trusted.owns_syscfg());
        assert!(!SecurityMode::TrustedOpTee.owns_syscfg());
        assert_eq!(SecurityMode::TrustedOpTee.as_str(), "trusted with OP-TEE");
    }

    #[test]
    fn dk2_senses_two_cc_lines() {
        let cfg = BoardConfig::dk2();
        assert_eq!(cfg.usb_pd_channels.len(), 2);
        assert!(BoardConfig::ev1().usb_pd_channels.is_empty());
    }
}
