//! Environment location from the boot source.
//!
//! The environment is stored on the medium the SoC booted from. The resolver
//! is a pure function of the boot mode code, the compiled-in backends and a
//! priority index: callers walk priorities `0, 1, ...` and only priority 0
//! is answered here, so any other source of configuration gets the later
//! slots.

use platform::{BootDevice, BootModeCode};

use crate::config::EnvBackends;

/// Block interface name for SD and eMMC.
pub const MMC_INTERFACE: &str = "mmc";

/// `dev:part` per SDMMC instance (1-based instance → index `instance - 1`).
const MMC_DEV_PART: [&str; 3] = ["0:auto", "1:auto", "2:auto"];

/// Where the environment lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnvLocation {
    /// ext4 file on a block device.
    ExtFilesystem {
        /// Interface name (`"mmc"`).
        interface: &'static str,
        /// `dev:part` string, `None` if the instance is out of range.
        dev_part: Option<&'static str>,
        /// 1-based SDMMC instance from the boot mode code.
        instance: u8,
    },
    /// UBI volume on NAND.
    FlashTranslationLayer,
    /// Raw offset in SPI NOR.
    RawFlash,
    /// Boot medium has no storage (serial / USB download, unknown).
    Nowhere,
    /// Boot medium has storage but its backend is not compiled in.
    Unsupported,
    /// A non-zero priority was asked for.
    Deferred,
}

/// Map SDMMC instance `instance` (1-based) to its `dev:part` string.
pub fn mmc_dev_part(instance: u8) -> Option<&'static str> {
    let index = usize::from(instance).checked_sub(1)?;
    MMC_DEV_PART.get(index).copied()
}

/// Resolve the environment location for `priority`.
pub fn env_location(code: BootModeCode, backends: EnvBackends, priority: u32) -> EnvLocation {
    if priority != 0 {
        return EnvLocation::Deferred;
    }

    match code.device() {
        BootDevice::Sd | BootDevice::Emmc => {
            if !backends.ext4 {
                return EnvLocation::Unsupported;
            }
            let instance = code.instance();
            EnvLocation::ExtFilesystem {
                interface: MMC_INTERFACE,
                dev_part: mmc_dev_part(instance),
                instance,
            }
        }
        BootDevice::Nand if backends.ubi => EnvLocation::FlashTranslationLayer,
        BootDevice::Nor if backends.spi_flash => EnvLocation::RawFlash,
        BootDevice::Nand | BootDevice::Nor => EnvLocation::Unsupported,
        BootDevice::Uart | BootDevice::Usb | BootDevice::SpiNand | BootDevice::Unknown(_) => {
            EnvLocation::Nowhere
        }
    }
}

/// `bootdelay` override for this boot device, if any.
///
/// Serial and USB boots come from a download tool that wants the prompt
/// immediately.
pub fn bootdelay_override(device: BootDevice) -> Option<u32> {
    match device {
        BootDevice::Uart | BootDevice::Usb => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_checked_before_boot_mode() {
        for code in [0x11, 0x31, 0x41, 0x51, 0x00] {
            assert_eq!(
                env_location(BootModeCode(code), EnvBackends::ALL, 1),
                EnvLocation::Deferred
            );
        }
    }

    #[test]
    fn sd_and_emmc_use_ext4_on_their_instance() {
        assert_eq!(
            env_location(BootModeCode(0x11), EnvBackends::ALL, 0),
            EnvLocation::ExtFilesystem {
                interface: "mmc",
                dev_part: Some("0:auto"),
                instance: 1
            }
        );
        assert_eq!(
            env_location(BootModeCode(0x22), EnvBackends::ALL, 0),
            EnvLocation::ExtFilesystem {
                interface: "mmc",
                dev_part: Some("1:auto"),
                instance: 2
            }
        );
    }

    #[test]
    fn out_of_range_instance_has_no_dev_part() {
        assert_eq!(mmc_dev_part(0), None);
        assert_eq!(mmc_dev_part(3), Some("2:auto"));
        assert_eq!(mmc_dev_part(4), None);
        assert!(matches!(
            env_location(BootModeCode(0x10), EnvBackends::ALL, 0),
            EnvLocation::ExtFilesystem { dev_part: None, .. }
        ));
    }

    #[test]
    fn flash_backends_depend_on_features() {
        assert_eq!(
            env_location(BootModeCode(0x31), EnvBackends::ALL, 0),
            EnvLocation::FlashTranslationLayer
        );
        assert_eq!(
            env_location(BootModeCode(0x41), EnvBackends::ALL, 0),
            EnvLocation::RawFlash
        );
        assert_eq!(
            env_location(BootModeCode(0x31), EnvBackends::NONE, 0),
            EnvLocation::Unsupported
        );
        assert_eq!(
            env_location(BootModeCode(0x41), EnvBackends::NONE, 0),
            EnvLocation::Unsupported
        );
    }

    #[test]
    fn download_boots_have_no_env() {
        assert_eq!(
            env_location(BootModeCode(0x51), EnvBackends::ALL, 0),
            EnvLocation::Nowhere
        );
        assert_eq!(
            env_location(BootModeCode(0x60), EnvBackends::ALL, 0),
            EnvLocation::Nowhere
        );
        assert_eq!(
            env_location(BootModeCode(0xA0), EnvBackends::ALL, 0),
            EnvLocation::Nowhere
        );
    }

    #[test]
    fn bootdelay_is_zero_for_download_boots() {
        assert_eq!(bootdelay_override(BootDevice::Uart), Some(0));
        assert_eq!(bootdelay_override(BootDevice::Usb), Some(0));
        assert_eq!(bootdelay_override(BootDevice::Sd), None);
    }
}
