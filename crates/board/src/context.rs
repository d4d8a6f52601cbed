//! Per-boot board context
//!
//! Filled once by [`BoardContext::probe`] and then passed by reference to
//! every bring-up step. Holds the static [`BoardConfig`], the SYSCFG base
//! address (if the node is bound) and the OTP facts read at probe time.

use platform::FuseStorage;

use crate::config::BoardConfig;
use crate::error::ReadError;
use crate::fuse::{read_board_otp, read_fuse_safety_bit};

/// Facts gathered once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardContext {
    config: BoardConfig,
    syscfg_base: Option<usize>,
    product_below_2v5: Result<bool, ReadError>,
    board_otp: Result<u32, ReadError>,
}

impl BoardContext {
    /// Probe the fuses and record the SYSCFG base.
    ///
    /// `fuses` is `None` when no BSEC device is bound; both OTP facts are then
    /// [`ReadError::DeviceNotPresent`].
    pub fn probe<F: FuseStorage>(
        config: BoardConfig,
        syscfg_base: Option<usize>,
        fuses: Option<&mut F>,
    ) -> Self {
        let (product_below_2v5, board_otp) = match fuses {
            Some(fuses) => (
                read_fuse_safety_bit(Some(&mut *fuses)),
                read_board_otp(Some(fuses)),
            ),
            None => (
                Err(ReadError::DeviceNotPresent),
                Err(ReadError::DeviceNotPresent),
            ),
        };

        if let Err(e) = product_below_2v5 {
            warn!("OTP HW word 0 unreadable: {}", e.as_str());
        }

        Self {
            config,
            syscfg_base,
            product_below_2v5,
            board_otp,
        }
    }

    /// Static board description.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// SYSCFG base address.
    pub fn syscfg_base(&self) -> Option<usize> {
        self.syscfg_base
    }

    /// OTP `product_below_2v5` bit.
    pub fn product_below_2v5(&self) -> Result<bool, ReadError> {
        self.product_below_2v5
    }

    /// OTP board identification word.
    pub fn board_otp(&self) -> Result<u32, ReadError> {
        self.board_otp
    }
}
