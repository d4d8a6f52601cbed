//! Board identification from OTP word 59.
//!
//! ```text
//!  31            16 15  12 11   8 7    4 3    0
//! +----------------+------+------+------+------+
//! |   MB number    | var  | rev  |  --  | BOM  |
//! +----------------+------+------+------+------+
//! ```
//!
//! Revision 1 is printed as `A`, 2 as `B`, and so on. An all-zero word means
//! the board was never programmed.

use core::fmt::{self, Write as _};

use heapless::String;

use crate::config::BoardConfig;

/// Decoded board identification word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardId {
    /// Main board number (e.g. `0x1272` for MB1272).
    pub mb: u16,
    /// Variant.
    pub variant: u8,
    /// Revision, 1-based.
    pub revision: u8,
    /// BOM index.
    pub bom: u8,
}

/// `board_id` / `board_rev` environment value (`0x%04x`).
pub type EnvValue = String<10>;

impl BoardId {
    /// Decode `otp`; `None` for an unprogrammed word.
    pub const fn from_otp(otp: u32) -> Option<Self> {
        if otp == 0 {
            return None;
        }
        Some(Self {
            mb: (otp >> 16) as u16,
            variant: ((otp >> 12) & 0xF) as u8,
            revision: ((otp >> 8) & 0xF) as u8,
            bom: (otp & 0xF) as u8,
        })
    }

    /// Revision letter (`A` for revision 1).
    pub const fn revision_letter(&self) -> char {
        self.revision.wrapping_sub(1).wrapping_add(b'A') as char
    }

    /// `board_id` environment value.
    pub fn board_id_env(&self) -> EnvValue {
        hex4(u32::from(self.mb))
    }

    /// `board_rev` environment value: revision A is `0x000a`.
    pub fn board_rev_env(&self) -> EnvValue {
        hex4(u32::from(self.revision).wrapping_sub(1).wrapping_add(0xA))
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MB{:04x} Var{} Rev.{}-{:02}",
            self.mb,
            self.variant,
            self.revision_letter(),
            self.bom
        )
    }
}

fn hex4(value: u32) -> EnvValue {
    let mut s = EnvValue::new();
    // "0x" + at most 8 digits always fits.
    let _ = write!(s, "0x{value:04x}");
    s
}

/// `checkboard` banner.
pub type BannerLine = String<96>;

/// First `checkboard` line: security mode and compatible string.
pub fn board_banner(config: &BoardConfig) -> BannerLine {
    let mut s = BannerLine::new();
    let _ = write!(
        s,
        "Board: stm32mp1 in {} mode ({})",
        config.security.as_str(),
        config.compatible
    );
    s
}

/// Second `checkboard` line, if the board OTP is programmed.
pub fn board_id_line(id: &BoardId) -> BannerLine {
    let mut s = BannerLine::new();
    let _ = write!(s, "Board: {id}");
    s
}
