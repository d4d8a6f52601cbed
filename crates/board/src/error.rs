//! Error types for board bring-up.
//!
//! Only [`BringUpError`] is fatal. [`ReadError`] is always degraded to a
//! skipped step by the caller; the power-supply halt is a state of
//! [`crate::power_check`], not an error.

use thiserror_no_std::Error;

/// Fatal bring-up failure: boot cannot continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpError {
    /// The SYSCFG register block has no known base address (the device tree
    /// node or its driver is not bound yet).
    #[error("SYSCFG base address unavailable")]
    FatalHardwareUnavailable,
}

/// A fuse or regulator read did not produce a usable value.
///
/// The caller treats every variant as "unknown": never as safe, never as
/// unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// The BSEC or PMIC device is not bound on this board.
    #[error("device not present")]
    DeviceNotPresent,
    /// The device reported a transfer error.
    #[error("transfer failed")]
    Transfer,
    /// Fewer bytes than requested were returned.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes requested.
        expected: usize,
        /// Bytes returned.
        actual: usize,
    },
    /// The device returned a value that cannot be physical (e.g. a negative
    /// voltage).
    #[error("invalid value {0}")]
    InvalidValue(i64),
}

impl ReadError {
    /// Short name for log lines.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceNotPresent => "device not present",
            Self::Transfer => "transfer failed",
            Self::ShortRead { .. } => "short read",
            Self::InvalidValue(_) => "invalid value",
        }
    }
}

/// Ethernet interface selection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EthConfigError {
    /// The PHY interface mode has no SYSCFG encoding.
    #[error("unsupported PHY interface mode")]
    UnsupportedInterface,
    /// SYSCFG is not reachable.
    #[error("{0}")]
    Hardware(BringUpError),
}

impl From<BringUpError> for EthConfigError {
    fn from(err: BringUpError) -> Self {
        Self::Hardware(err)
    }
}
