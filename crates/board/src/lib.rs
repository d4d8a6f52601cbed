//! STM32MP1 board bring-up
//!
//! Early hardware bring-up for STM32MP15x boards: fuse reads, the SYSCFG
//! register sequence, the USB Type-C power check and the boot-source driven
//! environment location.
//!
//! # Architecture
//!
//! ```text
//! Init drivers (boot: board_init / board_late_init)
//!         ↓
//! Bring-up logic (sysconf, power_check, env_location, boot_keys, eth, typec)
//!         ↓
//! Board facts (context, fuse, board_id, config)
//!         ↓
//! Platform HAL (platform crate: traits + typed registers)
//! ```
//!
//! Every collaborator (register bus, PMIC, ADC, fuses, LED, watchdog, halt) is
//! passed in explicitly; nothing here owns global state.
//!
//! # Features
//!
//! - `defmt` - Log through defmt and derive `defmt::Format` (target builds)
//! - `tracing` - Log through tracing (host builds)
//! - `std` - Enable standard library (host tests)
//! - `hardware` - Pull in the volatile MMIO bus from `platform`
//! - `env-ext4`, `env-ubi`, `env-spi-flash` - Environment backends compiled in
//!
//! # Example
//!
//! ```no_run
//! use board::config::BoardConfig;
//! use board::env_location::{env_location, EnvLocation};
//! use platform::BootModeCode;
//!
//! let cfg = BoardConfig::dk2();
//! let loc = env_location(BootModeCode(0x11), cfg.env, 0);
//! assert!(matches!(loc, EnvLocation::ExtFilesystem { .. }));
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_arguments)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod board_id;
pub mod boot;
pub mod boot_keys;
pub mod config;
pub mod context;
pub mod env_location;
pub mod error;
pub mod eth;
pub mod fuse;
pub mod power_check;
pub mod sysconf;
pub mod typec;

// Re-export key types
pub use boot::{
    board_init, board_late_init, board_quiesce_devices, BoardInitReport, LateInitReport,
};
pub use config::{BoardConfig, EnvBackends, SecurityMode};
pub use context::BoardContext;
pub use env_location::{env_location, EnvLocation};
pub use error::{BringUpError, EthConfigError, ReadError};
pub use power_check::{classify, PowerVerdict, VoltageEnvelope};
pub use sysconf::{sysconf_init, HslvDecision, SysconfReport};
