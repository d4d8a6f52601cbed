//! Hardware Abstraction Layer (HAL) for STM32MP1 board bring-up
//!
//! This crate provides trait-based abstractions for every hardware service
//! the bring-up sequence consumes, plus typed definitions of the SoC
//! registers it touches, enabling development and testing without a board.
//!
//! # Architecture Layers
//!
//! ```text
//! Outer init driver (U-Boot board hooks / bare-metal entry)
//!         ↓
//! Bring-up logic (board crate)
//!         ↓
//! Platform HAL (this crate - traits + typed registers)
//!         ↓
//! Hardware (SYSCFG, TAMP, BSEC, PMIC, ADC, GPIO, IWDG)
//! ```
//!
//! # Abstraction Levels
//!
//! ## Typed registers
//! - [`syscfg`] - SYSCFG block: boot pins, interconnect, HSLVEN, compensation, PMC
//! - [`tamp`] - TAMP boot-context latch and boot-mode decoding
//! - [`mmio`] - [`RegisterBus`] access and field-scoped read-modify-write
//!
//! ## Services
//! - [`otp`] - [`FuseStorage`] (BSEC shadow reads)
//! - [`power`] - [`Pmic`] supply readings
//! - [`adc`] - [`AdcBank`] single-shot conversions
//! - [`system`] - [`Watchdog`] and [`Halt`]
//!
//! GPIO, delay and I2C are consumed directly through `embedded-hal` 1.0.
//!
//! # Features
//!
//! - `std`: Enable the [`mocks`] module for host tests
//! - `hardware`: Physical hardware implementations ([`mmio::VolatileBus`])
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::mmio::{RegisterBlock, RegisterBus};
//! use platform::syscfg::{Cmpcr, SYSCFG_BASE};
//!
//! fn compensation_ready<B: RegisterBus>(bus: &mut B) -> bool {
//!     RegisterBlock::new(bus, SYSCFG_BASE).read::<Cmpcr>().ready()
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod adc;
pub mod mmio;
pub mod otp;
pub mod power;
pub mod syscfg;
pub mod system;
pub mod tamp;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export the service traits
pub use adc::{AdcBank, AdcChannel};
pub use mmio::{ReadWrite, Register, RegisterBlock, RegisterBus};
pub use otp::FuseStorage;
pub use power::{Microvolts, Pmic};
pub use system::{Halt, Watchdog};
pub use tamp::{BootContext, BootDevice, BootModeCode, ForcedBootMode, TampBootContext};

// Re-export register types
pub use syscfg::{Bootr, CmpEnSet, Cmpcr, HslvPads, Icnr, IoCtrlSet, PmcClr, PmcEth, PmcSet};
