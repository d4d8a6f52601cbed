//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests. Every mock records what was asked
//! of it so tests can assert on ordering and on writes that must never
//! happen.

#![cfg(any(test, feature = "std"))]

use std::collections::BTreeMap;
use std::string::String;
use std::vec::Vec;

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};
use thiserror_no_std::Error;

use crate::adc::{AdcBank, AdcChannel};
use crate::mmio::RegisterBus;
use crate::otp::FuseStorage;
use crate::power::Pmic;
use crate::system::{Halt, Watchdog};
use crate::tamp::{BootContext, BootModeCode, ForcedBootMode};

/// Error returned by the fallible mocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MockError {
    /// The requested device, supply or channel was not configured.
    #[error("device not present")]
    NotPresent,
    /// The device is present but the transfer was made to fail.
    #[error("transfer failed")]
    Transfer,
}

// ── MMIO ─────────────────────────────────────────────────────────────────────

/// One access seen by [`MockBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    /// `read32(addr)` returned `value`.
    Read {
        /// Absolute address.
        addr: usize,
        /// Value returned.
        value: u32,
    },
    /// `write32(addr, value)`.
    Write {
        /// Absolute address.
        addr: usize,
        /// Value written.
        value: u32,
    },
}

#[derive(Debug, Clone, Copy)]
struct PendingBits {
    addr: usize,
    bits: u32,
    reads_left: usize,
}

/// Sparse register file; unset registers read as zero.
#[derive(Debug, Default)]
pub struct MockBus {
    registers: BTreeMap<usize, u32>,
    ops: Vec<BusOp>,
    pending: Vec<PendingBits>,
}

impl MockBus {
    /// Create an empty register file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reset value of the register at `addr`.
    pub fn preset(&mut self, addr: usize, value: u32) {
        self.registers.insert(addr, value);
    }

    /// OR `bits` into the register at `addr` once it has been read `reads` times.
    ///
    /// Models hardware status bits (e.g. CMPCR.READY) that rise while
    /// software is polling.
    pub fn set_bits_after_reads(&mut self, addr: usize, bits: u32, reads: usize) {
        self.pending.push(PendingBits {
            addr,
            bits,
            reads_left: reads,
        });
    }

    /// Current value of the register at `addr`.
    pub fn value(&self, addr: usize) -> u32 {
        self.registers.get(&addr).copied().unwrap_or(0)
    }

    /// Every access, in order.
    pub fn ops(&self) -> &[BusOp] {
        &self.ops
    }

    /// Addresses written, in order.
    pub fn write_addresses(&self) -> Vec<usize> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Write { addr, .. } => Some(*addr),
                BusOp::Read { .. } => None,
            })
            .collect()
    }

    /// Values written to `addr`, in order.
    pub fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Write { addr: a, value } if *a == addr => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Number of reads of `addr`.
    pub fn read_count(&self, addr: usize) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, BusOp::Read { addr: a, .. } if *a == addr))
            .count()
    }
}

impl RegisterBus for MockBus {
    fn read32(&mut self, addr: usize) -> u32 {
        let value = self.value(addr);
        self.ops.push(BusOp::Read { addr, value });

        let mut raised = 0;
        for p in self.pending.iter_mut().filter(|p| p.addr == addr) {
            p.reads_left = p.reads_left.saturating_sub(1);
            if p.reads_left == 0 {
                raised |= p.bits;
            }
        }
        self.pending.retain(|p| p.reads_left > 0);
        if raised != 0 {
            self.registers.insert(addr, value | raised);
        }

        value
    }

    fn write32(&mut self, addr: usize, value: u32) {
        self.ops.push(BusOp::Write { addr, value });
        self.registers.insert(addr, value);
    }
}

// ── Fuses ────────────────────────────────────────────────────────────────────

/// BSEC shadow array holding 32-bit words (little-endian byte order).
///
/// Only word-aligned reads are modelled.
#[derive(Debug, Default)]
pub struct MockFuses {
    words: BTreeMap<u32, u32>,
    failure: Option<MockError>,
    short_read: Option<usize>,
    reads: Vec<u32>,
}

impl MockFuses {
    /// All-zero fuses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Program OTP word `word`.
    #[must_use]
    pub fn with_word(mut self, word: u32, value: u32) -> Self {
        self.words.insert(word, value);
        self
    }

    /// Make every read fail with `err`.
    #[must_use]
    pub fn failing(mut self, err: MockError) -> Self {
        self.failure = Some(err);
        self
    }

    /// Return at most `bytes` bytes per read.
    #[must_use]
    pub fn short_reads(mut self, bytes: usize) -> Self {
        self.short_read = Some(bytes);
        self
    }

    /// Byte offsets requested, in order.
    pub fn reads(&self) -> &[u32] {
        &self.reads
    }
}

impl FuseStorage for MockFuses {
    type Error = MockError;

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.reads.push(offset);
        if let Some(err) = self.failure {
            return Err(err);
        }
        let word = self.words.get(&(offset >> 2)).copied().unwrap_or(0);
        let limit = self.short_read.unwrap_or(usize::MAX);
        let mut n = 0usize;
        for (dst, src) in buf.iter_mut().zip(word.to_le_bytes()).take(limit) {
            *dst = src;
            n = n.saturating_add(1);
        }
        Ok(n)
    }
}

// ── PMIC ─────────────────────────────────────────────────────────────────────

/// Regulator map keyed by supply name.
#[derive(Debug, Default)]
pub struct MockPmic {
    supplies: BTreeMap<String, Result<i32, MockError>>,
    lookups: usize,
}

impl MockPmic {
    /// PMIC with no regulators bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `supply` to a regulator reading `uv`.
    #[must_use]
    pub fn with_supply(mut self, supply: &str, uv: i32) -> Self {
        self.supplies.insert(supply.into(), Ok(uv));
        self
    }

    /// Bind `supply` to a regulator whose reads fail.
    #[must_use]
    pub fn with_failing_supply(mut self, supply: &str) -> Self {
        self.supplies.insert(supply.into(), Err(MockError::Transfer));
        self
    }

    /// Number of `supply_microvolts` calls.
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}

impl Pmic for MockPmic {
    type Error = MockError;

    fn supply_microvolts(&mut self, supply: &str) -> Result<i32, Self::Error> {
        self.lookups = self.lookups.saturating_add(1);
        self.supplies
            .get(supply)
            .copied()
            .unwrap_or(Err(MockError::NotPresent))
    }
}

// ── ADC ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum ChannelBehaviour {
    Reads { raw: u32, uv: i32 },
    ConversionFails,
    CalibrationFails { raw: u32 },
}

/// ADC bank with scripted per-channel readings.
#[derive(Debug, Default)]
pub struct MockAdc {
    channels: Vec<(AdcChannel, ChannelBehaviour)>,
    conversions: Vec<AdcChannel>,
}

impl MockAdc {
    /// ADC with no channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// `ch` converts to `raw`, which calibrates to `uv`.
    #[must_use]
    pub fn with_channel(mut self, ch: AdcChannel, raw: u32, uv: i32) -> Self {
        self.channels.push((ch, ChannelBehaviour::Reads { raw, uv }));
        self
    }

    /// Conversions on `ch` fail.
    #[must_use]
    pub fn with_failing_channel(mut self, ch: AdcChannel) -> Self {
        self.channels.push((ch, ChannelBehaviour::ConversionFails));
        self
    }

    /// `ch` converts but its calibration fails.
    #[must_use]
    pub fn with_uncalibrated_channel(mut self, ch: AdcChannel, raw: u32) -> Self {
        self.channels
            .push((ch, ChannelBehaviour::CalibrationFails { raw }));
        self
    }

    /// Channels converted, in order.
    pub fn conversions(&self) -> &[AdcChannel] {
        &self.conversions
    }

    fn behaviour(&self, ch: AdcChannel) -> Option<ChannelBehaviour> {
        self.channels
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, b)| *b)
    }
}

impl AdcBank for MockAdc {
    type Error = MockError;

    fn single_shot(&mut self, ch: AdcChannel) -> Result<u32, Self::Error> {
        self.conversions.push(ch);
        match self.behaviour(ch) {
            Some(ChannelBehaviour::Reads { raw, .. } | ChannelBehaviour::CalibrationFails { raw }) => {
                Ok(raw)
            }
            Some(ChannelBehaviour::ConversionFails) => Err(MockError::Transfer),
            None => Err(MockError::NotPresent),
        }
    }

    fn raw_to_microvolts(&mut self, ch: AdcChannel, _raw: u32) -> Result<i32, Self::Error> {
        match self.behaviour(ch) {
            Some(ChannelBehaviour::Reads { uv, .. }) => Ok(uv),
            Some(ChannelBehaviour::CalibrationFails { .. } | ChannelBehaviour::ConversionFails) => {
                Err(MockError::Transfer)
            }
            None => Err(MockError::NotPresent),
        }
    }
}

// ── Watchdog / halt ──────────────────────────────────────────────────────────

/// Counts watchdog reloads.
#[derive(Debug, Default)]
pub struct MockWatchdog {
    pets: u64,
}

impl MockWatchdog {
    /// Fresh watchdog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reloads.
    pub fn pets(&self) -> u64 {
        self.pets
    }
}

impl Watchdog for MockWatchdog {
    fn pet(&mut self) {
        self.pets = self.pets.saturating_add(1);
    }
}

/// Halt that panics with `"halted"` so tests can observe it with
/// `#[should_panic(expected = "halted")]`.
#[derive(Debug, Default)]
pub struct PanicHalt;

impl Halt for PanicHalt {
    #[allow(clippy::panic)]
    fn hang(&mut self) -> ! {
        panic!("halted");
    }
}

// ── GPIO / delay ─────────────────────────────────────────────────────────────

/// Output pin that remembers its level and counts toggles.
#[derive(Debug, Default)]
pub struct MockLed {
    high: bool,
    toggles: u64,
    set_low_calls: usize,
}

impl MockLed {
    /// LED starting low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level.
    pub fn is_on(&self) -> bool {
        self.high
    }

    /// Number of `toggle` calls.
    pub fn toggles(&self) -> u64 {
        self.toggles
    }

    /// Number of explicit `set_low` calls.
    pub fn set_low_calls(&self) -> usize {
        self.set_low_calls
    }
}

impl ErrorType for MockLed {
    type Error = Infallible;
}

impl OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        self.set_low_calls = self.set_low_calls.saturating_add(1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for MockLed {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.high = !self.high;
        self.toggles = self.toggles.saturating_add(1);
        Ok(())
    }
}

/// Input pin held at a fixed level.
#[derive(Debug, Clone, Copy)]
pub struct MockKey {
    pressed: bool,
}

impl MockKey {
    /// Key held down (`true`) or released.
    pub fn new(pressed: bool) -> Self {
        Self { pressed }
    }
}

impl ErrorType for MockKey {
    type Error = Infallible;
}

impl InputPin for MockKey {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed)
    }
}

/// Delay that returns immediately and records the requested waits.
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
    ms_calls: Vec<u32>,
}

impl MockDelay {
    /// Fresh delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Millisecond waits requested through `delay_ms`, in order.
    pub fn ms_calls(&self) -> &[u32] {
        &self.ms_calls
    }

    /// Total simulated time in nanoseconds.
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns = self.total_ns.saturating_add(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls.push(ms);
        self.total_ns = self
            .total_ns
            .saturating_add(u64::from(ms).saturating_mul(1_000_000));
    }
}

// ── Boot context ─────────────────────────────────────────────────────────────

/// Boot context latch with a fixed boot mode.
#[derive(Debug)]
pub struct MockBootContext {
    code: BootModeCode,
    forced: Option<ForcedBootMode>,
}

impl MockBootContext {
    /// Latch reporting `code`.
    pub fn new(code: u8) -> Self {
        Self {
            code: BootModeCode(code),
            forced: None,
        }
    }

    /// Last forced mode written, if any.
    pub fn forced(&self) -> Option<ForcedBootMode> {
        self.forced
    }
}

impl BootContext for MockBootContext {
    fn boot_mode(&mut self) -> BootModeCode {
        self.code
    }

    fn force_boot_mode(&mut self, mode: ForcedBootMode) {
        self.forced = Some(mode);
    }
}
