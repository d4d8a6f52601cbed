//! SYSCFG bring-up sequencer.
//!
//! Brings interconnect routing, boot pins, I/O pad speed and I/O compensation
//! into their operating configuration. Each step depends on the previous one,
//! so the order is encoded in the type of [`SyscfgSequencer`]:
//!
//! ```text
//! [Reset] --route_interconnect()--> [InterconnectRouted]
//!         --mirror_boot_pins()----> [BootPinsMirrored]
//!         --configure_pads()------> [PadsConfigured]
//!         --compensate()----------> [Compensated]
//! ```
//!
//! Skipping or reordering a step is a compile error.
//!
//! ## HSLVEN
//!
//! High-speed low-voltage mode is only enabled when the PMIC is present and
//! reports `vdd-supply` below 2.7 V, and when the `product_below_2v5` fuse
//! could be read. An unreadable regulator or fuse means the bits are never
//! written. A fuse value that disagrees with the voltage decision is reported
//! as a [`FuseDiagnostic`]; it does not change the decision.

use core::marker::PhantomData;

use platform::mmio::{RegisterBlock, RegisterBus};
use platform::power::{VDD_HSLV_CEILING, VDD_SUPPLY};
use platform::syscfg::{Bootr, CmpEnSet, Cmpcr, HslvPads, Icnr, IoCtrlSet};
use platform::{Pmic, Watchdog};

use crate::context::BoardContext;
use crate::error::{BringUpError, ReadError};
use crate::fuse::read_regulator_uv;

// ── HSLV decision ────────────────────────────────────────────────────────────

/// Why HSLVEN was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HslvSkipReason {
    /// No PMIC bound: the supply voltage is unknown.
    NoPmic,
    /// `vdd-supply` could not be read.
    RegulatorUnreadable(ReadError),
    /// The `product_below_2v5` fuse could not be read.
    FuseUnreadable(ReadError),
    /// `vdd-supply` is at or above the 2.7 V ceiling (value in µV).
    VddTooHigh(i64),
}

/// Outcome of the HSLVEN safety gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HslvDecision {
    /// Enable HSLVEN on every pad group; VDD measured at the given µV.
    Enable {
        /// Measured `vdd-supply`.
        vdd_uv: i64,
    },
    /// Leave HSLVEN cleared.
    Skip(HslvSkipReason),
}

impl HslvDecision {
    /// Whether the pad bits get written.
    pub const fn enables(&self) -> bool {
        matches!(self, Self::Enable { .. })
    }
}

/// Fuse and measured voltage disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FuseDiagnostic {
    /// HSLVEN was enabled but the fuse does not declare a sub-2.5 V part:
    /// the pads ignore the bit.
    ProtectedByHardware,
    /// The fuse declares a sub-2.5 V part but VDD is above 2.7 V: enabling
    /// HSLVEN would damage the chip, so it was not enabled.
    DestructiveUpdateSkipped,
}

impl FuseDiagnostic {
    /// Console text.
    pub const fn message(self) -> &'static str {
        match self {
            Self::ProtectedByHardware => "product_below_2v5=0: HSLVEN protected by HW",
            Self::DestructiveUpdateSkipped => {
                "product_below_2v5=1: HSLVEN update is destructive, no update as VDD>2.7V"
            }
        }
    }
}

/// Decide whether HSLVEN may be enabled.
///
/// `pmic_present` is `false` when no PMIC is bound; `vdd` and `fuse` are the
/// raw read results. Pure function.
pub fn decide_hslv(
    pmic_present: bool,
    vdd: Result<i64, ReadError>,
    fuse: Result<bool, ReadError>,
) -> (HslvDecision, Option<FuseDiagnostic>) {
    if !pmic_present {
        return (HslvDecision::Skip(HslvSkipReason::NoPmic), None);
    }
    let below_2v5 = match fuse {
        Ok(bit) => bit,
        Err(e) => return (HslvDecision::Skip(HslvSkipReason::FuseUnreadable(e)), None),
    };
    let vdd_uv = match vdd {
        Ok(uv) => uv,
        Err(e) => {
            return (
                HslvDecision::Skip(HslvSkipReason::RegulatorUnreadable(e)),
                None,
            )
        }
    };

    if vdd_uv < i64::from(VDD_HSLV_CEILING.get()) {
        let diag = (!below_2v5).then_some(FuseDiagnostic::ProtectedByHardware);
        (HslvDecision::Enable { vdd_uv }, diag)
    } else {
        let diag = below_2v5.then_some(FuseDiagnostic::DestructiveUpdateSkipped);
        (HslvDecision::Skip(HslvSkipReason::VddTooHigh(vdd_uv)), diag)
    }
}

// ── State types (zero-sized) ─────────────────────────────────────────────────

/// Registers as left by the ROM code.
pub struct Reset;

/// LTDC routed through AXI port 1.
pub struct InterconnectRouted;

/// BOOT pin pull-downs disabled on strapped pins.
pub struct BootPinsMirrored;

/// HSLVEN decided (and written, if allowed).
pub struct PadsConfigured;

/// I/O compensation running automatically.
pub struct Compensated;

// ── Sequencer ────────────────────────────────────────────────────────────────

/// Typestate SYSCFG sequencer. Only the next valid step is callable.
pub struct SyscfgSequencer<B, State> {
    regs: RegisterBlock<B>,
    _state: PhantomData<State>,
}

impl<B: RegisterBus, S> SyscfgSequencer<B, S> {
    fn advance<T>(self) -> SyscfgSequencer<B, T> {
        SyscfgSequencer {
            regs: self.regs,
            _state: PhantomData,
        }
    }
}

impl<B: RegisterBus> SyscfgSequencer<B, Reset> {
    /// Sequencer over the SYSCFG block at `base`.
    pub fn new(bus: B, base: usize) -> Self {
        Self {
            regs: RegisterBlock::new(bus, base),
            _state: PhantomData,
        }
    }

    /// Step 1: route AXI master 9 (LTDC) through port 1.
    #[must_use]
    pub fn route_interconnect(mut self) -> SyscfgSequencer<B, InterconnectRouted> {
        self.regs.modify::<Icnr>(|r| r.with_axi_m9_port1(true));
        self.advance()
    }
}

impl<B: RegisterBus> SyscfgSequencer<B, InterconnectRouted> {
    /// Step 2: disable the pull-down of every BOOT pin strapped high.
    #[must_use]
    pub fn mirror_boot_pins(mut self) -> SyscfgSequencer<B, BootPinsMirrored> {
        self.regs
            .modify::<Bootr>(Bootr::with_pulldown_mirroring_boot_pins);
        self.advance()
    }
}

impl<B: RegisterBus> SyscfgSequencer<B, BootPinsMirrored> {
    /// Step 3: write HSLVEN on all five pad groups if `decision` allows it.
    #[must_use]
    pub fn configure_pads(mut self, decision: &HslvDecision) -> SyscfgSequencer<B, PadsConfigured> {
        if decision.enables() {
            self.regs.write(IoCtrlSet::enable(HslvPads::all()));
        }
        self.advance()
    }
}

impl<B: RegisterBus> SyscfgSequencer<B, PadsConfigured> {
    /// Step 4: start automatic compensation and wait for CMPCR.READY, then
    /// release the software override.
    ///
    /// The wait has no timeout; the cell always converges on working silicon.
    /// `watchdog` is petted on every poll. Returns the sequencer and the
    /// number of polls that found the cell not ready.
    pub fn compensate<W: Watchdog>(
        mut self,
        watchdog: &mut W,
    ) -> (SyscfgSequencer<B, Compensated>, u32) {
        self.regs.write(CmpEnSet::mpu_enable());

        let mut polls: u32 = 0;
        while !self.regs.read::<Cmpcr>().ready() {
            watchdog.pet();
            polls = polls.saturating_add(1);
        }

        self.regs.modify::<Cmpcr>(|r| r.with_sw_ctrl(false));
        (self.advance(), polls)
    }
}

impl<B: RegisterBus> SyscfgSequencer<B, Compensated> {
    /// Release the bus.
    pub fn into_inner(self) -> B {
        self.regs.into_inner()
    }
}

// ── Driver ───────────────────────────────────────────────────────────────────

/// What [`sysconf_init`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysconfReport {
    /// HSLVEN gate outcome.
    pub hslv: HslvDecision,
    /// Fuse/voltage inconsistency, if any.
    pub diagnostic: Option<FuseDiagnostic>,
    /// Polls spent waiting for compensation.
    pub compensation_polls: u32,
}

/// Run the four SYSCFG steps in order.
///
/// The only error is a missing SYSCFG base. `pmic` is `None` when no PMIC is
/// bound; fuse facts come from `ctx`.
pub fn sysconf_init<B, P, W>(
    ctx: &BoardContext,
    bus: B,
    pmic: Option<&mut P>,
    watchdog: &mut W,
) -> Result<SysconfReport, BringUpError>
where
    B: RegisterBus,
    P: Pmic,
    W: Watchdog,
{
    let Some(base) = ctx.syscfg_base() else {
        error!("SYSCFG: no base address");
        return Err(BringUpError::FatalHardwareUnavailable);
    };

    let seq = SyscfgSequencer::new(bus, base)
        .route_interconnect()
        .mirror_boot_pins();

    let pmic_present = pmic.is_some();
    let vdd = read_regulator_uv(pmic, VDD_SUPPLY);
    let (hslv, diagnostic) = decide_hslv(pmic_present, vdd, ctx.product_below_2v5());
    match hslv {
        HslvDecision::Enable { vdd_uv } => {
            debug!("HSLVEN enabled, VDD = {} uV", vdd_uv);
        }
        HslvDecision::Skip(reason) => {
            debug!("HSLVEN not enabled: {}", reason.as_str());
        }
    }
    if let Some(diag) = diagnostic {
        error!("{}", diag.message());
    }

    let (seq, compensation_polls) = seq.configure_pads(&hslv).compensate(watchdog);
    let _ = seq.into_inner();

    Ok(SysconfReport {
        hslv,
        diagnostic,
        compensation_polls,
    })
}

impl HslvSkipReason {
    /// Short name for log lines.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoPmic => "no PMIC",
            Self::RegulatorUnreadable(_) => "vdd-supply unreadable",
            Self::FuseUnreadable(_) => "OTP unreadable",
            Self::VddTooHigh(_) => "VDD >= 2.7V",
        }
    }
}
