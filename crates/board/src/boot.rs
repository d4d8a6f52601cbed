//! Board init drivers.
//!
//! `board_init` runs before relocation with only SYSRAM available;
//! `board_late_init` runs once the console and environment are up.
//! Both take the [`BoardContext`] filled at probe time and return what they did
//! instead of writing global state.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};
use heapless::Vec;
use platform::{
    AdcBank, BootContext, BootModeCode, ForcedBootMode, Halt, Pmic, RegisterBus, Watchdog,
};

use crate::board_id::{board_banner, board_id_line, BannerLine, BoardId, EnvValue};
use crate::boot_keys::board_key_check;
use crate::context::BoardContext;
use crate::env_location::bootdelay_override;
use crate::error::BringUpError;
use crate::power_check::{PowerCheck, PowerCheckReport};
use crate::sysconf::{sysconf_init, SysconfReport};

/// Ordered list of bring-up steps.
///
/// # Ordering invariants
///
/// - The forced boot mode is latched before SYSCFG is touched, so a key held
///   at reset is honoured even if the register sequence never completes.
/// - The SYSCFG steps run in the order ICNR, BOOTR, IOCTRLSETR, CMPCR. HSLVEN
///   is gated on VDD and the OTP fuse; compensation starts only after the pad
///   mode is final.
/// - The power check runs after the console is up so its banners are visible.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. board_init: sample fastboot / STM32Programmer keys, latch TAMP forced mode",
    "2. board_init: SYSCFG ICNR, route AXI master 9 to DDR port 1",
    "3. board_init: SYSCFG BOOTR, mirror BOOT pins into pull-down control",
    "4. board_init: SYSCFG IOCTRLSETR, HSLVEN only if VDD < 2.7V",
    "5. board_init: SYSCFG CMPENSETR, wait for CMPCR.READY, hand over from SW_CTRL",
    "6. board_late_init: board_name, board_id, board_rev",
    "7. board_late_init: USB Type-C power check",
    "8. board_late_init: bootdelay=0 for serial and USB boots",
];

/// What [`board_init`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardInitReport {
    /// Boot parameter (ATAGs / FDT) address.
    pub boot_params_addr: usize,
    /// Mode latched by the boot keys.
    pub forced: ForcedBootMode,
    /// SYSCFG sequence result; `None` when the secure firmware owns SYSCFG.
    pub sysconf: Option<SysconfReport>,
}

/// Early board init: boot keys, then the SYSCFG sequence in basic mode.
///
/// `fastboot` and `stm32prog` are `None` on boards without those keys, `pmic`
/// is `None` when no PMIC is bound.
pub fn board_init<B, C, F, S, P, W>(
    ctx: &BoardContext,
    syscfg: B,
    boot_ctx: &mut C,
    fastboot: Option<&mut F>,
    stm32prog: Option<&mut S>,
    pmic: Option<&mut P>,
    watchdog: &mut W,
) -> Result<BoardInitReport, BringUpError>
where
    B: RegisterBus,
    C: BootContext,
    F: InputPin,
    S: InputPin,
    P: Pmic,
    W: Watchdog,
{
    let config = ctx.config();
    let forced = board_key_check(boot_ctx, fastboot, stm32prog);

    let sysconf = if config.security.owns_syscfg() {
        Some(sysconf_init(ctx, syscfg, pmic, watchdog)?)
    } else {
        debug!("SYSCFG owned by secure firmware ({})", config.security.as_str());
        None
    };

    Ok(BoardInitReport {
        boot_params_addr: config.boot_params_addr,
        forced,
        sysconf,
    })
}

/// `checkboard` console lines.
pub type Checkboard = Vec<BannerLine, 2>;

/// Board banner, plus the decoded board OTP if it is programmed.
pub fn checkboard(ctx: &BoardContext) -> Checkboard {
    let mut lines = Checkboard::new();
    let _ = lines.push(board_banner(ctx.config()));
    if let Some(id) = ctx.board_otp().ok().and_then(BoardId::from_otp) {
        let _ = lines.push(board_id_line(&id));
    }
    for line in &lines {
        info!("{}", line.as_str());
    }
    lines
}

/// What [`board_late_init`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LateInitReport {
    /// `board_name` environment value.
    pub board_name: &'static str,
    /// `board_id` environment value, if the board OTP is programmed.
    pub board_id: Option<EnvValue>,
    /// `board_rev` environment value, if the board OTP is programmed.
    pub board_rev: Option<EnvValue>,
    /// Power check outcome. Boards without sense channels always proceed.
    pub power: PowerCheckReport,
    /// `bootdelay` override.
    pub bootdelay: Option<u32>,
}

/// Late board init: identity env values, power check, bootdelay policy.
///
/// A halting power verdict ends in [`Halt::hang`] and never returns.
pub fn board_late_init<A, L, D, W, H>(
    ctx: &BoardContext,
    boot_mode: BootModeCode,
    adc: &mut A,
    led: Option<&mut L>,
    delay: &mut D,
    watchdog: &mut W,
    halt: &mut H,
) -> LateInitReport
where
    A: AdcBank,
    L: StatefulOutputPin,
    D: DelayNs,
    W: Watchdog,
    H: Halt,
{
    let config = ctx.config();
    let board_name = config.board_name();

    let id = ctx.board_otp().ok().and_then(BoardId::from_otp);
    let board_id = id.map(|id| id.board_id_env());
    let board_rev = id.map(|id| id.board_rev_env());

    let power = PowerCheck::new(adc, config.usb_pd_channels, led, delay, watchdog).run(halt);

    let bootdelay = bootdelay_override(boot_mode.device());
    if bootdelay.is_some() {
        debug!("boot from {}: bootdelay=0", boot_mode.device().as_str());
    }

    LateInitReport {
        board_name,
        board_id,
        board_rev,
        power,
        bootdelay,
    }
}

/// Turn the boot LED off before handing over to the OS.
pub fn board_quiesce_devices<L: OutputPin>(led: Option<&mut L>) {
    if let Some(led) = led {
        let _ = led.set_low();
    }
}
