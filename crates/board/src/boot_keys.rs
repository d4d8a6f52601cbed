//! Forced boot mode keys.
//!
//! Holding the fastboot or STM32CubeProgrammer key at reset requests a
//! download mode. The keys are sampled once; the request is recorded in the
//! TAMP boot context for the next stage. Pins are passed in already
//! configured as inputs with their device-tree polarity applied, so "high"
//! means pressed.

use embedded_hal::digital::InputPin;
use platform::{BootContext, ForcedBootMode};

fn pressed<P: InputPin>(pin: Option<&mut P>) -> bool {
    pin.is_some_and(|p| p.is_high().unwrap_or(false))
}

/// Forced mode requested by the keys. STM32CubeProgrammer wins over
/// fastboot.
pub fn forced_mode_from_keys<F, S>(fastboot: Option<&mut F>, stm32prog: Option<&mut S>) -> ForcedBootMode
where
    F: InputPin,
    S: InputPin,
{
    let mut mode = ForcedBootMode::Normal;
    if pressed(fastboot) {
        info!("Fastboot key pressed");
        mode = ForcedBootMode::Fastboot;
    }
    if pressed(stm32prog) {
        info!("STM32Programmer key pressed");
        mode = ForcedBootMode::Stm32Prog;
    }
    mode
}

/// Sample the keys and latch a download mode into the boot context.
///
/// Returns the mode written, or [`ForcedBootMode::Normal`] if nothing was
/// written.
pub fn board_key_check<C, F, S>(
    ctx: &mut C,
    fastboot: Option<&mut F>,
    stm32prog: Option<&mut S>,
) -> ForcedBootMode
where
    C: BootContext,
    F: InputPin,
    S: InputPin,
{
    let mode = forced_mode_from_keys(fastboot, stm32prog);
    if mode != ForcedBootMode::Normal {
        info!("entering download mode...");
        ctx.force_boot_mode(mode);
    }
    mode
}
