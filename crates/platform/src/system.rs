//! Watchdog and terminal halt
//!
//! The independent watchdog is armed by the ROM code on secure boots, so any
//! loop that can outlast its timeout (the power-supply warning blink) must
//! pet it.

/// Independent watchdog.
pub trait Watchdog {
    /// Reload the watchdog counter.
    fn pet(&mut self);
}

impl<W: Watchdog + ?Sized> Watchdog for &mut W {
    fn pet(&mut self) {
        (**self).pet();
    }
}

/// Watchdog stand-in for boards where IWDG is not started.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledWatchdog;

impl Watchdog for DisabledWatchdog {
    fn pet(&mut self) {}
}

/// Terminal halt: stop the boot flow for good.
pub trait Halt {
    /// Never returns.
    fn hang(&mut self) -> !;
}

impl<H: Halt + ?Sized> Halt for &mut H {
    fn hang(&mut self) -> ! {
        (**self).hang()
    }
}

/// Busy-wait forever.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinHalt;

impl Halt for SpinHalt {
    #[allow(clippy::empty_loop)]
    fn hang(&mut self) -> ! {
        loop {
            core::hint::spin_loop();
        }
    }
}
