//! Power check state machine.
//!
//! ```text
//! [Sampling] --> [Classified] --> [Signaling] --> [Returned]
//!                      \               \--------> [Halted]
//!                       \--------------------------^  (no LED)
//! ```
//!
//! Each call to [`PowerCheck::step`] performs exactly one transition, and a
//! `Signaling` step is a single LED toggle followed by the half-period delay
//! and a watchdog pet. [`PowerCheck::run`] drives the machine to a terminal
//! state and hands `Halted` to the [`Halt`] primitive. Tests step the machine
//! themselves and never wait.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::StatefulOutputPin;
use platform::{AdcBank, AdcChannel, Halt, Watchdog};

use super::classify::{classify, Banners, BlinkDirective, PowerVerdict, BLINK_HALF_PERIOD_MS};
use super::envelope::{sample_channels, Samples, VoltageEnvelope};

/// Power check progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerCheckState {
    /// CC lines not sampled yet.
    Sampling,
    /// Verdict known, signal not started.
    Classified,
    /// Blinking the error LED.
    Signaling {
        /// Toggles still to perform.
        remaining_toggles: u64,
    },
    /// Done; boot continues.
    Returned,
    /// Done; boot must stop.
    Halted,
}

impl PowerCheckState {
    /// `Returned` or `Halted`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Returned | Self::Halted)
    }
}

/// Result of a power check that let the boot continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerCheckReport {
    /// Verdict.
    pub verdict: PowerVerdict,
    /// Reduced readings.
    pub envelope: VoltageEnvelope,
    /// Per-channel readings.
    pub samples: Samples,
    /// Console lines printed.
    pub banners: Banners,
    /// LED toggles performed.
    pub toggles: u64,
}

/// USB Type-C power check over a set of CC sense channels.
pub struct PowerCheck<'a, A, L, D, W> {
    adc: &'a mut A,
    channels: &'a [AdcChannel],
    led: Option<&'a mut L>,
    delay: &'a mut D,
    watchdog: &'a mut W,
    state: PowerCheckState,
    verdict: PowerVerdict,
    directive: BlinkDirective,
    envelope: VoltageEnvelope,
    samples: Samples,
    banners: Banners,
    toggles: u64,
}

impl<'a, A, L, D, W> PowerCheck<'a, A, L, D, W>
where
    A: AdcBank,
    L: StatefulOutputPin,
    D: DelayNs,
    W: Watchdog,
{
    /// New check in the `Sampling` state. `led` is `None` when the board has
    /// no error LED; the verdict and halt decision are unchanged.
    pub fn new(
        adc: &'a mut A,
        channels: &'a [AdcChannel],
        led: Option<&'a mut L>,
        delay: &'a mut D,
        watchdog: &'a mut W,
    ) -> Self {
        Self {
            adc,
            channels,
            led,
            delay,
            watchdog,
            state: PowerCheckState::Sampling,
            verdict: PowerVerdict::Proceed,
            directive: BlinkDirective::None,
            envelope: VoltageEnvelope::EMPTY,
            samples: Samples::new(),
            banners: Banners::new(),
            toggles: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> PowerCheckState {
        self.state
    }

    /// Verdict (meaningful from `Classified` on).
    pub fn verdict(&self) -> PowerVerdict {
        self.verdict
    }

    /// Blink directive (meaningful from `Classified` on).
    pub fn directive(&self) -> BlinkDirective {
        self.directive
    }

    /// Perform one transition and return the new state. Terminal states are
    /// sticky.
    pub fn step(&mut self) -> PowerCheckState {
        self.state = match self.state {
            PowerCheckState::Sampling => {
                self.sample_and_classify();
                PowerCheckState::Classified
            }
            PowerCheckState::Classified => self.start_signal(),
            PowerCheckState::Signaling { remaining_toggles } => self.toggle_once(remaining_toggles),
            terminal @ (PowerCheckState::Returned | PowerCheckState::Halted) => terminal,
        };
        self.state
    }

    /// Drive the check to completion.
    ///
    /// Returns the report if the boot may continue; a halting verdict ends in
    /// [`Halt::hang`] and never returns.
    pub fn run<H: Halt>(mut self, halt: &mut H) -> PowerCheckReport {
        while !self.state.is_terminal() {
            self.step();
        }
        if self.state == PowerCheckState::Halted {
            error!("USB TYPE-C power check: boot stopped ({})", self.verdict.as_str());
            halt.hang();
        }
        self.into_report()
    }

    /// Report of what has happened so far.
    pub fn into_report(self) -> PowerCheckReport {
        PowerCheckReport {
            verdict: self.verdict,
            envelope: self.envelope,
            samples: self.samples,
            banners: self.banners,
            toggles: self.toggles,
        }
    }

    fn sample_and_classify(&mut self) {
        if self.channels.is_empty() {
            debug!("no USB-PD sense channel configured");
            self.verdict = PowerVerdict::Proceed;
            self.directive = BlinkDirective::None;
            return;
        }

        let (envelope, samples) = sample_channels(&mut *self.adc, self.channels);
        let classification = classify(envelope);
        debug!("CC envelope: max={} uV min={} uV", envelope.max_uv, envelope.min_uv);

        for line in &classification.banners {
            error!("{}", *line);
        }

        self.envelope = envelope;
        self.samples = samples;
        self.verdict = classification.verdict;
        self.directive = classification.directive;
        self.banners = classification.banners;
    }

    fn start_signal(&mut self) -> PowerCheckState {
        let toggles = self.directive.toggles();
        if toggles == 0 || self.led.is_none() {
            return self.finish();
        }
        PowerCheckState::Signaling {
            remaining_toggles: toggles,
        }
    }

    fn toggle_once(&mut self, remaining: u64) -> PowerCheckState {
        if let Some(led) = self.led.as_deref_mut() {
            let _ = led.toggle();
        }
        self.delay.delay_ms(BLINK_HALF_PERIOD_MS);
        self.watchdog.pet();
        self.toggles = self.toggles.saturating_add(1);

        match remaining.saturating_sub(1) {
            0 => self.finish(),
            left => PowerCheckState::Signaling {
                remaining_toggles: left,
            },
        }
    }

    fn finish(&self) -> PowerCheckState {
        if self.directive.is_terminal() {
            PowerCheckState::Halted
        } else {
            PowerCheckState::Returned
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::{MockAdc, MockDelay, MockLed, MockWatchdog, PanicHalt};

    const CC1: AdcChannel = AdcChannel::new("adc@0", 18);
    const CC2: AdcChannel = AdcChannel::new("adc@0", 19);
    const CHANNELS: &[AdcChannel] = &[CC1, CC2];

    fn adc(cc1_uv: i32, cc2_uv: i32) -> MockAdc {
        MockAdc::new()
            .with_channel(CC1, 0, cc1_uv)
            .with_channel(CC2, 0, cc2_uv)
    }

    #[test]
    fn three_amp_source_goes_straight_to_returned() {
        let mut adc = adc(1_700_000, 90_000);
        let (mut led, mut delay, mut wdg) = (MockLed::new(), MockDelay::new(), MockWatchdog::new());
        let mut check = PowerCheck::new(&mut adc, CHANNELS, Some(&mut led), &mut delay, &mut wdg);

        assert_eq!(check.step(), PowerCheckState::Classified);
        assert_eq!(check.verdict(), PowerVerdict::Proceed);
        assert_eq!(check.step(), PowerCheckState::Returned);
        assert_eq!(check.into_report().toggles, 0);
        assert_eq!(led.toggles(), 0);
    }

    #[test]
    fn warn_500ma_blinks_twice_and_returns() {
        let mut adc = adc(500_000, 100_000);
        let (mut led, mut delay, mut wdg) = (MockLed::new(), MockDelay::new(), MockWatchdog::new());
        let report = PowerCheck::new(&mut adc, CHANNELS, Some(&mut led), &mut delay, &mut wdg)
            .run(&mut PanicHalt);

        assert_eq!(report.verdict, PowerVerdict::WarnLow500mA);
        assert_eq!(report.toggles, 4);
        assert_eq!(led.toggles(), 4);
        assert_eq!(wdg.pets(), 4);
        assert_eq!(delay.ms_calls(), &[125, 125, 125, 125]);
    }

    #[test]
    fn unattached_enters_unbounded_signaling() {
        let mut adc = adc(50_000, 40_000);
        let (mut led, mut delay, mut wdg) = (MockLed::new(), MockDelay::new(), MockWatchdog::new());
        let mut check = PowerCheck::new(&mut adc, CHANNELS, Some(&mut led), &mut delay, &mut wdg);

        check.step();
        assert_eq!(check.directive(), BlinkDirective::Unbounded);
        assert_eq!(
            check.step(),
            PowerCheckState::Signaling {
                remaining_toggles: 2 * u64::from(u32::MAX)
            }
        );
        for _ in 0..10 {
            check.step();
        }
        assert_eq!(
            check.state(),
            PowerCheckState::Signaling {
                remaining_toggles: 2 * u64::from(u32::MAX) - 10
            }
        );
    }

    #[test]
    fn last_unbounded_toggle_halts() {
        let mut adc = adc(2_400_000, 10_000);
        let (mut led, mut delay, mut wdg) = (MockLed::new(), MockDelay::new(), MockWatchdog::new());
        let mut check = PowerCheck::new(&mut adc, CHANNELS, Some(&mut led), &mut delay, &mut wdg);
        check.step();
        check.step();
        check.state = PowerCheckState::Signaling {
            remaining_toggles: 1,
        };
        assert_eq!(check.step(), PowerCheckState::Halted);
        assert_eq!(check.step(), PowerCheckState::Halted);
    }

    #[test]
    #[should_panic(expected = "halted")]
    fn missing_led_still_halts() {
        let mut adc = adc(2_400_000, 10_000);
        let (mut delay, mut wdg) = (MockDelay::new(), MockWatchdog::new());
        let _ = PowerCheck::new(&mut adc, CHANNELS, None::<&mut MockLed>, &mut delay, &mut wdg)
            .run(&mut PanicHalt);
    }

    #[test]
    fn missing_led_skips_blink_for_warnings() {
        let mut adc = adc(1_000_000, 10_000);
        let (mut delay, mut wdg) = (MockDelay::new(), MockWatchdog::new());
        let report = PowerCheck::new(&mut adc, CHANNELS, None::<&mut MockLed>, &mut delay, &mut wdg)
            .run(&mut PanicHalt);
        assert_eq!(report.verdict, PowerVerdict::WarnLow1A5);
        assert_eq!(report.toggles, 0);
        assert!(delay.ms_calls().is_empty());
    }

    #[test]
    fn no_channels_is_a_no_op() {
        let mut adc = MockAdc::new();
        let (mut led, mut delay, mut wdg) = (MockLed::new(), MockDelay::new(), MockWatchdog::new());
        let report = PowerCheck::new(&mut adc, &[], Some(&mut led), &mut delay, &mut wdg)
            .run(&mut PanicHalt);
        assert_eq!(report.verdict, PowerVerdict::Proceed);
        assert!(report.banners.is_empty());
        assert!(adc.conversions().is_empty());
    }

    #[test]
    fn all_channels_failing_is_undetermined_with_one_blink() {
        let mut adc = MockAdc::new().with_failing_channel(CC1).with_failing_channel(CC2);
        let (mut led, mut delay, mut wdg) = (MockLed::new(), MockDelay::new(), MockWatchdog::new());
        let report = PowerCheck::new(&mut adc, CHANNELS, Some(&mut led), &mut delay, &mut wdg)
            .run(&mut PanicHalt);
        assert_eq!(report.verdict, PowerVerdict::Undetermined);
        assert_eq!(report.toggles, 2);
    }
}
