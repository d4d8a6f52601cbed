//! USB Type-C source classification.
//!
//! A Type-C source advertises its current capability through the voltage it
//! pulls the CC line to; the sink side's Rd makes the other CC line sit near
//! ground. With both CC lines sensed, the higher reading tells the
//! advertisement and the lower one tells that a cable is actually there.
//!
//! | max (µV)                | min (µV)  | Verdict           | Blink     |
//! |-------------------------|-----------|-------------------|-----------|
//! | 1 230 000 < x ≤ 2 150 000 | ≤ 200 000 | Proceed (3 A)    | none      |
//! | > 2 150 000             | any       | NonCompliantHigh  | unbounded |
//! | ≤ 200 000 or > 200 000  | same side | Unattached        | unbounded |
//! | 200 000 < x ≤ 660 000   | ≤ 200 000 | WarnLow500mA      | 2         |
//! | 660 000 < x ≤ 1 230 000 | ≤ 200 000 | WarnLow1A5        | 3         |
//! | anything else           |           | Undetermined      | 1         |

use heapless::Vec;

use super::envelope::VoltageEnvelope;

/// At or below this, a CC line is considered grounded.
pub const USB_LOW_THRESHOLD_UV: i32 = 200_000;
/// Upper bound of a default-USB (500 mA) advertisement.
pub const USB_WARNING_LOW_THRESHOLD_UV: i32 = 660_000;
/// Upper bound of a 1.5 A advertisement.
pub const USB_START_LOW_THRESHOLD_UV: i32 = 1_230_000;
/// Upper bound of a 3 A advertisement.
pub const USB_START_HIGH_THRESHOLD_UV: i32 = 2_150_000;

/// Classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerVerdict {
    /// 3 A source attached.
    Proceed,
    /// Default USB power (500 mA).
    WarnLow500mA,
    /// 1.5 A source.
    WarnLow1A5,
    /// Source advertises more than the Type-C specification allows.
    NonCompliantHigh,
    /// No cable, or both CC lines pulled up.
    Unattached,
    /// No bucket matched (only reachable without any valid reading).
    Undetermined,
}

impl PowerVerdict {
    /// Whether the boot must stop.
    pub const fn halts(self) -> bool {
        matches!(self, Self::NonCompliantHigh | Self::Unattached)
    }

    /// Blink policy for this verdict.
    pub const fn directive(self) -> BlinkDirective {
        match self {
            Self::Proceed => BlinkDirective::None,
            Self::WarnLow500mA => BlinkDirective::Finite(2),
            Self::WarnLow1A5 => BlinkDirective::Finite(3),
            Self::Undetermined => BlinkDirective::Finite(1),
            Self::NonCompliantHigh | Self::Unattached => BlinkDirective::Unbounded,
        }
    }

    /// Short name for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::WarnLow500mA => "500mA",
            Self::WarnLow1A5 => "1.5A",
            Self::NonCompliantHigh => "non-compliant",
            Self::Unattached => "unattached",
            Self::Undetermined => "undetermined",
        }
    }
}

/// How the error LED signals a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkDirective {
    /// No signal.
    None,
    /// Blink this many times, then continue booting.
    Finite(u32),
    /// Blink for `u32::MAX` cycles (about 17 years at 125 ms), then halt.
    Unbounded,
}

/// LED half-period.
pub const BLINK_HALF_PERIOD_MS: u32 = 125;

impl BlinkDirective {
    /// Blink count used for the unbounded directive.
    pub const UNBOUNDED_BLINKS: u32 = u32::MAX;

    /// LED toggles to perform (two per blink).
    pub const fn toggles(self) -> u64 {
        let blinks = match self {
            Self::None => 0,
            Self::Finite(n) => n,
            Self::Unbounded => Self::UNBOUNDED_BLINKS,
        };
        (blinks as u64).saturating_mul(2)
    }

    /// Whether the directive ends in a halt.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

/// Console banner lines.
pub mod banner {
    /// Unattached, first line.
    pub const UNATTACHED: &str = "ERROR USB TYPE-C connection in unattached mode";
    /// Unattached, second line.
    pub const CHECK_CABLE: &str = "Check that USB TYPE-C cable is correctly plugged";
    /// 500 mA source.
    pub const WARN_500MA: &str = "WARNING 500mA power supply detected";
    /// 1.5 A source.
    pub const WARN_1A5: &str = "WARNING 1.5A power supply detected";
    /// Over-advertising source.
    pub const NOT_COMPLIANT: &str = "USB TYPE-C charger not compliant with specification";
    /// Every other failed check.
    pub const CURRENT_TOO_LOW: &str = "Current too low, use a 3A power supply!";
}

/// Banner lines for one classification.
pub type Banners = Vec<&'static str, 4>;

/// Verdict plus everything printed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Verdict.
    pub verdict: PowerVerdict,
    /// Blink policy.
    pub directive: BlinkDirective,
    /// Console lines, in print order. Empty for [`PowerVerdict::Proceed`].
    pub banners: Banners,
}

const fn grounded(uv: i32) -> bool {
    uv <= USB_LOW_THRESHOLD_UV
}

/// Classify an envelope. Pure function.
///
/// The 3 A check runs first and returns without any banner. The remaining
/// buckets are evaluated in table order; when the envelope is both
/// unattached and non-compliant, both banners are emitted and the verdict is
/// [`PowerVerdict::NonCompliantHigh`].
pub fn classify(env: VoltageEnvelope) -> Classification {
    let VoltageEnvelope { max_uv, min_uv } = env;

    if max_uv > USB_START_LOW_THRESHOLD_UV && max_uv <= USB_START_HIGH_THRESHOLD_UV && grounded(min_uv) {
        return Classification {
            verdict: PowerVerdict::Proceed,
            directive: BlinkDirective::None,
            banners: Banners::new(),
        };
    }

    let mut banners = Banners::new();
    let mut verdict = PowerVerdict::Undetermined;

    if grounded(max_uv) == grounded(min_uv) {
        let _ = banners.push(banner::UNATTACHED);
        let _ = banners.push(banner::CHECK_CABLE);
        verdict = PowerVerdict::Unattached;
    }

    if !grounded(max_uv) && max_uv <= USB_WARNING_LOW_THRESHOLD_UV && grounded(min_uv) {
        let _ = banners.push(banner::WARN_500MA);
        verdict = PowerVerdict::WarnLow500mA;
    }

    if max_uv > USB_WARNING_LOW_THRESHOLD_UV && max_uv <= USB_START_LOW_THRESHOLD_UV && grounded(min_uv) {
        let _ = banners.push(banner::WARN_1A5);
        verdict = PowerVerdict::WarnLow1A5;
    }

    if max_uv > USB_START_HIGH_THRESHOLD_UV {
        let _ = banners.push(banner::NOT_COMPLIANT);
        verdict = PowerVerdict::NonCompliantHigh;
    } else {
        let _ = banners.push(banner::CURRENT_TOO_LOW);
    }

    Classification {
        verdict,
        directive: verdict.directive(),
        banners,
    }
}
