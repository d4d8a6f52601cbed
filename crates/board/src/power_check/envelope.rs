//! CC-line sampling and min/max reduction.

use heapless::Vec;
use platform::{AdcBank, AdcChannel};

use super::classify::USB_START_HIGH_THRESHOLD_UV;
use crate::config::MAX_USB_PD_CHANNELS;

/// One conversion result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoltageSample {
    /// Channel converted.
    pub channel: AdcChannel,
    /// Raw ADC code (0 if the conversion failed).
    pub raw: u32,
    /// Calibrated value in µV (0 if invalid).
    pub microvolts: i32,
    /// Both conversion and calibration succeeded.
    pub valid: bool,
}

/// Highest and lowest valid reading across all CC channels.
///
/// Starts at `(0, START_HIGH)` so that an envelope with no valid reading
/// matches none of the classification buckets except the fall-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoltageEnvelope {
    /// Highest reading in µV.
    pub max_uv: i32,
    /// Lowest reading in µV.
    pub min_uv: i32,
}

impl VoltageEnvelope {
    /// Envelope before any reading.
    pub const EMPTY: Self = Self {
        max_uv: 0,
        min_uv: USB_START_HIGH_THRESHOLD_UV,
    };

    /// Envelope from an explicit pair.
    pub const fn new(max_uv: i32, min_uv: i32) -> Self {
        Self { max_uv, min_uv }
    }

    /// Widen the envelope to include `uv`.
    #[must_use]
    pub fn including(self, uv: i32) -> Self {
        Self {
            max_uv: self.max_uv.max(uv),
            min_uv: self.min_uv.min(uv),
        }
    }
}

impl Default for VoltageEnvelope {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Samples kept for reporting.
pub type Samples = Vec<VoltageSample, MAX_USB_PD_CHANNELS>;

/// Convert every channel once, in order, and reduce the valid readings.
///
/// A channel whose conversion or calibration fails is logged and left out of
/// the envelope. Channels past [`MAX_USB_PD_CHANNELS`] still count towards
/// the envelope but are not kept in the returned samples.
pub fn sample_channels<A: AdcBank>(
    adc: &mut A,
    channels: &[AdcChannel],
) -> (VoltageEnvelope, Samples) {
    let mut envelope = VoltageEnvelope::EMPTY;
    let mut samples = Samples::new();

    for &channel in channels {
        let sample = match adc.single_shot(channel) {
            Err(_) => {
                warn!("{} ch{}: conversion failed", channel.device, channel.channel);
                VoltageSample {
                    channel,
                    raw: 0,
                    microvolts: 0,
                    valid: false,
                }
            }
            Ok(raw) => match adc.raw_to_microvolts(channel, raw) {
                Err(_) => {
                    warn!("{} ch{}: calibration failed", channel.device, channel.channel);
                    VoltageSample {
                        channel,
                        raw,
                        microvolts: 0,
                        valid: false,
                    }
                }
                Ok(uv) => {
                    debug!("{} ch{}: raw={} uV={}", channel.device, channel.channel, raw, uv);
                    envelope = envelope.including(uv);
                    VoltageSample {
                        channel,
                        raw,
                        microvolts: uv,
                        valid: true,
                    }
                }
            },
        };
        let _ = samples.push(sample);
    }

    (envelope, samples)
}
