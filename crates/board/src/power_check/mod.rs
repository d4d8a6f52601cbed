//! USB Type-C power supply check.
//!
//! Boards powered through a USB Type-C connector sense both CC lines with the
//! ADC. The readings are reduced to a min/max envelope, classified against
//! the Type-C current advertisement levels, and anything short of a 3 A
//! source is signalled on the error LED. An unattached or non-compliant
//! source stops the boot.
//!
//! - [`envelope`]: sampling and reduction
//! - [`classify`]: thresholds and verdicts (pure)
//! - [`signal`]: the `Sampling → Classified → Signaling → Returned | Halted`
//!   state machine

pub mod classify;
pub mod envelope;
pub mod signal;

pub use classify::{classify, BlinkDirective, Classification, PowerVerdict};
pub use envelope::{sample_channels, VoltageEnvelope, VoltageSample};
pub use signal::{PowerCheck, PowerCheckReport, PowerCheckState};
