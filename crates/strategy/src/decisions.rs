use core_sim::{pick, round_to, RandomSource};
use time::OffsetDateTime;

use crate::signals::SignalKind;

const CONFIDENCE_RANGE: (f64, f64) = (0.65, 0.95);

/// A mock model override of an incoming signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub at: OffsetDateTime,
    pub original: SignalKind,
    pub final_action: SignalKind,
    pub confidence: f64,
    pub reason: String,
}

impl Decision {
    pub fn recommendation(&self) -> String {
        format!(
            "RL recommends: {}, confidence: {}",
            self.final_action.as_str(),
            self.confidence
        )
    }
}

/// Explanation attached to a decision. Strictly greater than `threshold` passes.
pub fn decision_reason(confidence: f64, threshold: f64) -> String {
    if confidence > threshold {
        format!("Confidence {:.1}% met threshold.", confidence * 100.0)
    } else {
        "Insufficient confidence.".to_owned()
    }
}

pub fn synth_decision<R>(rng: &mut R, at: OffsetDateTime, threshold: f64) -> Decision
where
    R: RandomSource + ?Sized,
{
    let original = *pick(rng, &SignalKind::ALL);
    let final_action = *pick(rng, &SignalKind::ALL);
    let confidence = round_to(rng.uniform(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1), 2);

    Decision {
        at,
        original,
        final_action,
        confidence,
        reason: decision_reason(confidence, threshold),
    }
}
