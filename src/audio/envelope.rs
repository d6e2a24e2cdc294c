//! Attack/decay amplitude envelope
//!
//! Every voice gets the same fixed pluck shape: silence at trigger, a fast
//! linear ramp to the peak, then an exponential fall toward a quiet floor at
//! the scheduled stop. The floor is never zero - an exponential ramp cannot
//! reach zero, and aiming it there produces a discontinuity instead of a
//! fade.

/// Attack length in seconds. Fast enough to feel immediate, long enough to
/// avoid an audible click at onset.
const ATTACK_SECS: f32 = 0.05;

/// Peak amplitude of a single voice.
const PEAK_LEVEL: f32 = 0.25;

/// Decay target at the scheduled stop.
const FLOOR_LEVEL: f32 = 0.01;

/// Envelope stages, in order of traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Linear rise from 0 to the peak.
    Attack,
    /// Exponential fall from the peak toward the floor.
    Decay,
    /// Scheduled stop reached, output is 0.
    Done,
}

/// Sample-accurate amplitude envelope with a fixed attack/decay shape.
///
/// The per-sample decay ratio is precomputed so the level lands on the
/// floor exactly when the scheduled number of samples has elapsed.
#[derive(Debug, Clone)]
pub struct Envelope {
    stage: EnvelopeStage,
    level: f32,
    attack_step: f32,
    decay_ratio: f32,
    samples_left: u64,
}

impl Envelope {
    /// Create an envelope spanning `duration_secs` at the given sample rate.
    pub fn new(duration_secs: f32, sample_rate: f32) -> Self {
        let total = (duration_secs * sample_rate).round().max(1.0) as u64;
        let attack = ((ATTACK_SECS * sample_rate).round() as u64).clamp(1, total);
        let decay = (total - attack).max(1);

        Envelope {
            stage: EnvelopeStage::Attack,
            level: 0.0,
            attack_step: PEAK_LEVEL / attack as f32,
            decay_ratio: (FLOOR_LEVEL / PEAK_LEVEL).powf(1.0 / decay as f32),
            samples_left: total,
        }
    }

    /// Advance one sample and return the amplitude (0.0 to the peak).
    pub fn next_sample(&mut self) -> f32 {
        if self.samples_left == 0 {
            self.stage = EnvelopeStage::Done;
            self.level = 0.0;
            return 0.0;
        }
        self.samples_left -= 1;

        match self.stage {
            EnvelopeStage::Attack => {
                self.level += self.attack_step;
                if self.level >= PEAK_LEVEL {
                    self.level = PEAK_LEVEL;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level *= self.decay_ratio;
            }
            EnvelopeStage::Done => {
                self.level = 0.0;
            }
        }

        self.level
    }

    /// True once the scheduled stop has elapsed.
    pub fn is_finished(&self) -> bool {
        self.samples_left == 0
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}
