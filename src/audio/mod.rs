pub mod engine;
pub mod envelope;
pub mod voice;

pub use engine::{
    note_to_frequency, AudioPlayer, Mixer, PlayerState, DEFAULT_DURATION_SECS, MASTER_GAIN,
};
pub use envelope::{Envelope, EnvelopeStage};
pub use voice::{Voice, VoiceId};
