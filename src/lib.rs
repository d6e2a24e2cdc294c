//! # Chordboard
//!
//! Chordboard turns the computer keyboard into a chord instrument: a mapped
//! key names a root note and octave, the current chord type harmonizes it,
//! and a sine synthesizer renders the result as simultaneous, self-expiring
//! voices with a pluck envelope.
//!
//! ## Modules
//!
//! - `types`: The theory engine - pitch classes, chord types and their
//!   interval tables, the session chord selection, and the fixed key-to-note
//!   mapping. Pure computation, no I/O.
//! - `audio`: The voice renderer - envelope, voice, mixer, and the cpal
//!   output player with lazy one-time initialization.
//! - `commands` / `repl`: The terminal front-end that wires user input to
//!   the engine.

pub mod audio;
pub mod commands;
pub mod repl;
pub mod types;

// Re-export commonly used types for convenience
pub use crate::audio::{note_to_frequency, AudioPlayer, Mixer, VoiceId};
pub use crate::types::{ChordSelection, ChordType, NoteName};
