//! Voice renderer: mixer and audio output
//!
//! `Mixer` is the pure half - it owns the voice pool and a running sample
//! clock, and can be exercised sample-by-sample without an audio device.
//! `AudioPlayer` wraps it in a cpal output stream with lazy, idempotent
//! initialization: the output context is created once, on the first play,
//! and lives for the rest of the session.

use crate::audio::voice::{Voice, VoiceId};
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

/// Master output level, fixed below full scale so stacked voices don't clip.
pub const MASTER_GAIN: f32 = 0.3;

/// Chord length when the caller doesn't ask for one.
pub const DEFAULT_DURATION_SECS: f32 = 1.0;

/// Frequency returned by [`note_to_frequency`] for unrecognized pitch
/// classes. Permissive degradation, not an error path.
pub const FALLBACK_FREQUENCY: f32 = 440.0;

/// Base frequencies for the 12 pitch classes at octave 4, A4 = 440 Hz.
const BASE_OCTAVE_FREQUENCIES: [f32; 12] = [
    261.63, // C4
    277.18, // C#4/Db4
    293.66, // D4
    311.13, // D#4/Eb4
    329.63, // E4
    349.23, // F4
    369.99, // F#4/Gb4
    392.00, // G4
    415.30, // G#4/Ab4
    440.00, // A4
    466.16, // A#4/Bb4
    493.88, // B4
];

/// Mixes the live voice pool down to a mono sample stream.
///
/// Voices are independent and self-expiring: each chord trigger appends one
/// voice per frequency, all stamped with the same start clock, and
/// `next_sample` retires voices whose scheduled stop has elapsed. No cap,
/// no stealing, no cancellation - tones ring until their stop time.
pub struct Mixer {
    sample_rate: f32,
    voices: Vec<Voice>,
    clock: u64,
    next_voice_id: u64,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Mixer {
            sample_rate,
            voices: Vec::new(),
            clock: 0,
            next_voice_id: 0,
        }
    }

    /// Create one voice per input frequency, order-preserving, duplicates
    /// included. Every voice shares the current clock as its start, so the
    /// chord sounds simultaneous.
    ///
    /// Fails fast on a non-positive or non-finite frequency, or a
    /// non-positive duration; nothing is triggered in that case.
    pub fn trigger_chord(
        &mut self,
        frequencies: &[f32],
        duration_secs: f32,
    ) -> Result<Vec<VoiceId>> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(anyhow!("Invalid duration: {}", duration_secs));
        }
        for &frequency in frequencies {
            if !frequency.is_finite() || frequency <= 0.0 {
                return Err(anyhow!("Invalid frequency: {}", frequency));
            }
        }

        let started_at = self.clock;
        let mut ids = Vec::with_capacity(frequencies.len());
        for &frequency in frequencies {
            let id = VoiceId(self.next_voice_id);
            self.next_voice_id += 1;
            self.voices.push(Voice::new(
                id,
                frequency,
                duration_secs,
                self.sample_rate,
                started_at,
            ));
            ids.push(id);
        }
        Ok(ids)
    }

    /// Sum all live voices, apply the master gain, advance the clock and
    /// retire finished voices.
    pub fn next_sample(&mut self) -> f32 {
        let mut sum = 0.0;
        for voice in &mut self.voices {
            sum += voice.next_sample();
        }
        self.voices.retain(|voice| !voice.is_finished());
        self.clock += 1;
        sum * MASTER_GAIN
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    /// Samples rendered since creation.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Lifecycle of the audio output context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No output context yet; nothing can sound.
    Uninitialized,
    /// Output context being created.
    Initializing,
    /// Stream running; chords can be triggered.
    Ready,
}

/// Owns the process-wide audio output: one cpal stream feeding off a shared
/// [`Mixer`].
///
/// Construction is cheap and touches no hardware. The output context is
/// created lazily by [`initialize`](AudioPlayer::initialize) - or implicitly
/// by the first [`play_chord`](AudioPlayer::play_chord) - which is the
/// "first user gesture" moment: no sound can be produced before it.
/// Initialization is idempotent; once `Ready` it is a no-op.
pub struct AudioPlayer {
    state: PlayerState,
    mixer: Option<Arc<Mutex<Mixer>>>,
    stream: Option<Stream>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        AudioPlayer {
            state: PlayerState::Uninitialized,
            mixer: None,
            stream: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == PlayerState::Ready
    }

    /// Create the output context if absent: default host, default output
    /// device, one stream running the shared mixer. Calling this while
    /// `Ready` does nothing.
    ///
    /// Fails when the platform provides no output device or refuses the
    /// stream; the failure is surfaced here, once, and not retried
    /// automatically.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state == PlayerState::Ready {
            return Ok(());
        }
        self.state = PlayerState::Initializing;

        match self.open_output() {
            Ok((mixer, stream)) => {
                self.mixer = Some(mixer);
                self.stream = Some(stream);
                self.state = PlayerState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = PlayerState::Uninitialized;
                Err(e)
            }
        }
    }

    fn open_output(&self) -> Result<(Arc<Mutex<Mixer>>, Stream)> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let config = device.default_output_config()?;

        let sample_format = config.sample_format();
        let config: StreamConfig = config.into();

        let mixer = Arc::new(Mutex::new(Mixer::new(config.sample_rate.0 as f32)));
        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, mixer.clone())?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, mixer.clone())?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, mixer.clone())?,
            _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
        };

        stream
            .play()
            .map_err(|e| anyhow!("Failed to start output stream: {}", e))?;

        Ok((mixer, stream))
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        mixer: Arc<Mutex<Mixer>>,
    ) -> Result<Stream>
    where
        T: Sample + SizedSample + Send + 'static + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;

        let err_fn = |err| eprintln!("an error occurred on the output audio stream: {:?}", err);

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let mut mixer = mixer.lock().unwrap();
                    for frame in data.chunks_mut(channels) {
                        let value: T = cpal::Sample::from_sample(mixer.next_sample());
                        for sample in frame.iter_mut() {
                            *sample = value;
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

        Ok(stream)
    }

    /// Render the given frequencies as simultaneous voices for
    /// `duration_secs`. Auto-initializes the output context when called
    /// before [`initialize`](AudioPlayer::initialize).
    ///
    /// All voices are created under one mixer lock, so they share a start
    /// timestamp. The returned handles need not be retained; each voice
    /// stops itself at its scheduled time.
    pub fn play_chord(&mut self, frequencies: &[f32], duration_secs: f32) -> Result<Vec<VoiceId>> {
        if self.state != PlayerState::Ready {
            self.initialize()?;
        }

        let mixer = self
            .mixer
            .as_ref()
            .ok_or_else(|| anyhow!("Audio output not initialized"))?;
        let mut mixer = mixer
            .lock()
            .map_err(|e| anyhow!("Failed to lock mixer: {}", e))?;
        mixer.trigger_chord(frequencies, duration_secs)
    }

    /// Number of voices still sounding (0 before initialization).
    pub fn active_voices(&self) -> usize {
        match &self.mixer {
            Some(mixer) => mixer.lock().map(|m| m.active_voices()).unwrap_or(0),
            None => 0,
        }
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a pitch-plus-octave spelling (e.g. `"A4"`, `"Eb3"`, `"C"`) to Hz
/// against the fixed octave-4 table. Sharps and flats both resolve; a
/// missing octave means octave 4. Unrecognized pitch classes return
/// [`FALLBACK_FREQUENCY`] - this utility degrades rather than fails.
pub fn note_to_frequency(note: &str) -> f32 {
    let note = note.trim();
    let split = note
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(note.len());
    let (name, octave_part) = note.split_at(split);
    let octave: i32 = octave_part.parse().unwrap_or(4);

    let index = match name.to_uppercase().as_str() {
        "C" => 0,
        "C#" | "DB" => 1,
        "D" => 2,
        "D#" | "EB" => 3,
        "E" => 4,
        "F" => 5,
        "F#" | "GB" => 6,
        "G" => 7,
        "G#" | "AB" => 8,
        "A" => 9,
        "A#" | "BB" => 10,
        "B" => 11,
        _ => return FALLBACK_FREQUENCY,
    };

    BASE_OCTAVE_FREQUENCIES[index] * 2.0_f32.powi(octave - 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    #[test]
    fn test_trigger_creates_one_voice_per_frequency() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let ids = mixer
            .trigger_chord(&[261.63, 329.63, 392.00], 1.0)
            .unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(mixer.active_voices(), 3);

        let frequencies: Vec<f32> = mixer.voices().map(|v| v.frequency()).collect();
        assert_eq!(frequencies, vec![261.63, 329.63, 392.00]);
    }

    #[test]
    fn test_voices_share_one_start_timestamp() {
        let mut mixer = Mixer::new(SAMPLE_RATE);

        // Advance the clock so the shared start isn't trivially zero
        for _ in 0..100 {
            mixer.next_sample();
        }

        mixer.trigger_chord(&[440.0, 550.0, 660.0], 1.0).unwrap();
        let starts: Vec<u64> = mixer.voices().map(|v| v.started_at()).collect();
        assert_eq!(starts, vec![100, 100, 100]);
    }

    #[test]
    fn test_duplicate_frequencies_get_their_own_voices() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let ids = mixer.trigger_chord(&[440.0, 440.0], 1.0).unwrap();

        assert_eq!(mixer.active_voices(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_overlapping_triggers_are_independent() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        mixer.trigger_chord(&[261.63, 329.63, 392.00], 1.0).unwrap();

        for _ in 0..1000 {
            mixer.next_sample();
        }

        // A second chord joins the first; the first keeps ringing
        mixer.trigger_chord(&[293.66, 369.99, 440.00], 1.0).unwrap();
        assert_eq!(mixer.active_voices(), 6);

        let starts: Vec<u64> = mixer.voices().map(|v| v.started_at()).collect();
        assert_eq!(starts, vec![0, 0, 0, 1000, 1000, 1000]);
    }

    #[test]
    fn test_voices_retire_after_duration() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        mixer.trigger_chord(&[440.0, 880.0], 0.1).unwrap();

        for _ in 0..(0.1 * SAMPLE_RATE) as usize + 1 {
            mixer.next_sample();
        }

        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn test_invalid_frequency_fails_fast() {
        let mut mixer = Mixer::new(SAMPLE_RATE);

        assert!(mixer.trigger_chord(&[440.0, -1.0], 1.0).is_err());
        assert!(mixer.trigger_chord(&[f32::NAN], 1.0).is_err());
        assert!(mixer.trigger_chord(&[440.0], 0.0).is_err());
        // Nothing was triggered by the failed calls
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn test_empty_chord_is_silence() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let ids = mixer.trigger_chord(&[], 1.0).unwrap();
        assert!(ids.is_empty());
        assert_eq!(mixer.next_sample(), 0.0);
    }

    #[test]
    fn test_output_bounded_by_master_gain() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        mixer
            .trigger_chord(&[261.63, 329.63, 392.00, 493.88], 0.5)
            .unwrap();

        // 4 voices at peak 0.25 each, scaled by the master gain
        let bound = MASTER_GAIN * 0.25 * 4.0;
        for _ in 0..(0.5 * SAMPLE_RATE) as usize {
            let sample = mixer.next_sample();
            assert!(sample.abs() <= bound + 1e-4, "sample {} exceeds bound", sample);
        }
    }

    #[test]
    fn test_note_to_frequency_reference() {
        assert_eq!(note_to_frequency("A4"), 440.0);
        assert_eq!(note_to_frequency("A"), 440.0); // octave defaults to 4
    }

    #[test]
    fn test_note_to_frequency_octave_shift() {
        assert!((note_to_frequency("C5") - 523.26).abs() < 0.01);
        assert!((note_to_frequency("A3") - 220.0).abs() < 0.01);
    }

    #[test]
    fn test_note_to_frequency_flats() {
        assert_eq!(note_to_frequency("Eb4"), note_to_frequency("D#4"));
        assert_eq!(note_to_frequency("Bb3"), note_to_frequency("A#3"));
    }

    #[test]
    fn test_note_to_frequency_permissive_default() {
        assert_eq!(note_to_frequency("X9"), FALLBACK_FREQUENCY);
        assert_eq!(note_to_frequency(""), FALLBACK_FREQUENCY);
    }

    #[test]
    fn test_player_starts_uninitialized() {
        let player = AudioPlayer::new();
        assert_eq!(player.state(), PlayerState::Uninitialized);
        assert_eq!(player.active_voices(), 0);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        // Device-dependent: skipped on machines without an output device (CI)
        let mut player = AudioPlayer::new();
        match player.initialize() {
            Ok(()) => {
                assert!(player.is_ready());

                // Trigger a chord, then re-initialize: the context must be
                // reused, not rebuilt, so the voices keep ringing.
                let ids = player.play_chord(&[440.0, 550.0], 5.0).unwrap();
                assert_eq!(ids.len(), 2);
                player.initialize().unwrap();
                assert!(player.is_ready());
                assert!(player.active_voices() >= 1);
            }
            Err(_) => {
                println!("Skipping idempotence test - no audio device available");
            }
        }
    }

    #[test]
    fn test_play_chord_auto_initializes() {
        let mut player = AudioPlayer::new();
        match player.play_chord(&[261.63, 329.63, 392.00], 1.0) {
            Ok(ids) => {
                assert_eq!(ids.len(), 3);
                assert!(player.is_ready());
            }
            Err(_) => {
                println!("Skipping auto-init test - no audio device available");
            }
        }
    }
}
