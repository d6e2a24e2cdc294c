use crate::types::note::NoteName;

/// A named pattern of semitone offsets from a root, defining a harmonic
/// quality. The interval lists are fixed: always sorted ascending, always
/// starting at 0 (the root is part of every chord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordType {
    Single,
    Major,
    Minor,
    Seventh,
    Maj7,
    Dim,
    Aug,
}

impl ChordType {
    /// All chord types, in selector order (index 0 = single .. 6 = aug).
    pub const ALL: [ChordType; 7] = [
        ChordType::Single,
        ChordType::Major,
        ChordType::Minor,
        ChordType::Seventh,
        ChordType::Maj7,
        ChordType::Dim,
        ChordType::Aug,
    ];

    /// Semitone offsets from the root.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordType::Single => &[0],
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Seventh => &[0, 4, 7, 10],
            ChordType::Maj7 => &[0, 4, 7, 11],
            ChordType::Dim => &[0, 3, 6],
            ChordType::Aug => &[0, 4, 8],
        }
    }

    /// The identifier used by the external selector surface.
    pub fn identifier(self) -> &'static str {
        match self {
            ChordType::Single => "single",
            ChordType::Major => "major",
            ChordType::Minor => "minor",
            ChordType::Seventh => "seventh",
            ChordType::Maj7 => "maj7",
            ChordType::Dim => "dim",
            ChordType::Aug => "aug",
        }
    }

    /// Human-readable quality label (empty for a single note).
    pub fn label(self) -> &'static str {
        match self {
            ChordType::Single => "",
            ChordType::Major => "Major",
            ChordType::Minor => "Minor",
            ChordType::Seventh => "7",
            ChordType::Maj7 => "Maj7",
            ChordType::Dim => "Dim",
            ChordType::Aug => "Aug",
        }
    }

    /// Look up a chord type by its identifier (case-insensitive).
    pub fn from_identifier(s: &str) -> Option<ChordType> {
        match s.trim().to_lowercase().as_str() {
            "single" => Some(ChordType::Single),
            "major" => Some(ChordType::Major),
            "minor" => Some(ChordType::Minor),
            "seventh" => Some(ChordType::Seventh),
            "maj7" => Some(ChordType::Maj7),
            "dim" => Some(ChordType::Dim),
            "aug" => Some(ChordType::Aug),
            _ => None,
        }
    }

    /// Look up a chord type by selector index (0-6).
    pub fn from_index(index: usize) -> Option<ChordType> {
        Self::ALL.get(index).copied()
    }

    /// The constituent pitch classes for this chord built on `root`,
    /// in interval order. Offsets wrap modulo 12.
    pub fn notes(self, root: NoteName) -> Vec<NoteName> {
        self.intervals()
            .iter()
            .map(|&offset| NoteName::from_index(root.index() + offset))
            .collect()
    }

    /// The constituent frequencies for this chord built on `root` at the
    /// given base octave, in interval order.
    ///
    /// A voice whose offset crosses the chromatic boundary gets its octave
    /// bumped individually; the other voices stay at the base octave. This
    /// keeps wide intervals (e.g. the maj7 above B) in tune instead of
    /// folding them back into the base octave.
    pub fn frequencies(self, root: NoteName, octave: i8) -> Vec<f32> {
        self.intervals()
            .iter()
            .map(|&offset| {
                let chromatic = root.index() + offset;
                let note_octave = octave + (chromatic / 12) as i8;
                NoteName::from_index(chromatic).frequency(note_octave)
            })
            .collect()
    }

    /// Display name for the chord: just the root for `Single`,
    /// `"{root} {label}"` otherwise.
    pub fn name(self, root: NoteName) -> String {
        match self {
            ChordType::Single => root.to_string(),
            _ => format!("{} {}", root, self.label()),
        }
    }
}

/// The current chord selection: root pitch class and chord type.
///
/// Session state only - mutated by user input, persists across plays,
/// never stored anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSelection {
    root: NoteName,
    chord_type: ChordType,
}

impl ChordSelection {
    pub fn new() -> Self {
        ChordSelection {
            root: NoteName::C,
            chord_type: ChordType::Major,
        }
    }

    pub fn root(&self) -> NoteName {
        self.root
    }

    pub fn chord_type(&self) -> ChordType {
        self.chord_type
    }

    pub fn set_root(&mut self, note: NoteName) {
        self.root = note;
    }

    /// Set the chord type by identifier. Unknown identifiers are silently
    /// ignored - the selector models a closed button set, so there is
    /// nothing useful to report.
    pub fn set_type(&mut self, identifier: &str) {
        if let Some(chord_type) = ChordType::from_identifier(identifier) {
            self.chord_type = chord_type;
        }
    }

    /// Set the chord type by selector index (0-6). Out-of-range indices are
    /// silently ignored, like unknown identifiers.
    pub fn set_type_index(&mut self, index: usize) {
        if let Some(chord_type) = ChordType::from_index(index) {
            self.chord_type = chord_type;
        }
    }

    pub fn notes(&self) -> Vec<NoteName> {
        self.chord_type.notes(self.root)
    }

    pub fn frequencies(&self, octave: i8) -> Vec<f32> {
        self.chord_type.frequencies(self.root, octave)
    }

    pub fn name(&self) -> String {
        self.chord_type.name(self.root)
    }
}

impl Default for ChordSelection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_is_just_the_root() {
        for note in NoteName::ALL {
            assert_eq!(ChordType::Single.notes(note), vec![note]);
        }
    }

    #[test]
    fn test_note_count_matches_interval_count() {
        for root in NoteName::ALL {
            for chord_type in ChordType::ALL {
                assert_eq!(
                    chord_type.notes(root).len(),
                    chord_type.intervals().len()
                );
                assert_eq!(
                    chord_type.frequencies(root, 4).len(),
                    chord_type.intervals().len()
                );
            }
        }
    }

    #[test]
    fn test_intervals_sorted_with_root_first() {
        for chord_type in ChordType::ALL {
            let intervals = chord_type.intervals();
            assert_eq!(intervals[0], 0);
            assert!(intervals.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_c_major_notes() {
        let notes = ChordType::Major.notes(NoteName::C);
        assert_eq!(notes, vec![NoteName::C, NoteName::E, NoteName::G]);
    }

    #[test]
    fn test_wraparound_notes() {
        // A seventh chord on A wraps past B back into the next octave
        let notes = ChordType::Seventh.notes(NoteName::A);
        assert_eq!(
            notes,
            vec![NoteName::A, NoteName::CSharp, NoteName::E, NoteName::G]
        );
    }

    #[test]
    fn test_a_single_reference_tuning() {
        assert_eq!(ChordType::Single.frequencies(NoteName::A, 4), vec![440.0]);
    }

    #[test]
    fn test_c_major_frequencies() {
        let freqs = ChordType::Major.frequencies(NoteName::C, 4);
        let expected = [261.63, 329.63, 392.00];
        assert_eq!(freqs.len(), expected.len());
        for (got, want) in freqs.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 0.01, "got {} want {}", got, want);
        }
    }

    #[test]
    fn test_octave_bump_on_boundary_crossing() {
        // B maj7: offsets 4, 7 and 11 all cross the chromatic boundary, so
        // those voices sound in octave 5 while the root stays in octave 4.
        let freqs = ChordType::Maj7.frequencies(NoteName::B, 4);
        assert!((freqs[0] - NoteName::B.frequency(4)).abs() < 0.01);
        assert!((freqs[1] - NoteName::DSharp.frequency(5)).abs() < 0.01);
        assert!((freqs[2] - NoteName::FSharp.frequency(5)).abs() < 0.01);
        assert!((freqs[3] - NoteName::ASharp.frequency(5)).abs() < 0.01);
    }

    #[test]
    fn test_chord_names() {
        assert_eq!(ChordType::Major.name(NoteName::C), "C Major");
        assert_eq!(ChordType::Single.name(NoteName::D), "D");
        assert_eq!(ChordType::Seventh.name(NoteName::G), "G 7");
        assert_eq!(ChordType::Maj7.name(NoteName::FSharp), "F# Maj7");
    }

    #[test]
    fn test_identifier_round_trip() {
        for chord_type in ChordType::ALL {
            assert_eq!(
                ChordType::from_identifier(chord_type.identifier()),
                Some(chord_type)
            );
        }
        assert_eq!(ChordType::from_identifier("bogus"), None);
    }

    #[test]
    fn test_selector_indices() {
        assert_eq!(ChordType::from_index(0), Some(ChordType::Single));
        assert_eq!(ChordType::from_index(6), Some(ChordType::Aug));
        assert_eq!(ChordType::from_index(7), None);
    }

    #[test]
    fn test_selection_defaults_to_c_major() {
        let selection = ChordSelection::new();
        assert_eq!(selection.root(), NoteName::C);
        assert_eq!(selection.chord_type(), ChordType::Major);
        assert_eq!(selection.name(), "C Major");
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let mut selection = ChordSelection::new();
        selection.set_type("minor");
        assert_eq!(selection.chord_type(), ChordType::Minor);

        selection.set_type("bogus");
        assert_eq!(selection.chord_type(), ChordType::Minor);

        selection.set_type_index(42);
        assert_eq!(selection.chord_type(), ChordType::Minor);
    }

    #[test]
    fn test_selection_delegates_to_current_state() {
        let mut selection = ChordSelection::new();
        selection.set_root(NoteName::D);
        selection.set_type("seventh");

        assert_eq!(selection.name(), "D 7");
        assert_eq!(
            selection.notes(),
            vec![NoteName::D, NoteName::FSharp, NoteName::A, NoteName::C]
        );
        assert_eq!(selection.frequencies(4).len(), 4);
    }
}
