use crate::types::note::NoteName;

/// Fixed mapping from input keys to (pitch class, octave) pairs, spanning
/// C4 through G5. The home row carries the white keys and the row above it
/// the black keys, like a piano folded onto the keyboard.
///
/// This table is a compatibility surface shared with any paired visual or
/// physical keyboard layer - the layout is static data, never computed.
pub const KEYBOARD_MAPPING: [(char, NoteName, i8); 20] = [
    ('a', NoteName::C, 4),
    ('w', NoteName::CSharp, 4),
    ('s', NoteName::D, 4),
    ('e', NoteName::DSharp, 4),
    ('d', NoteName::E, 4),
    ('f', NoteName::F, 4),
    ('t', NoteName::FSharp, 4),
    ('g', NoteName::G, 4),
    ('y', NoteName::GSharp, 4),
    ('h', NoteName::A, 4),
    ('u', NoteName::ASharp, 4),
    ('j', NoteName::B, 4),
    ('k', NoteName::C, 5),
    ('o', NoteName::CSharp, 5),
    ('l', NoteName::D, 5),
    ('p', NoteName::DSharp, 5),
    (';', NoteName::E, 5),
    (':', NoteName::F, 5),
    ('[', NoteName::FSharp, 5),
    (']', NoteName::G, 5),
];

/// Resolve an input key to its (pitch class, octave) pair.
pub fn key_to_note(key: char) -> Option<(NoteName, i8)> {
    KEYBOARD_MAPPING
        .iter()
        .find(|&&(k, _, _)| k == key)
        .map(|&(_, note, octave)| (note, octave))
}
