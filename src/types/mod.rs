pub mod chord;
pub mod keymap;
pub mod note;

pub use chord::{ChordSelection, ChordType};
pub use keymap::{key_to_note, KEYBOARD_MAPPING};
pub use note::NoteName;
