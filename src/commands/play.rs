//! Chord selection and playback commands

use crate::audio::engine::DEFAULT_DURATION_SECS;
use crate::commands::{CommandContext, CommandResult};
use crate::types::chord::{ChordSelection, ChordType};
use crate::types::keymap::key_to_note;
use crate::types::note::NoteName;
use colored::*;

/// Handle `root <note>` - set the session root
pub fn cmd_root(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current root: {}", ctx.selection.root()));
    }

    match args.parse::<NoteName>() {
        Ok(note) => {
            ctx.selection.set_root(note);
            CommandResult::Message(
                format!("Root set to {}", note).bright_green().to_string(),
            )
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `type <name|0-6>` - set the chord type
///
/// Unrecognized input leaves the selection untouched (the selector models a
/// closed button set); the reply shows whatever is selected afterwards.
pub fn cmd_type(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        let names: Vec<&str> = ChordType::ALL.iter().map(|t| t.identifier()).collect();
        return CommandResult::Message(format!(
            "Current type: {} (available: {})",
            ctx.selection.chord_type().identifier(),
            names.join(", ")
        ));
    }

    let before = ctx.selection.chord_type();
    let recognized = match args.parse::<usize>() {
        Ok(index) => {
            ctx.selection.set_type_index(index);
            ChordType::from_index(index).is_some()
        }
        Err(_) => {
            ctx.selection.set_type(args);
            ChordType::from_identifier(args).is_some()
        }
    };

    if !recognized {
        CommandResult::Message(format!(
            "Unknown chord type '{}' - keeping {}",
            args,
            before.identifier()
        ))
    } else {
        CommandResult::Message(
            format!("Chord type: {}", ctx.selection.chord_type().identifier())
                .bright_green()
                .to_string(),
        )
    }
}

/// Handle `play <key>` - trigger the chord mapped to an input key
///
/// Like the original keyboard handler: the key sets the session root, and
/// the chord is voiced at the key's octave with the current chord type.
pub fn cmd_play(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut chars = args.chars();
    let key = match (chars.next(), chars.next()) {
        (Some(key), None) => key,
        _ => return CommandResult::Error("Usage: play <key> (see 'keys')".to_string()),
    };

    let (note, octave) = match key_to_note(key) {
        Some(mapped) => mapped,
        None => {
            return CommandResult::Error(format!("Key '{}' is not mapped (see 'keys')", key));
        }
    };

    ctx.selection.set_root(note);
    let frequencies = ctx.selection.frequencies(octave);

    match ctx.player.play_chord(&frequencies, DEFAULT_DURATION_SECS) {
        Ok(_) => CommandResult::Message(describe_chord(&ctx.selection)),
        Err(e) => CommandResult::Error(format!("Playback failed: {}", e)),
    }
}

/// Handle `chord <root> [type] [octave]` - play an explicit chord without
/// touching the session selection
pub fn cmd_chord(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();

    let root = match parts.next() {
        Some(word) => match word.parse::<NoteName>() {
            Ok(note) => note,
            Err(e) => return CommandResult::Error(e.to_string()),
        },
        None => return CommandResult::Error("Usage: chord <root> [type] [octave]".to_string()),
    };

    let mut chord_type = ctx.selection.chord_type();
    let mut octave: i8 = 4;
    for word in parts {
        if let Some(t) = ChordType::from_identifier(word) {
            chord_type = t;
        } else if let Ok(o) = word.parse::<i8>() {
            octave = o;
        } else {
            return CommandResult::Error(format!("Unknown chord type or octave: {}", word));
        }
    }

    let frequencies = chord_type.frequencies(root, octave);
    match ctx.player.play_chord(&frequencies, DEFAULT_DURATION_SECS) {
        Ok(_) => {
            let notes: Vec<String> = chord_type
                .notes(root)
                .iter()
                .map(|n| n.to_string())
                .collect();
            CommandResult::Message(format!(
                "🔊 {}  [{}]",
                chord_type.name(root).bright_green().bold(),
                notes.join(", ").cyan()
            ))
        }
        Err(e) => CommandResult::Error(format!("Playback failed: {}", e)),
    }
}

/// Handle `notes [root] [type]` - show a chord's name and pitch classes
/// without playing it
pub fn cmd_notes(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let mut parts = args.split_whitespace();

    let root = match parts.next() {
        Some(word) => match word.parse::<NoteName>() {
            Ok(note) => note,
            Err(e) => return CommandResult::Error(e.to_string()),
        },
        None => ctx.selection.root(),
    };

    let chord_type = match parts.next() {
        Some(word) => match ChordType::from_identifier(word) {
            Some(t) => t,
            None => {
                return CommandResult::Error(format!("Unknown chord type: {}", word));
            }
        },
        None => ctx.selection.chord_type(),
    };

    let notes: Vec<String> = chord_type
        .notes(root)
        .iter()
        .map(|n| n.to_string())
        .collect();
    CommandResult::Message(format!(
        "{}  [{}]",
        chord_type.name(root).bold(),
        notes.join(", ").cyan()
    ))
}

/// One line describing the current selection, shown after each play
fn describe_chord(selection: &ChordSelection) -> String {
    let notes: Vec<String> = selection.notes().iter().map(|n| n.to_string()).collect();
    format!(
        "🔊 {}  [{}]",
        selection.name().bright_green().bold(),
        notes.join(", ").cyan()
    )
}
