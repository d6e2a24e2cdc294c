//! General REPL commands (help, keys, quit)

use crate::commands::{CommandContext, CommandResult};
use crate::types::keymap::KEYBOARD_MAPPING;
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `keys` - print the key-to-note table
pub fn cmd_keys(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    println!("{}", "Key layout (C4 - G5):".bold());
    for (key, note, octave) in KEYBOARD_MAPPING {
        println!(
            "  {}  →  {}{}",
            key.to_string().cyan(),
            note,
            octave
        );
    }
    CommandResult::Success
}

/// Print help information
fn print_help() {
    println!("{}", "🎹 Chordboard Help".bold());
    println!("{}", "=================".bold());
    println!();
    println!("{}", "Playing:".green());
    println!(
        "  {} <key>            - Play the chord mapped to a key ('{}' is C4)",
        "play".cyan(),
        "a".cyan()
    );
    println!(
        "  {} <root> [type] [octave]  - Play an explicit chord",
        "chord".cyan()
    );
    println!();
    println!("{}", "Selection:".green());
    println!("  {} <note>           - Set the root (C, C#, D ...)", "root".cyan());
    println!(
        "  {} <name|0-6>       - Set the chord type by name or index",
        "type".cyan()
    );
    println!(
        "  {}                  - A bare digit 0-6 also selects the type",
        "0-6".cyan()
    );
    println!();
    println!("{}", "Info:".green());
    println!("  {} [root] [type]   - Show a chord's name and notes", "notes".cyan());
    println!("  {}                 - Show the key layout", "keys".cyan());
    println!("  {}                 - Leave", "quit".cyan());
    println!();
    println!(
        "Chord types: {}",
        "single, major, minor, seventh, maj7, dim, aug".cyan()
    );
}
