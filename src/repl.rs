//! Interactive REPL for the chord keyboard
//!
//! A reader thread owns the rustyline editor and forwards lines over a
//! channel; the main loop dispatches them against the command registry.
//! The audio output context is created lazily by the first play command,
//! so the session stays silent until the user asks for sound.

use crate::audio::engine::AudioPlayer;
use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use anyhow::Result;
use colored::*;
use crossbeam_channel::{unbounded, Receiver};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::thread;

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// Interactive REPL driving the chord engine
pub struct Repl {
    registry: CommandRegistry,
    ctx: CommandContext,
}

impl Repl {
    pub fn new() -> Self {
        Repl {
            registry: create_registry(),
            ctx: CommandContext::new(AudioPlayer::new()),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        print_banner();

        let rx_input = spawn_reader();
        loop {
            match rx_input.recv() {
                Ok(ReplEvent::Input(Ok(line))) => {
                    if !self.handle_line(line.trim()) {
                        break;
                    }
                }
                Ok(ReplEvent::Input(Err(ReadlineError::Interrupted)))
                | Ok(ReplEvent::Input(Err(ReadlineError::Eof))) => {
                    println!("Bye!");
                    break;
                }
                Ok(ReplEvent::Input(Err(e))) => {
                    println!("{} {}", "Input error:".red(), e);
                    break;
                }
                Err(_) => break, // Reader thread gone
            }
        }

        Ok(())
    }

    /// Dispatch one input line. Returns false when the REPL should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }

        // A bare digit 0-6 selects the chord type, like a number row of
        // selector buttons
        let mut chars = line.chars();
        if let (Some(digit @ '0'..='6'), None) = (chars.next(), chars.next()) {
            self.ctx
                .selection
                .set_type_index(digit as usize - '0' as usize);
            println!(
                "Chord type: {}",
                self.ctx
                    .selection
                    .chord_type()
                    .identifier()
                    .bright_green()
            );
            return true;
        }

        match self.registry.execute(line, &mut self.ctx) {
            CommandResult::Success => {}
            CommandResult::Message(message) => println!("{}", message),
            CommandResult::Error(error) => println!("{} {}", "Error:".red(), error),
            CommandResult::NotACommand => {
                println!(
                    "{} unknown command '{}' - try '{}'",
                    "?".yellow(),
                    line,
                    "help".cyan()
                );
            }
            CommandResult::Exit => {
                println!("Bye!");
                return false;
            }
        }
        true
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the blocking readline loop on its own thread
fn spawn_reader() -> Receiver<ReplEvent> {
    let (tx, rx) = unbounded();

    thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                let _ = tx.send(ReplEvent::Input(Err(e)));
                return;
            }
        };

        loop {
            let line = editor.readline("chord> ");
            let stop = line.is_err();
            if let Ok(ref entry) = line {
                let _ = editor.add_history_entry(entry.as_str());
            }
            if tx.send(ReplEvent::Input(line)).is_err() || stop {
                break;
            }
        }
    });

    rx
}

fn print_banner() {
    println!("{}", "🎹 Chordboard".bold());
    println!("Press-a-key chords: 'play a' sounds C4 with the current type.");
    println!(
        "Type '{}' for commands, '{}' for the key layout.",
        "help".cyan(),
        "keys".cyan()
    );
    println!();
}
