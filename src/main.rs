use anyhow::Result;
use chordboard::repl::Repl;

fn main() -> Result<()> {
    Repl::new().run()
}
