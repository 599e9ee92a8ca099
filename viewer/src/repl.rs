//! Interactive readline loop.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use crate::commands::{self, Action};
use crate::formatter;
use crate::session::Session;

/// Start the step-through REPL over a loaded session.
pub fn start(mut session: Session) -> Result<()> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(config)?;

    if let Some(frame) = session.current() {
        println!("{}", formatter::format_frame(&frame, session.frame_count()));
    }
    println!("Type 'help' for available commands.\n");

    loop {
        let prompt = format!("(pcode {}/{}) ", session.position(), session.frame_count());
        match rl.readline(&prompt) {
            Ok(line) => {
                if let Some(cmd) = commands::parse(&line) {
                    match commands::execute(&cmd, &mut session) {
                        Action::Print(s) => println!("{s}"),
                        Action::Quit => break,
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Readline error: {e}");
                break;
            }
        }
    }

    Ok(())
}
