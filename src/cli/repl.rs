//! # REPL - Read-Eval-Print Loop
//!
//! The interactive loop of the `docstore` shell. It reads lines with
//! rustyline (history, line editing), hands dot commands to the
//! [`CommandHandler`] and prints the result.
//!
//! The prompt shows the selected store:
//!
//! ```text
//! docstore> .open users
//! Using store 'users'.
//! docstore:users> .put email=a@x team=blue
//! Query OK, row id 1 (0.001 sec)
//! ```
//!
//! ## Error Handling
//!
//! Command errors are printed but do not end the loop. Use `.quit` or Ctrl+D
//! to exit; Ctrl+C discards the current line.

use crate::cli::commands::{CommandHandler, CommandResult, Session};
use crate::cli::history::history_path;
use crate::Database;
use eyre::{Result, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Instant;

const PROMPT: &str = "docstore";

pub struct Repl {
    session: Session,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new(db: Database) -> Result<Self> {
        let mut editor = DefaultEditor::new().wrap_err("failed to initialize line editor")?;

        if let Some(history_file) = history_path() {
            let _ = editor.load_history(&history_file);
        }

        Ok(Self {
            session: Session::new(db),
            editor,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = self.prompt();
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye");
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading input: {}", err);
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn prompt(&self) -> String {
        match self.session.current_store() {
            Some(store) => format!("{}:{}> ", PROMPT, store.name()),
            None => format!("{}> ", PROMPT),
        }
    }

    fn handle_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return true;
        }

        self.editor.add_history_entry(trimmed).ok();

        if !CommandHandler::is_command(trimmed) {
            eprintln!("Error: expected a dot command. Type .help for available commands.");
            return true;
        }

        let start = Instant::now();
        match CommandHandler::execute(trimmed, &mut self.session) {
            CommandResult::Exit => return false,
            CommandResult::Output(text) => {
                println!("{} ({:.3} sec)", text, start.elapsed().as_secs_f64());
            }
            CommandResult::Continue => {}
            CommandResult::Error(msg) => {
                eprintln!("Error: {}", msg);
            }
        }
        true
    }

    fn print_welcome(&self) {
        println!("docstore version {}", env!("CARGO_PKG_VERSION"));
        println!("Enter \".help\" for usage hints.");
        match self.session.database().path() {
            Some(path) => println!("Connected to: {}", path.display()),
            None => println!("Connected to a transient in-memory database."),
        }
        println!();
    }

    fn save_history(&mut self) {
        if let Some(history_file) = history_path() {
            if let Err(e) = self.editor.save_history(&history_file) {
                eprintln!("Warning: could not save history: {}", e);
            }
        }
    }
}
