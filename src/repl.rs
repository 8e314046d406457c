use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};

use crate::Lox;

const HISTORY_FILE: &str = ".lox_history";

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(HISTORY_FILE))
}

/// Interactive prompt. A line ending in `{` starts a multi-line block:
/// further lines are read with a `(block)>>` prefix and accumulated until
/// a line ends in `}`, at which point the whole block is run as one
/// source. `Ctrl-D` exits cleanly; `Ctrl-C` is reported and the loop
/// continues.
pub fn run(lox: &mut Lox) -> RustylineResult<()> {
    let mut editor = DefaultEditor::new()?;

    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    println!("lox {} -- press Ctrl-D to exit", env!("CARGO_PKG_VERSION"));

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());

                let source = if line.trim_end().ends_with('{') {
                    read_block(&mut editor, line)
                } else {
                    line
                };

                lox.run_source(&source);
            }
            Err(ReadlineError::Interrupted) => {
                println!("(interrupted)");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Readline error: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }

    Ok(())
}

fn read_block(editor: &mut DefaultEditor, first_line: String) -> String {
    let mut block = first_line;

    loop {
        match editor.readline("(block)>> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let ends_block = line.trim_end().ends_with('}');
                block.push('\n');
                block.push_str(&line);
                if ends_block {
                    break;
                }
            }
            Err(_) => break,
        }
    }

    block
}
