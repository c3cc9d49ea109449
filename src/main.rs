mod builtins;
mod engine;
mod error;
mod interpreter;
mod parser;
mod signals;
mod strings;

use std::env;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use engine::{Shell, ShellMode, jobs};

fn main() {
    signals::install();
    let mut shell = Shell::new();

    // With arguments, run them as one script and leave; without, go
    // interactive.
    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        let script = interpreter::assemble_script(&args);
        let outcome = interpreter::execute_script(&mut shell, &script);
        std::process::exit(if outcome.failed { 1 } else { 0 });
    }

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("conch: cannot open terminal: {err}");
            std::process::exit(1);
        }
    };

    loop {
        // Collect finished background children before showing the prompt.
        jobs::reap_background(&mut shell.procs, &mut shell.jobs);

        // A suspended builtin owns the next line; no prompt while it waits.
        let suspended = shell.mode != ShellMode::Idle;
        let prompt =
            if suspended { String::new() } else { format!("{}-conch>", shell.forked_processes) };

        match editor.readline(&prompt) {
            Ok(line) => {
                if suspended {
                    builtins::continue_suspended(&mut shell, &line);
                } else {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(input);
                    shell.history.push(input.to_string());
                    interpreter::execute_script(&mut shell, &line);
                }
                if shell.exit_requested {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("conch: {err}");
                break;
            }
        }
    }
}
