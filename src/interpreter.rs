//! Executes whole script lines. Used by the interactive terminal and by the
//! argv (one-shot) invocation mode.

use crate::engine::{self, Shell};
use crate::parser;

/// What a script line amounted to: how many children were forked, and
/// whether any job died on a `ShellError`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptOutcome {
    pub forked: usize,
    pub failed: bool,
}

/// Split a script into jobs and run them in order. A failing job is reported
/// and skipped; the jobs after it still run. The shell's lifetime fork
/// counter is advanced here.
pub fn execute_script(shell: &mut Shell, script: &str) -> ScriptOutcome {
    let mut outcome = ScriptOutcome::default();
    for job in parser::parse_script(script) {
        match engine::execute_job(shell, &job) {
            Ok(forked) => outcome.forked += forked,
            Err(err) => {
                eprintln!("conch: {err}");
                outcome.failed = true;
            }
        }
    }
    shell.forked_processes += outcome.forked;
    outcome
}

/// Rebuild a script from argv words: single spaces between words, except
/// that a word already ending in `;` needs no separator.
pub fn assemble_script(args: &[String]) -> String {
    let mut script = String::new();
    for arg in args {
        script.push_str(arg);
        if !arg.ends_with(';') {
            script.push(' ');
        }
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_words_join_with_single_spaces() {
        let args: Vec<String> = ["ls", "-l", "/tmp"].iter().map(|s| s.to_string()).collect();
        assert_eq!(assemble_script(&args), "ls -l /tmp ");
    }

    #[test]
    fn semicolon_words_need_no_separator() {
        let args: Vec<String> = ["pwd;", "pwd"].iter().map(|s| s.to_string()).collect();
        assert_eq!(assemble_script(&args), "pwd;pwd ");
    }

    #[test]
    fn builtin_only_scripts_fork_nothing() {
        let mut shell = Shell::new();
        let outcome = execute_script(&mut shell, "CONCH_INTERP_TEST=1; exit");
        assert_eq!(outcome.forked, 0);
        assert!(!outcome.failed);
        assert!(shell.exit_requested);
        assert_eq!(shell.forked_processes, 0);
        unsafe { std::env::remove_var("CONCH_INTERP_TEST") };
    }
}
