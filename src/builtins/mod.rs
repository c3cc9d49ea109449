pub mod cd;
pub mod delegate;
pub mod envset;
pub mod history;
pub mod kill_cmd;
pub mod let_cmd;
pub mod read;
pub mod registry;
pub mod system;

use crate::engine::{PendingBuiltin, Shell, ShellMode};

/// Dispatch a recognised builtin. `None` means the command is not a builtin
/// and should be resolved against `PATH`; `Some(code)` means it ran (or
/// failed) in-process. Builtins fork no shell children either way.
pub fn try_builtin(shell: &mut Shell, name: &str, args: &[String]) -> Option<i32> {
    if name.starts_with('.') {
        return Some(delegate::dot(name, args));
    }
    if let Some(info) = registry::find_command(name) {
        return Some((info.run)(args, shell));
    }
    // A bare NAME=value command is an environment assignment.
    if name.find('=').is_some_and(|position| position > 0) {
        return Some(envset::assign(name));
    }
    None
}

/// Feed the next input line to whichever builtin suspended the shell. The
/// mode is reset first, so a builtin that needs yet another line re-suspends
/// explicitly, replacing the old suspension; there is never more than one.
pub fn continue_suspended(shell: &mut Shell, line: &str) {
    match std::mem::replace(&mut shell.mode, ShellMode::Idle) {
        ShellMode::Idle => {}
        ShellMode::AwaitingReadValue { variable } => {
            if let Some(value) = line.split_whitespace().next() {
                unsafe { std::env::set_var(&variable, value) };
            }
        }
        ShellMode::AwaitingBuiltinInput { pending } => {
            let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            match pending {
                PendingBuiltin::Read => {
                    read::read_runner(&tokens, shell);
                }
                PendingBuiltin::Local => {
                    delegate::local_runner(&tokens, shell);
                }
            }
        }
    }
}
