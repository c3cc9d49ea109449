//! Builtins the shell hands to the host interpreter (`sh -c`) rather than
//! implementing itself, plus the argument escaping they all share.

use std::process::Command;

use crate::builtins::registry::CommandInfo;
use crate::engine::{PendingBuiltin, Shell, ShellMode};

pub const COMMAND_INFO_CLEAR: CommandInfo = CommandInfo { name: "clear", run: clear_runner };
pub const COMMAND_INFO_ECHO: CommandInfo = CommandInfo { name: "echo", run: echo_runner };
pub const COMMAND_INFO_LOCAL: CommandInfo = CommandInfo { name: "local", run: local_runner };
pub const COMMAND_INFO_LOGOUT: CommandInfo = CommandInfo { name: "logout", run: logout_runner };
pub const COMMAND_INFO_SOURCE: CommandInfo = CommandInfo { name: "source", run: source_runner };

/// Run a command line through the host interpreter. Does not count as a
/// forked shell child.
pub(crate) fn host(command: &str) -> i32 {
    match Command::new("sh").arg("-c").arg(command).status() {
        Ok(status) => status.code().unwrap_or(1),
        Err(err) => {
            eprintln!("conch: sh: {err}");
            127
        }
    }
}

/// Copy `s` with control characters mapped to their backslash escapes, so
/// the concatenated command line survives the host shell unmangled.
pub(crate) fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\x07' => escaped.push_str("\\a"),
            '\x08' => escaped.push_str("\\b"),
            '\x0c' => escaped.push_str("\\f"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\x0b' => escaped.push_str("\\v"),
            '\\' => escaped.push_str("\\\\"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Build the delegated command line: escaped command, escaped arguments,
/// single spaces between.
pub(crate) fn concat_args(command: &str, args: &[String]) -> String {
    let mut line = escape(command);
    for arg in args {
        line.push(' ');
        line.push_str(&escape(arg));
    }
    line
}

/// Commands starting with `.` (the dot builtin and friends) go to the host
/// verbatim.
pub fn dot(name: &str, args: &[String]) -> i32 {
    host(&concat_args(name, args))
}

pub fn echo_runner(args: &[String], _shell: &mut Shell) -> i32 {
    host(&concat_args("echo", args))
}

pub fn source_runner(args: &[String], _shell: &mut Shell) -> i32 {
    host(&concat_args("source", args))
}

/// `local` with arguments is delegated; without arguments it suspends the
/// shell until the next line supplies them.
pub fn local_runner(args: &[String], shell: &mut Shell) -> i32 {
    if args.is_empty() {
        shell.mode = ShellMode::AwaitingBuiltinInput { pending: PendingBuiltin::Local };
        return 0;
    }
    host(&concat_args("local", args))
}

pub fn clear_runner(_args: &[String], _shell: &mut Shell) -> i32 {
    host("clear")
}

pub fn logout_runner(_args: &[String], _shell: &mut Shell) -> i32 {
    let code = host("logout 2> /dev/null");
    if code != 0 {
        println!("conch: logout: not login shell: use `exit'");
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_become_backslash_escapes() {
        assert_eq!(escape("a\tb"), "a\\tb");
        assert_eq!(escape("line\n"), "line\\n");
        assert_eq!(escape("back\\slash"), "back\\\\slash");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("\x07\x08\x0b\x0c\r"), "\\a\\b\\v\\f\\r");
    }

    #[test]
    fn concatenation_uses_single_spaces() {
        let args = vec!["one".to_string(), "two".to_string()];
        assert_eq!(concat_args("echo", &args), "echo one two");
        assert_eq!(concat_args("echo", &[]), "echo");
    }
}
