use crate::builtins::delegate;
use crate::builtins::registry::CommandInfo;
use crate::engine::Shell;

pub const COMMAND_INFO_DECLARE: CommandInfo =
    CommandInfo { name: "declare", run: declare_runner };
pub const COMMAND_INFO_EXPORT: CommandInfo = CommandInfo { name: "export", run: export_runner };
pub const COMMAND_INFO_TYPESET: CommandInfo =
    CommandInfo { name: "typeset", run: typeset_runner };

pub fn export_runner(args: &[String], _shell: &mut Shell) -> i32 {
    match args.first() {
        Some(token) => assign(token),
        None => {
            eprintln!("conch: export: usage: export NAME=value");
            1
        }
    }
}

/// Bare `declare` is the host's business; with an argument it behaves like
/// `export`.
pub fn declare_runner(args: &[String], _shell: &mut Shell) -> i32 {
    match args.first() {
        Some(token) => assign(token),
        None => delegate::host("declare"),
    }
}

pub fn typeset_runner(args: &[String], _shell: &mut Shell) -> i32 {
    match args.first() {
        Some(token) => assign(token),
        None => delegate::host("typeset"),
    }
}

/// Place a `NAME=value` token in the process environment. Also the handler
/// for a bare `NAME=value` command. Children inherit the result.
pub fn assign(token: &str) -> i32 {
    match token.split_once('=') {
        Some((name, value)) if !name.is_empty() => {
            unsafe { std::env::set_var(name, value) };
            0
        }
        _ => {
            eprintln!("conch: {token}: not a valid identifier");
            1
        }
    }
}
