use crate::builtins;
use crate::engine::Shell;

/// A builtin runner gets the raw argument tokens (redirections included,
/// since delegated builtins hand them to the host shell untouched) and the
/// shell state, and returns an exit code.
pub type BuiltinRunner = fn(&[String], &mut Shell) -> i32;

pub struct CommandInfo {
    pub name: &'static str,
    pub run: BuiltinRunner,
}

pub const BUILTINS: &[CommandInfo] = &[
    builtins::cd::COMMAND_INFO_CD,
    builtins::cd::COMMAND_INFO_PWD,
    builtins::delegate::COMMAND_INFO_CLEAR,
    builtins::delegate::COMMAND_INFO_ECHO,
    builtins::delegate::COMMAND_INFO_LOCAL,
    builtins::delegate::COMMAND_INFO_LOGOUT,
    builtins::delegate::COMMAND_INFO_SOURCE,
    builtins::envset::COMMAND_INFO_DECLARE,
    builtins::envset::COMMAND_INFO_EXPORT,
    builtins::envset::COMMAND_INFO_TYPESET,
    builtins::history::COMMAND_INFO,
    builtins::kill_cmd::COMMAND_INFO,
    builtins::let_cmd::COMMAND_INFO,
    builtins::read::COMMAND_INFO,
    builtins::system::COMMAND_INFO_EXEC,
    builtins::system::COMMAND_INFO_EXIT,
];

pub fn find_command(name: &str) -> Option<&'static CommandInfo> {
    BUILTINS.iter().find(|cmd| cmd.name == name)
}
