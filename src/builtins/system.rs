use std::ffi::CString;

use nix::unistd::execvp;

use crate::builtins::registry::CommandInfo;
use crate::engine::Shell;

pub const COMMAND_INFO_EXEC: CommandInfo = CommandInfo { name: "exec", run: exec_runner };
pub const COMMAND_INFO_EXIT: CommandInfo = CommandInfo { name: "exit", run: exit_runner };

/// Raise the exit flag; the terminal stops after the current cycle.
pub fn exit_runner(_args: &[String], shell: &mut Shell) -> i32 {
    shell.exit_requested = true;
    0
}

/// Replace the shell's process image. Only returns on failure.
pub fn exec_runner(args: &[String], _shell: &mut Shell) -> i32 {
    let Some(program) = args.first() else {
        eprintln!("conch: exec: argument required");
        return 1;
    };

    let mut argv = Vec::with_capacity(args.len());
    for arg in args {
        match CString::new(arg.as_str()) {
            Ok(arg) => argv.push(arg),
            Err(_) => {
                eprintln!("conch: exec: {program}: invalid argument");
                return 1;
            }
        }
    }

    if let Err(errno) = execvp(&argv[0], &argv) {
        eprintln!("conch: exec: {program}: {errno}");
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_sets_the_flag() {
        let mut shell = Shell::new();
        assert_eq!(exit_runner(&[], &mut shell), 0);
        assert!(shell.exit_requested);
    }

    #[test]
    fn exec_requires_an_argument() {
        let mut shell = Shell::new();
        assert_eq!(exec_runner(&[], &mut shell), 1);
        assert!(!shell.exit_requested);
    }
}
