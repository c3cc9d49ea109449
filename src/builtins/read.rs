use crate::builtins::registry::CommandInfo;
use crate::engine::{PendingBuiltin, Shell, ShellMode};

pub const COMMAND_INFO: CommandInfo = CommandInfo { name: "read", run: read_runner };

const USAGE: &str = "read: usage: read [-ers] [-a array] [-d delim] [-i text] [-n nchars] \
                     [-N nchars] [-p prompt] [-t timeout] [-u fd] [name ...]";

/// The two-phase entry point. `read` alone suspends the shell for its
/// argument list; `read VAR` (optionally with `-p PROMPT`) suspends it for
/// the value. Either way the terminal routes the next line back here instead
/// of parsing it as a script.
pub fn read_runner(args: &[String], shell: &mut Shell) -> i32 {
    if args.is_empty() {
        shell.mode = ShellMode::AwaitingBuiltinInput { pending: PendingBuiltin::Read };
        return 0;
    }

    if args[0] == "-p" {
        if args.len() == 3 {
            println!("{}", args[1].trim_matches('"'));
            shell.mode = ShellMode::AwaitingReadValue { variable: args[2].clone() };
            return 0;
        }
        println!("{USAGE}");
        return 1;
    }

    if args.len() == 1 && !args[0].starts_with('-') {
        shell.mode = ShellMode::AwaitingReadValue { variable: args[0].clone() };
        return 0;
    }

    println!("{USAGE}");
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_read_suspends_for_arguments() {
        let mut shell = Shell::new();
        assert_eq!(read_runner(&[], &mut shell), 0);
        assert_eq!(
            shell.mode,
            ShellMode::AwaitingBuiltinInput { pending: PendingBuiltin::Read }
        );
    }

    #[test]
    fn read_with_a_variable_awaits_its_value() {
        let mut shell = Shell::new();
        let args = vec!["NAME".to_string()];
        assert_eq!(read_runner(&args, &mut shell), 0);
        assert_eq!(shell.mode, ShellMode::AwaitingReadValue { variable: "NAME".to_string() });
    }

    #[test]
    fn prompt_option_still_awaits_the_value() {
        let mut shell = Shell::new();
        let args = vec!["-p".to_string(), "\"name?\"".to_string(), "WHO".to_string()];
        assert_eq!(read_runner(&args, &mut shell), 0);
        assert_eq!(shell.mode, ShellMode::AwaitingReadValue { variable: "WHO".to_string() });
    }

    #[test]
    fn unsupported_options_print_usage() {
        let mut shell = Shell::new();
        let args = vec!["-t".to_string(), "5".to_string()];
        assert_eq!(read_runner(&args, &mut shell), 1);
        assert_eq!(shell.mode, ShellMode::Idle);
    }
}
