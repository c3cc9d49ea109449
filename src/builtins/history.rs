use crate::builtins::registry::CommandInfo;
use crate::engine::Shell;

pub const COMMAND_INFO: CommandInfo = CommandInfo { name: "history", run: history_runner };

/// Print the recorded history, numbered from 1. A single numeric argument
/// limits the output to the last N entries.
pub fn history_runner(args: &[String], shell: &mut Shell) -> i32 {
    if args.len() > 1 {
        eprintln!("conch: history: too many arguments");
        return 1;
    }

    let skip = match args.first() {
        Some(arg) => match arg.parse::<usize>() {
            Ok(limit) => shell.history.len().saturating_sub(limit),
            Err(_) => {
                eprintln!("conch: history: {arg}: numeric argument required");
                return 1;
            }
        },
        None => 0,
    };

    for (number, entry) in shell.history.iter().enumerate().skip(skip) {
        println!("  {}  {}", number + 1, entry);
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_arguments_are_rejected() {
        let mut shell = Shell::new();
        let args = vec!["1".to_string(), "2".to_string()];
        assert_eq!(history_runner(&args, &mut shell), 1);
    }

    #[test]
    fn numeric_argument_is_required() {
        let mut shell = Shell::new();
        let args = vec!["five".to_string()];
        assert_eq!(history_runner(&args, &mut shell), 1);
    }

    #[test]
    fn bare_history_succeeds() {
        let mut shell = Shell::new();
        shell.history.push("ls -l".to_string());
        assert_eq!(history_runner(&[], &mut shell), 0);
    }
}
