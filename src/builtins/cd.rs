use std::env;

use crate::builtins::registry::CommandInfo;
use crate::engine::Shell;
use crate::engine::path::expand_home;

pub const COMMAND_INFO_CD: CommandInfo = CommandInfo { name: "cd", run: cd_runner };
pub const COMMAND_INFO_PWD: CommandInfo = CommandInfo { name: "pwd", run: pwd_runner };

pub fn cd_runner(args: &[String], _shell: &mut Shell) -> i32 {
    let target = match args.first() {
        Some(arg) => expand_home(arg),
        None => match dirs::home_dir() {
            Some(home) => home,
            None => {
                eprintln!("conch: cd: could not find home directory");
                return 1;
            }
        },
    };

    if env::set_current_dir(&target).is_err() {
        eprintln!("conch: cd: no such file or directory: {}", target.display());
        return 1;
    }
    0
}

pub fn pwd_runner(_args: &[String], _shell: &mut Shell) -> i32 {
    match env::current_dir() {
        Ok(path) => {
            println!("{}", path.display());
            0
        }
        Err(err) => {
            eprintln!("conch: pwd: {err}");
            1
        }
    }
}
