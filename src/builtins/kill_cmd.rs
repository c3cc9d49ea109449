use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::builtins::registry::CommandInfo;
use crate::engine::Shell;

pub const COMMAND_INFO: CommandInfo = CommandInfo { name: "kill", run: kill_runner };

const USAGE: &str =
    "kill: usage: kill [-s sigspec | -n signum | -sigspec] pid | jobspec ... or kill -l [sigspec]";

/// `kill PID` sends SIGTERM; `kill -N PID` sends signal N.
pub fn kill_runner(args: &[String], _shell: &mut Shell) -> i32 {
    match args {
        [] => {
            println!("{USAGE}");
            1
        }
        [pid] => send(pid, Signal::SIGTERM),
        [signal_spec, pid, ..] => {
            let Some(number) = signal_spec.strip_prefix('-') else {
                println!("{USAGE}");
                return 1;
            };
            let signal = match number.parse::<i32>().ok().and_then(|n| Signal::try_from(n).ok()) {
                Some(signal) => signal,
                None => {
                    eprintln!("conch: kill: {signal_spec}: invalid signal specification");
                    return 1;
                }
            };
            send(pid, signal)
        }
    }
}

fn send(pid: &str, signal: Signal) -> i32 {
    let Ok(pid) = pid.parse::<i32>() else {
        eprintln!("conch: kill: {pid}: arguments must be process or job IDs");
        return 1;
    };
    match kill(Pid::from_raw(pid), signal) {
        Ok(()) => 0,
        Err(errno) => {
            eprintln!("conch: kill: ({pid}) - {errno}");
            1
        }
    }
}
