//! Routes every catchable signal. While a foreground child runs, signals
//! aimed at the shell (Ctrl-C and friends) are forwarded to that child; with
//! no foreground child the saved disposition is restored, the signal is
//! re-raised so the default action runs, and the router is reinstalled.

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use nix::libc;
use nix::unistd::Pid;

const SIGNAL_TABLE_SIZE: usize = 32;

/// PID of the child the shell is currently blocked waiting on, 0 otherwise.
/// An atomic because the handler reads it between any two shell instructions.
static FOREGROUND_PID: AtomicI32 = AtomicI32::new(0);

/// Dispositions that were installed before ours, indexed by signal number.
static PREVIOUS_DISPOSITIONS: [AtomicUsize; SIGNAL_TABLE_SIZE] =
    [const { AtomicUsize::new(libc::SIG_DFL) }; SIGNAL_TABLE_SIZE];

/// The handler itself. Only async-signal-safe calls: an atomic load and
/// kill/signal/raise.
extern "C" fn route_signal(signal_code: libc::c_int) {
    let foreground = FOREGROUND_PID.load(Ordering::SeqCst);
    if foreground != 0 {
        unsafe {
            libc::kill(foreground, signal_code);
        }
        return;
    }
    let previous = PREVIOUS_DISPOSITIONS[signal_code as usize].load(Ordering::SeqCst);
    unsafe {
        libc::signal(signal_code, previous);
        libc::raise(signal_code);
        libc::signal(signal_code, router_disposition());
    }
}

fn router_disposition() -> libc::sighandler_t {
    route_signal as extern "C" fn(libc::c_int) as libc::sighandler_t
}

/// Install the router for every signal in [1, 31] the OS lets us catch,
/// remembering the dispositions it replaces. `SA_RESTART` is deliberately
/// left clear so a forwarded signal interrupts the shell's blocking waits.
pub fn install() {
    for signal_code in 1..SIGNAL_TABLE_SIZE as i32 {
        if signal_code == libc::SIGKILL || signal_code == libc::SIGSTOP {
            continue;
        }
        let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
        action.sa_sigaction = router_disposition();
        action.sa_flags = 0;
        unsafe {
            libc::sigemptyset(&mut action.sa_mask);
        }
        let mut old: libc::sigaction = unsafe { std::mem::zeroed() };
        if unsafe { libc::sigaction(signal_code, &action, &mut old) } == 0 {
            PREVIOUS_DISPOSITIONS[signal_code as usize]
                .store(old.sa_sigaction, Ordering::SeqCst);
        }
    }
}

/// Mark `pid` as the foreground child for the duration of a blocking wait.
pub fn set_foreground(pid: Pid) {
    FOREGROUND_PID.store(pid.as_raw(), Ordering::SeqCst);
}

pub fn clear_foreground() {
    FOREGROUND_PID.store(0, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreground_pid_round_trips() {
        set_foreground(Pid::from_raw(4321));
        assert_eq!(FOREGROUND_PID.load(Ordering::SeqCst), 4321);
        clear_foreground();
        assert_eq!(FOREGROUND_PID.load(Ordering::SeqCst), 0);
    }
}
