use std::ffi::CString;

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::sys::wait::waitpid;
use nix::unistd::{ForkResult, Pid, execvp, fork};

use crate::builtins;
use crate::error::ShellError;
use crate::parser::{self, Job, Stage};
use crate::signals;
use crate::strings::fold_lower;

use super::path::find_executable;
use super::pipes::PipeSet;
use super::redirect;
use super::state::Shell;

/// Run one job: builtins in-process, everything else forked with its
/// redirections applied and its pipeline endpoints wired up. Returns how
/// many children were actually forked.
pub fn execute_job(shell: &mut Shell, job: &Job) -> Result<usize, ShellError> {
    let stage_count = job.stages.len();
    if stage_count == 0 {
        return Ok(0);
    }

    let pipes = if stage_count > 1 { Some(PipeSet::create(stage_count)?) } else { None };
    let result = run_stages(shell, job, pipes.as_ref());

    // On fork failure the FIFOs stay behind: stages forked before the
    // failure still open their endpoints by path.
    if !matches!(result, Err(ShellError::Spawn(_))) {
        if let Some(pipes) = pipes {
            pipes.destroy();
        }
    }
    result
}

fn run_stages(shell: &mut Shell, job: &Job, pipes: Option<&PipeSet>) -> Result<usize, ShellError> {
    let stage_count = job.stages.len();
    let mut job_index = if stage_count > 1 { Some(shell.jobs.start_job()?) } else { None };
    let mut forked = 0usize;
    let mut process_error = false;
    let mut announced = false;

    for (position, stage_text) in job.stages.iter().enumerate() {
        let tokens = parser::tokenize(stage_text);
        let Some((name, raw_args)) = tokens.split_first() else {
            continue;
        };
        // Intermediate pipeline stages always run in the background so a
        // full FIFO can never block the terminal.
        let background_stage = if stage_count == 1 { job.background } else { true };

        // Builtins never fork; the raw token list (redirections included)
        // is theirs to interpret.
        if builtins::try_builtin(shell, name, raw_args).is_some() {
            continue;
        }

        let (lowered, case_differs) = fold_lower(name);
        if case_differs || find_executable(&lowered).is_none() {
            eprintln!("conch: {name}: command not found");
            process_error = true;
            continue;
        }

        let stage = match parser::parse_stage(stage_text) {
            Ok(stage) => stage,
            Err(err) => {
                if let Some(index) = job_index {
                    kill_job(shell, index);
                }
                return Err(err);
            }
        };

        let index = match job_index {
            Some(index) => index,
            None => {
                let index = shell.jobs.start_job()?;
                job_index = Some(index);
                index
            }
        };

        let slot = match shell.procs.reserve() {
            Ok(slot) => slot,
            Err(err) => {
                eprintln!("conch: {err}");
                continue;
            }
        };

        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                exec_stage(&stage, position, stage_count, pipes);
            }
            Ok(ForkResult::Parent { child }) => {
                shell.procs.commit(slot, child);
                forked += 1;
                if background_stage {
                    if let Err(err) = shell.jobs.record_process(index, child) {
                        eprintln!("conch: {err}");
                    }
                    if job.background && !announced {
                        println!(
                            "[{}] {} ({}) Job: {}",
                            index + 1,
                            child.as_raw(),
                            stage.command,
                            job.text
                        );
                        announced = true;
                    }
                } else {
                    signals::set_foreground(child);
                    wait_blocking(child);
                    signals::clear_foreground();
                    shell.procs.release(slot);
                }
            }
            Err(errno) => {
                shell.procs.release(slot);
                return Err(ShellError::Spawn(errno));
            }
        }
    }

    if process_error {
        // A stage that never started would leave its pipeline neighbours
        // blocked on a FIFO forever; take the whole job down instead.
        if let Some(index) = job_index {
            kill_job(shell, index);
        }
        return Ok(forked);
    }

    if let Some(index) = job_index {
        if !job.background {
            if stage_count > 1 {
                drain_foreground_job(shell, index);
            }
            shell.jobs.free(index);
        } else if shell.jobs.pids(index).is_empty() {
            // Nothing was recorded for the reaper to finish, so the slot
            // would otherwise linger forever.
            shell.jobs.free(index);
        }
    }

    Ok(forked)
}

/// Blocking wait for every child of a foreground pipeline, in launch order.
/// The PID being waited on is published as the foreground process so signal
/// forwarding keeps working while the shell sits here.
fn drain_foreground_job(shell: &mut Shell, job_index: usize) {
    for pid in shell.jobs.pids(job_index) {
        signals::set_foreground(pid);
        wait_blocking(pid);
        signals::clear_foreground();
        shell.procs.release_pid(pid);
        shell.jobs.clear_pid(job_index, pid);
    }
}

/// SIGKILL everything already forked for the job and free its slot. The
/// process-table entries stay: the reaper collects the corpses on the next
/// prompt.
fn kill_job(shell: &mut Shell, job_index: usize) {
    for pid in shell.jobs.pids(job_index) {
        let _ = kill(pid, Signal::SIGKILL);
    }
    shell.jobs.free(job_index);
}

fn wait_blocking(pid: Pid) {
    loop {
        match waitpid(pid, None) {
            Err(Errno::EINTR) => continue,
            _ => break,
        }
    }
}

/// Child side: apply redirections, splice in the pipeline FIFOs, then
/// replace the image. Never returns.
fn exec_stage(stage: &Stage, position: usize, stage_count: usize, pipes: Option<&PipeSet>) -> ! {
    if let Err(err) = redirect::apply(&stage.redirections) {
        eprintln!("conch: {err}");
        std::process::exit(1);
    }
    if let Some(pipes) = pipes {
        if let Err(err) = redirect::attach_pipes(pipes, position, stage_count) {
            eprintln!("conch: {err}");
            std::process::exit(1);
        }
    }

    let Ok(program) = CString::new(stage.command.as_str()) else {
        eprintln!("conch: {}: invalid command name", stage.command);
        std::process::exit(1);
    };
    let mut argv = vec![program.clone()];
    for arg in &stage.args {
        match CString::new(arg.as_str()) {
            Ok(arg) => argv.push(arg),
            Err(_) => {
                eprintln!("conch: {}: invalid argument", stage.command);
                std::process::exit(1);
            }
        }
    }

    if let Err(errno) = execvp(&program, &argv) {
        eprintln!("conch: {}: {errno}", stage.command);
    }
    std::process::exit(127);
}
