use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;

use nix::libc;

use crate::parser::{RedirectKind, RedirectTarget, Redirection};

use super::pipes::PipeSet;

// ── Plan resolution ───────────────────────────────────────────────────────

/// The winning target for each descriptor after later-overrides-earlier
/// resolution. `&>` claims both stdout and stderr; the clause index is kept
/// so a surviving combined clause opens its target exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct RedirectPlan<'a> {
    stdin: Option<&'a RedirectTarget>,
    stdout: Option<(usize, &'a RedirectTarget)>,
    append: Option<&'a RedirectTarget>,
    stderr: Option<(usize, &'a RedirectTarget)>,
}

impl RedirectPlan<'_> {
    /// Both stdout and stderr still point at the same `&>` clause.
    fn combined(&self) -> bool {
        matches!(
            (&self.stdout, &self.stderr),
            (Some((out, _)), Some((err, _))) if out == err
        )
    }
}

/// Resolve an ordered clause list into at most one target per kind; the last
/// clause of each kind wins and earlier same-kind targets are never opened.
pub fn resolve(redirections: &[Redirection]) -> RedirectPlan<'_> {
    let mut plan = RedirectPlan { stdin: None, stdout: None, append: None, stderr: None };
    for (index, redirection) in redirections.iter().enumerate() {
        match redirection.kind {
            RedirectKind::Stdin => plan.stdin = Some(&redirection.target),
            RedirectKind::Stdout => plan.stdout = Some((index, &redirection.target)),
            RedirectKind::StdoutAppend => plan.append = Some(&redirection.target),
            RedirectKind::Stderr => plan.stderr = Some((index, &redirection.target)),
            RedirectKind::StdoutStderr => {
                plan.stdout = Some((index, &redirection.target));
                plan.stderr = Some((index, &redirection.target));
            }
        }
    }
    plan
}

// ── Child-side application ────────────────────────────────────────────────

/// Point the child's standard descriptors where the stage's clauses say.
/// Runs between fork and exec; the opened `File`s may be dropped afterwards
/// because the descriptors live on at 0/1/2.
pub fn apply(redirections: &[Redirection]) -> io::Result<()> {
    let plan = resolve(redirections);
    let combined = plan.combined();

    if let Some(target) = plan.stdin {
        match target {
            RedirectTarget::FdAlias(fd) => dup_onto(*fd, libc::STDIN_FILENO)?,
            RedirectTarget::Path(path) => {
                let file = File::open(path)?;
                dup_onto(file.as_raw_fd(), libc::STDIN_FILENO)?;
            }
        }
    }

    let mut stderr_done = false;
    if let Some(target) = plan.append {
        match target {
            RedirectTarget::FdAlias(fd) => dup_onto(*fd, libc::STDOUT_FILENO)?,
            RedirectTarget::Path(path) => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .append(true)
                    .mode(0o660)
                    .open(path)?;
                dup_onto(file.as_raw_fd(), libc::STDOUT_FILENO)?;
            }
        }
    } else if let Some((_, target)) = plan.stdout {
        match target {
            RedirectTarget::FdAlias(fd) => dup_onto(*fd, libc::STDOUT_FILENO)?,
            RedirectTarget::Path(path) => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .mode(0o660)
                    .open(path)?;
                dup_onto(file.as_raw_fd(), libc::STDOUT_FILENO)?;
                if combined {
                    dup_onto(file.as_raw_fd(), libc::STDERR_FILENO)?;
                    stderr_done = true;
                }
            }
        }
    }

    if !stderr_done {
        if let Some((_, target)) = plan.stderr {
            match target {
                RedirectTarget::FdAlias(fd) => dup_onto(*fd, libc::STDERR_FILENO)?,
                RedirectTarget::Path(path) => {
                    let file = OpenOptions::new()
                        .write(true)
                        .create(true)
                        .mode(0o660)
                        .open(path)?;
                    dup_onto(file.as_raw_fd(), libc::STDERR_FILENO)?;
                }
            }
        }
    }

    Ok(())
}

/// Wire this stage into its pipeline: read the FIFO to the left, write the
/// FIFO to the right. The read open blocks until the upstream stage opens
/// its write end, which is what serialises pipeline startup.
pub fn attach_pipes(pipes: &PipeSet, position: usize, stage_count: usize) -> io::Result<()> {
    if position > 0 {
        let fifo = File::open(pipes.name(position - 1))?;
        dup_onto(fifo.as_raw_fd(), libc::STDIN_FILENO)?;
    }
    if position + 1 < stage_count {
        let fifo = OpenOptions::new().write(true).open(pipes.name(position))?;
        dup_onto(fifo.as_raw_fd(), libc::STDOUT_FILENO)?;
    }
    Ok(())
}

fn dup_onto(source: i32, descriptor: i32) -> io::Result<()> {
    if unsafe { libc::dup2(source, descriptor) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────
