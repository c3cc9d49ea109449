use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

use crate::error::ShellError;

pub const MAX_ACTIVE_PROCESSES: usize = 10;
pub const MAX_JOBS_RUNNING: usize = 10;

// ── Process table ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessSlot {
    Free,
    /// Claimed before the fork so exhaustion is detected while refusal is
    /// still cheap.
    Reserved,
    Running(Pid),
}

/// Fixed-capacity table of the shell's live children. Slot indices are
/// stable for the lifetime of a child, so the executor can release the exact
/// slot it reserved.
#[derive(Debug)]
pub struct ProcessTable {
    slots: [ProcessSlot; MAX_ACTIVE_PROCESSES],
    active: usize,
}

impl ProcessTable {
    pub fn new() -> Self {
        ProcessTable { slots: [ProcessSlot::Free; MAX_ACTIVE_PROCESSES], active: 0 }
    }

    /// Claim a free slot for a process about to be forked.
    pub fn reserve(&mut self) -> Result<usize, ShellError> {
        if self.active == MAX_ACTIVE_PROCESSES {
            return Err(ShellError::Alloc);
        }
        let index = self
            .slots
            .iter()
            .position(|slot| *slot == ProcessSlot::Free)
            .ok_or(ShellError::Alloc)?;
        self.slots[index] = ProcessSlot::Reserved;
        self.active += 1;
        Ok(index)
    }

    /// Record the forked PID in its reserved slot.
    pub fn commit(&mut self, index: usize, pid: Pid) {
        self.slots[index] = ProcessSlot::Running(pid);
    }

    pub fn release(&mut self, index: usize) {
        if self.slots[index] != ProcessSlot::Free {
            self.slots[index] = ProcessSlot::Free;
            self.active -= 1;
        }
    }

    pub fn release_pid(&mut self, pid: Pid) {
        if let Some(index) = self.index_of(pid) {
            self.release(index);
        }
    }

    pub fn index_of(&self, pid: Pid) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == ProcessSlot::Running(pid))
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    fn running(&self) -> Vec<(usize, Pid)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                ProcessSlot::Running(pid) => Some((index, *pid)),
                _ => None,
            })
            .collect()
    }
}

// ── Job table ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum JobSlot {
    Free,
    Active { pids: [Option<Pid>; MAX_ACTIVE_PROCESSES], count: usize },
}

/// Fixed-capacity table of running jobs. Each active slot remembers the PIDs
/// launched for that job; the job ends when its last process is finished.
#[derive(Debug)]
pub struct JobTable {
    slots: [JobSlot; MAX_JOBS_RUNNING],
    active: usize,
}

impl JobTable {
    pub fn new() -> Self {
        JobTable { slots: std::array::from_fn(|_| JobSlot::Free), active: 0 }
    }

    /// Claim a job slot. The returned index is what status lines report
    /// (plus one).
    pub fn start_job(&mut self) -> Result<usize, ShellError> {
        if self.active == MAX_JOBS_RUNNING {
            return Err(ShellError::Alloc);
        }
        let index = self
            .slots
            .iter()
            .position(|slot| *slot == JobSlot::Free)
            .ok_or(ShellError::Alloc)?;
        self.slots[index] =
            JobSlot::Active { pids: [None; MAX_ACTIVE_PROCESSES], count: 0 };
        self.active += 1;
        Ok(index)
    }

    /// Attach a forked PID to its job.
    pub fn record_process(&mut self, job_index: usize, pid: Pid) -> Result<(), ShellError> {
        match &mut self.slots[job_index] {
            JobSlot::Active { pids, count } => {
                if *count == MAX_ACTIVE_PROCESSES {
                    return Err(ShellError::Alloc);
                }
                pids[*count] = Some(pid);
                *count += 1;
                Ok(())
            }
            JobSlot::Free => Err(ShellError::Alloc),
        }
    }

    /// Drop `pid` from whichever job holds it. When that was the job's last
    /// process the slot is freed and the completion line is printed.
    /// Returns false when no job knows the PID.
    pub fn finish_process(&mut self, pid: Pid) -> bool {
        let Some(job_index) = self.job_of(pid) else {
            return false;
        };
        let mut emptied = false;
        if let JobSlot::Active { pids, count } = &mut self.slots[job_index] {
            for slot in pids.iter_mut() {
                if *slot == Some(pid) {
                    *slot = None;
                    *count -= 1;
                    break;
                }
            }
            emptied = *count == 0;
        }
        if emptied {
            self.slots[job_index] = JobSlot::Free;
            self.active -= 1;
            println!("[{}]+\tJob Finished (done/exited/stopped)", job_index + 1);
        }
        true
    }

    pub fn job_of(&self, pid: Pid) -> Option<usize> {
        self.slots.iter().position(|slot| match slot {
            JobSlot::Active { pids, .. } => pids.contains(&Some(pid)),
            JobSlot::Free => false,
        })
    }

    /// Snapshot of the PIDs currently attached to a job.
    pub fn pids(&self, job_index: usize) -> Vec<Pid> {
        match &self.slots[job_index] {
            JobSlot::Active { pids, .. } => pids.iter().filter_map(|p| *p).collect(),
            JobSlot::Free => Vec::new(),
        }
    }

    pub fn clear_pid(&mut self, job_index: usize, pid: Pid) {
        if let JobSlot::Active { pids, count } = &mut self.slots[job_index] {
            for slot in pids.iter_mut() {
                if *slot == Some(pid) {
                    *slot = None;
                    *count -= 1;
                    return;
                }
            }
        }
    }

    /// Free a job slot without the completion message (foreground jobs and
    /// aborted pipelines).
    pub fn free(&mut self, job_index: usize) {
        if self.slots[job_index] != JobSlot::Free {
            self.slots[job_index] = JobSlot::Free;
            self.active -= 1;
        }
    }

    pub fn active_count(&self) -> usize {
        self.active
    }
}

// ── Background reaping ────────────────────────────────────────────────────

/// Non-blocking sweep of every tracked child, run before each prompt. A
/// child that has exited, stopped, or died on a signal is finished in both
/// tables; everything else is left untouched, so the terminal never waits
/// here.
pub fn reap_background(procs: &mut ProcessTable, jobs: &mut JobTable) {
    for (index, pid) in procs.running() {
        let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED;
        match waitpid(pid, Some(flags)) {
            Ok(WaitStatus::StillAlive) => {}
            Ok(WaitStatus::Continued(_)) => {}
            Ok(_) | Err(Errno::ECHILD) => {
                jobs.finish_process(pid);
                procs.release(index);
            }
            Err(_) => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: i32) -> Pid {
        Pid::from_raw(n)
    }

    #[test]
    fn process_table_refuses_an_eleventh_slot() {
        let mut table = ProcessTable::new();
        for _ in 0..MAX_ACTIVE_PROCESSES {
            table.reserve().unwrap();
        }
        assert!(matches!(table.reserve(), Err(ShellError::Alloc)));
    }

    #[test]
    fn released_slots_are_reused() {
        let mut table = ProcessTable::new();
        let first = table.reserve().unwrap();
        table.commit(first, pid(100));
        assert_eq!(table.index_of(pid(100)), Some(first));
        table.release(first);
        assert_eq!(table.active_count(), 0);
        assert_eq!(table.reserve().unwrap(), first);
    }

    #[test]
    fn double_release_keeps_the_count_consistent() {
        let mut table = ProcessTable::new();
        let slot = table.reserve().unwrap();
        table.commit(slot, pid(7));
        table.release(slot);
        table.release(slot);
        assert_eq!(table.active_count(), 0);
    }

    #[test]
    fn job_table_refuses_an_eleventh_job() {
        let mut table = JobTable::new();
        for _ in 0..MAX_JOBS_RUNNING {
            table.start_job().unwrap();
        }
        assert!(matches!(table.start_job(), Err(ShellError::Alloc)));
    }

    #[test]
    fn finishing_the_last_process_frees_the_job() {
        let mut table = JobTable::new();
        let job = table.start_job().unwrap();
        table.record_process(job, pid(41)).unwrap();
        table.record_process(job, pid(42)).unwrap();

        assert!(table.finish_process(pid(41)));
        assert_eq!(table.active_count(), 1);
        assert_eq!(table.job_of(pid(42)), Some(job));

        assert!(table.finish_process(pid(42)));
        assert_eq!(table.active_count(), 0);
        assert_eq!(table.job_of(pid(42)), None);
    }

    #[test]
    fn unknown_pid_is_reported_as_not_found() {
        let mut table = JobTable::new();
        table.start_job().unwrap();
        assert!(!table.finish_process(pid(999)));
    }

    #[test]
    fn a_pid_belongs_to_exactly_one_job() {
        let mut table = JobTable::new();
        let first = table.start_job().unwrap();
        let second = table.start_job().unwrap();
        table.record_process(first, pid(10)).unwrap();
        table.record_process(second, pid(20)).unwrap();
        assert_eq!(table.job_of(pid(10)), Some(first));
        assert_eq!(table.job_of(pid(20)), Some(second));
    }

    #[test]
    fn job_slot_refuses_more_pids_than_process_capacity() {
        let mut table = JobTable::new();
        let job = table.start_job().unwrap();
        for n in 0..MAX_ACTIVE_PROCESSES {
            table.record_process(job, pid(100 + n as i32)).unwrap();
        }
        assert!(matches!(
            table.record_process(job, pid(999)),
            Err(ShellError::Alloc)
        ));
    }

    #[test]
    fn reap_with_no_tracked_children_changes_nothing() {
        let mut procs = ProcessTable::new();
        let mut jobs = JobTable::new();
        reap_background(&mut procs, &mut jobs);
        reap_background(&mut procs, &mut jobs);
        assert_eq!(procs.active_count(), 0);
        assert_eq!(jobs.active_count(), 0);
    }
}
