use std::path::{Path, PathBuf};

use nix::sys::stat::Mode;
use nix::unistd::mkfifo;

use crate::error::ShellError;

pub const MAX_PIPES_PER_JOB: usize = 256;

/// The named FIFOs interconnecting one pipeline: `fifo0`, `fifo1`, … in the
/// current working directory. Each forked stage opens its endpoints by path,
/// so no descriptor juggling survives the fork.
#[derive(Debug)]
pub struct PipeSet {
    names: Vec<PathBuf>,
}

impl PipeSet {
    /// Create the `stages - 1` FIFOs for a pipeline, with mode 0777, reusing
    /// any that already exist.
    pub fn create(stages: usize) -> Result<PipeSet, ShellError> {
        let count = stages.saturating_sub(1);
        if count > MAX_PIPES_PER_JOB {
            return Err(ShellError::PipeLimit(stages));
        }
        let mut names = Vec::with_capacity(count);
        for index in 0..count {
            let name = PathBuf::from(format!("fifo{index}"));
            if !name.exists() {
                mkfifo(&name, Mode::from_bits_truncate(0o777)).map_err(|errno| {
                    ShellError::Io(std::io::Error::from_raw_os_error(errno as i32))
                })?;
            }
            names.push(name);
        }
        Ok(PipeSet { names })
    }

    /// Path of the FIFO between stage `index` and stage `index + 1`.
    pub fn name(&self, index: usize) -> &Path {
        &self.names[index]
    }

    /// Unlink every FIFO of this pipeline.
    pub fn destroy(self) {
        for name in self.names {
            let _ = std::fs::remove_file(name);
        }
    }
}
