use thiserror::Error;

/// Everything that can abort a job. One bad job never takes the shell down;
/// the interpreter reports the error and moves on to the next job.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Malformed redirection clause or arithmetic expression.
    #[error("{0}")]
    Parse(String),

    /// A fixed slot table (processes or jobs) is full.
    #[error("Insufficient Resources")]
    Alloc,

    /// The pipeline would need more FIFOs than the per-job limit.
    #[error("pipeline of {0} stages exceeds the pipe limit")]
    PipeLimit(usize),

    /// fork(2) failed; the remainder of the job is refused.
    #[error("fork failed: {0}")]
    Spawn(nix::Error),

    /// Opening a redirect target or FIFO failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
