// ── Job and stage types ───────────────────────────────────────────────────

/// One `;`/`&`-separated unit of a script. Stages are kept as raw text; the
/// executor tokenises each stage right before dispatching it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Job {
    /// The job's text as the user typed it (leading/trailing blanks removed,
    /// separator stripped).
    pub text: String,
    /// True when the job was terminated by `&` or its last stage ended in `&`.
    pub background: bool,
    /// The `|`-separated pipeline stages, in order. Never empty for a job
    /// produced by [`super::parse_script`].
    pub stages: Vec<String>,
}

/// A fully parsed pipeline stage: what `execvp` will receive, plus its
/// redirections. `args` holds only ordinary tokens; no redirection token
/// ever reaches the exec argument vector.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Stage {
    pub command: String,
    pub args: Vec<String>,
    pub redirections: Vec<Redirection>,
}

// ── Redirections ──────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectKind {
    /// `< file`, `0<file`, `0>&N`
    Stdin,
    /// `> file`, `1>file`
    Stdout,
    /// `2>file`
    Stderr,
    /// `&>file`: stdout and stderr to the same target
    StdoutStderr,
    /// `>>file`: stdout, append mode
    StdoutAppend,
}

/// Where a redirected descriptor points: a filesystem path, or an already
/// open descriptor named with the `&N` syntax.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RedirectTarget {
    Path(String),
    FdAlias(i32),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Redirection {
    pub kind: RedirectKind,
    pub target: RedirectTarget,
}
