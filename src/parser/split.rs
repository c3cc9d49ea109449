use crate::strings::trim_leading_spaces;

use super::ast::Job;

// ── Script → jobs ─────────────────────────────────────────────────────────

/// Split a script line into its jobs. `;` and `&` both terminate a job; `&`
/// additionally marks the job it terminates as a background job. A trailing
/// separator is permitted and empty jobs are discarded, so `"ls;"` and
/// `"; ls ;"` each yield a single job.
pub fn parse_script(script: &str) -> Vec<Job> {
    let mut jobs = Vec::new();
    let mut current = String::new();
    for ch in script.chars() {
        match ch {
            ';' => {
                flush_job(&mut jobs, &mut current, false);
            }
            '&' => {
                flush_job(&mut jobs, &mut current, true);
            }
            _ => current.push(ch),
        }
    }
    flush_job(&mut jobs, &mut current, false);
    jobs
}

fn flush_job(jobs: &mut Vec<Job>, current: &mut String, background: bool) {
    let text = trim_leading_spaces(current).trim_end();
    if !text.is_empty() {
        jobs.push(parse_job(text, background));
    }
    current.clear();
}

// ── Job → stages ──────────────────────────────────────────────────────────

/// Split one job into its pipeline stages and settle its background flag.
/// A `&` left at the end of the last stage (separately or glued to the final
/// token) backgrounds the whole job and is stripped.
pub fn parse_job(text: &str, terminated_background: bool) -> Job {
    let mut background = terminated_background;
    let mut stages: Vec<String> = text
        .split('|')
        .map(|stage| trim_leading_spaces(stage).trim_end().to_string())
        .filter(|stage| !stage.is_empty())
        .collect();

    let mut drop_last = false;
    if let Some(last) = stages.last_mut() {
        if let Some(stripped) = last.strip_suffix('&') {
            background = true;
            *last = stripped.trim_end().to_string();
            drop_last = last.is_empty();
        }
    }
    if drop_last {
        stages.pop();
    }

    Job { text: text.to_string(), background, stages }
}

// ── Stage → tokens ────────────────────────────────────────────────────────

/// Whitespace tokenisation of a stage. Runs of blanks collapse; the first
/// token is the command name.
pub fn tokenize(stage: &str) -> Vec<String> {
    stage.split_whitespace().map(str::to_string).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────
