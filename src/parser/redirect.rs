use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{multispace0, one_of};
use nom::combinator::opt;
use nom::sequence::terminated;
use nom::{IResult, Parser};

use crate::error::ShellError;

use super::ast::{RedirectKind, RedirectTarget, Redirection, Stage};

// ── Low-level nom parsers ─────────────────────────────────────────────────

/// One whitespace-delimited token.
fn word(input: &str) -> IResult<&str, &str> {
    is_not(" \t")(input)
}

/// `>>` must be tried before `>`.
fn redirection_symbol(input: &str) -> IResult<&str, &str> {
    alt((tag(">>"), tag(">"), tag("<"))).parse(input)
}

/// Optional descriptor prefix (`0`, `1`, `2`, or `&`), with any amount of
/// padding between it and the symbol.
fn fd_prefix(input: &str) -> IResult<&str, Option<char>> {
    opt(terminated(one_of("012&"), multispace0)).parse(input)
}

/// The raw pieces of one clause: prefix, symbol, and (possibly missing)
/// target token. Semantic validation happens in [`extract_redirections`].
fn clause_parts(input: &str) -> IResult<&str, (Option<char>, &str, Option<&str>)> {
    let (input, prefix) = fd_prefix(input)?;
    let (input, symbol) = redirection_symbol(input)?;
    let (input, _) = multispace0(input)?;
    let (input, target) = opt(word).parse(input)?;
    Ok((input, (prefix, symbol, target)))
}

// ── Clause boundary detection ─────────────────────────────────────────────

/// Does the remaining input open a redirection clause? True for a leading
/// `<`/`>`, for a descriptor glued to a symbol (`2>err`, `&>log`), and for a
/// bare descriptor token whose next token starts with a symbol (`2 > err`).
/// A bare digit followed by an ordinary token stays an argument.
fn starts_redirection(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some('<' | '>') => true,
        Some('0' | '1' | '2' | '&') => {
            let tail = &rest[1..];
            if tail.starts_with('<') || tail.starts_with('>') {
                return true;
            }
            if !tail.starts_with(' ') && !tail.starts_with('\t') {
                return false;
            }
            let next = tail.trim_start();
            next.starts_with('<') || next.starts_with('>')
        }
        _ => false,
    }
}

// ── Public surface ────────────────────────────────────────────────────────

/// Scan a stage left to right. Tokens before the first redirection clause are
/// ordinary arguments; everything from that point on must parse as clauses.
/// The clauses come back in source order, so a later clause of the same kind
/// overrides an earlier one when the plan is resolved at exec time.
pub fn extract_redirections(stage: &str) -> Result<(Vec<String>, Vec<Redirection>), ShellError> {
    let mut rest = stage.trim_start();
    let mut tokens = Vec::new();
    let mut clauses = Vec::new();
    let mut in_clauses = false;

    while !rest.is_empty() {
        if !in_clauses {
            if starts_redirection(rest) {
                in_clauses = true;
                continue;
            }
            match word(rest) {
                Ok((next, token)) => {
                    tokens.push(token.to_string());
                    rest = next.trim_start();
                }
                Err(_) => break,
            }
        } else {
            let (next, (prefix, symbol, target)) = clause_parts(rest).map_err(|_| {
                ShellError::Parse(format!("bad redirection near `{}`", rest.trim_end()))
            })?;
            let target = target.ok_or_else(|| {
                ShellError::Parse(format!("missing redirection target after `{symbol}`"))
            })?;
            if target.starts_with('<') || target.starts_with('>') {
                return Err(ShellError::Parse(format!(
                    "unexpected `{target}` after `{symbol}`"
                )));
            }
            clauses.push(build_redirection(prefix, symbol, target)?);
            rest = next.trim_start();
        }
    }

    Ok((tokens, clauses))
}

/// Parse a stage into its exec-ready form: command name, ordinary arguments,
/// and ordered redirections.
pub fn parse_stage(text: &str) -> Result<Stage, ShellError> {
    let (tokens, redirections) = extract_redirections(text)?;
    let mut tokens = tokens.into_iter();
    let command = tokens
        .next()
        .ok_or_else(|| ShellError::Parse("empty command".to_string()))?;
    Ok(Stage { command, args: tokens.collect(), redirections })
}

fn build_redirection(
    prefix: Option<char>,
    symbol: &str,
    target: &str,
) -> Result<Redirection, ShellError> {
    let target = parse_target(target);
    let kind = match (symbol, prefix) {
        ("<", None | Some('0')) => RedirectKind::Stdin,
        (">>", None | Some('1')) => RedirectKind::StdoutAppend,
        (">", None | Some('1')) => RedirectKind::Stdout,
        (">", Some('2')) => RedirectKind::Stderr,
        (">", Some('&')) => RedirectKind::StdoutStderr,
        // 0>&N duplicates descriptor N onto stdin.
        (">", Some('0')) if matches!(target, RedirectTarget::FdAlias(_)) => RedirectKind::Stdin,
        _ => {
            let prefix = prefix.map(String::from).unwrap_or_default();
            return Err(ShellError::Parse(format!(
                "unsupported redirection `{prefix}{symbol}`"
            )));
        }
    };
    Ok(Redirection { kind, target })
}

/// `&N` names an existing descriptor; anything else is a path.
fn parse_target(target: &str) -> RedirectTarget {
    if let Some(rest) = target.strip_prefix('&') {
        if let Ok(fd) = rest.parse::<i32>() {
            return RedirectTarget::FdAlias(fd);
        }
    }
    RedirectTarget::Path(target.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> RedirectTarget {
        RedirectTarget::Path(p.to_string())
    }

    #[test]
    fn plain_stage_has_no_clauses() {
        let stage = parse_stage("grep foo bar").unwrap();
        assert_eq!(stage.command, "grep");
        assert_eq!(stage.args, vec!["foo", "bar"]);
        assert!(stage.redirections.is_empty());
    }

    #[test]
    fn stdin_redirections() {
        let stage = parse_stage("sort < in.txt").unwrap();
        assert_eq!(stage.args, Vec::<String>::new());
        assert_eq!(
            stage.redirections,
            vec![Redirection { kind: RedirectKind::Stdin, target: path("in.txt") }]
        );

        let stage = parse_stage("sort 0<in.txt").unwrap();
        assert_eq!(stage.redirections[0].kind, RedirectKind::Stdin);
    }

    #[test]
    fn stdout_forms() {
        for text in ["echo hi > out", "echo hi 1> out", "echo hi 1 > out"] {
            let stage = parse_stage(text).unwrap();
            assert_eq!(stage.args, vec!["hi"], "args for {text}");
            assert_eq!(
                stage.redirections,
                vec![Redirection { kind: RedirectKind::Stdout, target: path("out") }],
                "clauses for {text}"
            );
        }
    }

    #[test]
    fn append_and_stderr_and_combined() {
        let stage = parse_stage("cc main.c >>build.log").unwrap();
        assert_eq!(stage.redirections[0].kind, RedirectKind::StdoutAppend);

        let stage = parse_stage("cc main.c 2>errors").unwrap();
        assert_eq!(stage.redirections[0].kind, RedirectKind::Stderr);

        let stage = parse_stage("make &>all.log").unwrap();
        assert_eq!(
            stage.redirections,
            vec![Redirection { kind: RedirectKind::StdoutStderr, target: path("all.log") }]
        );
    }

    #[test]
    fn fd_aliases() {
        let stage = parse_stage("cc main.c 2>&1").unwrap();
        assert_eq!(
            stage.redirections,
            vec![Redirection { kind: RedirectKind::Stderr, target: RedirectTarget::FdAlias(1) }]
        );

        let stage = parse_stage("cmd 1>&2").unwrap();
        assert_eq!(stage.redirections[0].kind, RedirectKind::Stdout);
        assert_eq!(stage.redirections[0].target, RedirectTarget::FdAlias(2));

        let stage = parse_stage("cmd 0>&1").unwrap();
        assert_eq!(stage.redirections[0].kind, RedirectKind::Stdin);
    }

    #[test]
    fn later_clauses_keep_source_order() {
        let stage = parse_stage("cmd > first 2> err > second").unwrap();
        assert_eq!(stage.redirections.len(), 3);
        assert_eq!(stage.redirections[0].target, path("first"));
        assert_eq!(stage.redirections[2].target, path("second"));
    }

    #[test]
    fn digit_arguments_stay_arguments() {
        let stage = parse_stage("echo 2 3").unwrap();
        assert_eq!(stage.args, vec!["2", "3"]);
        assert!(stage.redirections.is_empty());
    }

    #[test]
    fn missing_target_is_an_error() {
        assert!(matches!(parse_stage("cmd >"), Err(ShellError::Parse(_))));
        assert!(matches!(parse_stage("cmd 2>"), Err(ShellError::Parse(_))));
    }

    #[test]
    fn adjacent_symbols_are_an_error() {
        assert!(matches!(parse_stage("cmd > > f"), Err(ShellError::Parse(_))));
        assert!(matches!(parse_stage("cmd < > f"), Err(ShellError::Parse(_))));
    }

    #[test]
    fn stray_token_after_clauses_is_an_error() {
        assert!(matches!(parse_stage("cmd > f junk"), Err(ShellError::Parse(_))));
    }

    #[test]
    fn stderr_append_is_rejected() {
        assert!(matches!(parse_stage("cmd 2>>log"), Err(ShellError::Parse(_))));
        assert!(matches!(parse_stage("cmd &>>log"), Err(ShellError::Parse(_))));
    }

    #[test]
    fn arguments_end_at_the_first_clause() {
        let (tokens, clauses) = extract_redirections("tr a b < in > out").unwrap();
        assert_eq!(tokens, vec!["tr", "a", "b"]);
        assert_eq!(clauses.len(), 2);
    }
}
