/// Tail of `s` starting at the first non-space character.
pub fn trim_leading_spaces(s: &str) -> &str {
    s.trim_start_matches(' ')
}

/// Lowercase-fold `s` with ASCII semantics. The flag reports whether the
/// folded string differs from the input.
pub fn fold_lower(s: &str) -> (String, bool) {
    let lowered = s.to_ascii_lowercase();
    let changed = lowered != s;
    (lowered, changed)
}

/// Byte slice of `s` as a new string, or `None` when `begin + len` runs past
/// the end.
pub fn substring(s: &str, begin: usize, len: usize) -> Option<String> {
    if begin + len > s.len() {
        return None;
    }
    s.get(begin..begin + len).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_removes_only_leading_spaces() {
        assert_eq!(trim_leading_spaces("   ls -l "), "ls -l ");
        assert_eq!(trim_leading_spaces("ls"), "ls");
        assert_eq!(trim_leading_spaces("    "), "");
    }

    #[test]
    fn fold_lower_reports_changes() {
        assert_eq!(fold_lower("Ls"), ("ls".to_string(), true));
        assert_eq!(fold_lower("wc"), ("wc".to_string(), false));
        assert_eq!(fold_lower(""), (String::new(), false));
    }

    #[test]
    fn substring_checks_bounds() {
        assert_eq!(substring("pipeline", 0, 4).as_deref(), Some("pipe"));
        assert_eq!(substring("pipeline", 4, 4).as_deref(), Some("line"));
        assert_eq!(substring("pipe", 2, 3), None);
    }
}
