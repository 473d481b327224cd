//! Wildcard pattern matching for repository, group, and name filters.
//!
//! Patterns support `*` (any run of characters, including empty) and `?`
//! (exactly one character). Everything else is literal, including characters
//! that would be metacharacters in a regex. Matching is a two-pointer scan
//! with `*` backtracking; no regex engine is involved.

/// Tests a value against a wildcard pattern. Full-string match: the whole
/// value must be consumed by the whole pattern. An empty pattern matches
/// only an empty value.
pub fn matches(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let mut v = 0;
    let mut p = 0;
    // Position after the most recent '*' and the value index it has consumed up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == value[v]) {
            v += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p + 1, v));
            p += 1;
        } else if let Some((star_p, star_v)) = backtrack {
            // Let the last '*' swallow one more character and retry.
            p = star_p;
            v = star_v + 1;
            backtrack = Some((star_p, star_v + 1));
        } else {
            return false;
        }
    }

    // Trailing stars match the empty run.
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

/// Tests a value against a list of patterns with OR semantics.
///
/// Returns false when the value is absent or empty, and false for an empty
/// pattern list. A caller that treats an empty list as "no constraint" must
/// skip this call rather than rely on the matcher.
pub fn matches_any(value: Option<&str>, patterns: &[String]) -> bool {
    match value {
        Some(value) if !value.is_empty() => patterns.iter().any(|p| matches(value, p)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_mark_matches_exactly_one_character() {
        assert!(matches("app1", "app?"));
        assert!(!matches("app12", "app?"));
        assert!(!matches("app", "app?"));
    }

    #[test]
    fn star_matches_any_run() {
        assert!(matches("app", "app*"));
        assert!(matches("application", "app*"));
        assert!(matches("my-app-server", "*app*"));
        assert!(matches("abc", "*"));
        assert!(matches("", "*"));
        assert!(matches("a.b.c", "a*c"));
        assert!(!matches("application", "*server"));
    }

    #[test]
    fn metacharacters_are_literal() {
        assert!(!matches("appXtest", "app.test"));
        assert!(matches("app.test", "app.test"));
        assert!(matches("lib[1]", "lib[1]"));
        assert!(!matches("lib1", "lib[1]"));
        assert!(matches("a+b", "a+b"));
        assert!(!matches("aab", "a+b"));
    }

    #[test]
    fn empty_pattern_matches_only_empty_value() {
        assert!(matches("", ""));
        assert!(!matches("x", ""));
    }

    #[test]
    fn backtracking_handles_repeated_segments() {
        assert!(matches("abcabcabd", "a*abd"));
        assert!(matches("aaa", "a*a"));
        assert!(!matches("abcabc", "a*d"));
        assert!(matches("com.example.demo", "com.*.demo"));
    }

    #[test]
    fn matches_any_is_or_over_patterns() {
        let patterns = vec!["maven-*".to_string(), "npm-?".to_string()];
        assert!(matches_any(Some("maven-releases"), &patterns));
        assert!(matches_any(Some("npm-1"), &patterns));
        assert!(!matches_any(Some("docker-hub"), &patterns));
    }

    #[test]
    fn matches_any_rejects_absent_or_empty_value() {
        let patterns = vec!["*".to_string()];
        assert!(!matches_any(None, &patterns));
        assert!(!matches_any(Some(""), &patterns));
        assert!(!matches_any(Some("anything"), &[]));
    }
}
