use std::sync::LazyLock;

use regex::Regex;

static SGR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]*m").expect("static SGR pattern")
});

/// Number of visible characters in `s`, ignoring SGR color/style sequences.
///
/// Anything that only looks like the start of a sequence (a bare `ESC`, or
/// `ESC[` without the closing `m`) counts as literal text.
pub fn visible_width(s: &str) -> usize {
    if !s.contains('\x1b') {
        return s.chars().count();
    }
    let hidden: usize = SGR
        .find_iter(s)
        .map(|m| m.as_str().chars().count())
        .sum();
    s.chars().count() - hidden
}

/// Removes every SGR sequence from `s`.
pub fn strip(s: &str) -> String {
    SGR.replace_all(s, "").into_owned()
}
