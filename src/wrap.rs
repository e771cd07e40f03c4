use crate::ansi::visible_width;

/// Narrowest body a wrapped line may have, however wide its prefix.
pub const MIN_WRAP_WIDTH: usize = 20;

/// Wraps `text` so that every line fits `width` columns including `prefix`.
///
/// Explicit newlines are kept; each segment between them is wrapped greedily on
/// whitespace. A word longer than the available width gets a line of its own and
/// is never split. Empty segments come out as a bare `prefix`.
pub fn wrap_text(text: &str, prefix: &str, width: usize) -> Vec<String> {
    let available = width
        .saturating_sub(visible_width(prefix))
        .max(MIN_WRAP_WIDTH);

    let mut lines = Vec::new();
    for segment in text.split('\n') {
        let segment = segment.strip_suffix('\r').unwrap_or(segment);
        let wrapped = wrap_segment(segment, available);
        if wrapped.is_empty() {
            lines.push(prefix.to_string());
            continue;
        }
        lines.extend(wrapped.into_iter().map(|l| format!("{prefix}{l}")));
    }
    lines
}

fn wrap_segment(segment: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in segment.split_whitespace() {
        let word_width = visible_width(word);

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
