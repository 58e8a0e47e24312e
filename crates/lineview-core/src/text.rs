pub(crate) fn split_lines_preserve_trailing(text: &str) -> Vec<String> {
    // `str::split('\n')` preserves trailing empty segments (N newlines => N+1 lines).
    text.split('\n').map(str::to_string).collect()
}

/// Expand every `'\t'` in `text` to `tab_size` spaces.
///
/// Tabs are expanded to a fixed run of spaces rather than to the next tab stop, so the visual
/// width of a prefix only depends on the prefix itself.
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + tab_size * 4);
    for ch in text.chars() {
        if ch == '\t' {
            out.extend(std::iter::repeat_n(' ', tab_size));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Map a raw char column to the char column in [`expand_tabs`] output.
pub fn expanded_column(text: &str, column: usize, tab_size: usize) -> usize {
    text.chars()
        .take(column)
        .map(|ch| if ch == '\t' { tab_size } else { 1 })
        .sum()
}
