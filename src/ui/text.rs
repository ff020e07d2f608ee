/// Wrap text to fit within a given width.
///
/// Explicit line breaks, leading indentation and runs of spaces are kept.
/// Lines break at whitespace; a word wider than `width` is split by
/// character count.
///
/// # Arguments
/// * `text` - The text to wrap
/// * `width` - Maximum width per line
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_len = 0;
        // Whitespace at a wrap point is dropped, not carried to the next line
        let mut continuation = false;

        for run in split_runs(paragraph) {
            let run_len = run.chars().count();

            if run.starts_with(char::is_whitespace) {
                if continuation && current_line.is_empty() {
                    continue;
                }
                if current_len + run_len > width {
                    lines.push(current_line.trim_end().to_string());
                    current_line.clear();
                    current_len = 0;
                    continuation = true;
                    continue;
                }
                current_line.push_str(run);
                current_len += run_len;
                continue;
            }

            let has_text = current_line.chars().any(|c| !c.is_whitespace());
            if current_len + run_len > width && has_text {
                lines.push(current_line.trim_end().to_string());
                current_line.clear();
                current_len = 0;
                continuation = true;
            }

            for c in run.chars() {
                if current_len == width {
                    lines.push(std::mem::take(&mut current_line));
                    current_len = 0;
                    continuation = true;
                }
                current_line.push(c);
                current_len += 1;
            }
        }

        lines.push(current_line.trim_end().to_string());
    }

    // Drop trailing blank lines left by a final newline
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
}

/// Split into alternating runs of whitespace and non-whitespace.
fn split_runs(s: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut prev_ws = None;

    for (i, c) in s.char_indices() {
        let ws = c.is_whitespace();
        if prev_ws.is_some_and(|p| p != ws) {
            runs.push(&s[start..i]);
            start = i;
        }
        prev_ws = Some(ws);
    }
    if start < s.len() {
        runs.push(&s[start..]);
    }

    runs
}

/// Spinner glyph for the given animation frame.
pub fn spinner_glyph(frame: usize) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    FRAMES[frame % FRAMES.len()]
}
