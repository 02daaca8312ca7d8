//! Whitespace and newline normalization for extracted text.
//!
//! Text read out of a rendered page carries non-breaking spaces, carriage
//! returns and arbitrary runs of blank lines. Every converter funnels its
//! extracted text through [`normalize`] so the rendered Markdown stays stable
//! regardless of how the page happened to lay things out.

/// Normalize raw extracted text.
///
/// - non-breaking spaces become ordinary spaces
/// - carriage returns are dropped
/// - trailing spaces/tabs before a line break are stripped
/// - runs of 3+ newlines collapse to exactly 2
/// - leading/trailing whitespace is trimmed
///
/// Total and idempotent: normalizing already-normalized text is a no-op.
pub fn normalize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| *c != '\r')
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect();

    let mut lines: Vec<&str> = Vec::new();
    let mut blanks = 0usize;
    for line in cleaned.split('\n') {
        let line = line.trim_end_matches([' ', '\t']);
        if line.is_empty() {
            blanks += 1;
            // at most one blank line between content
            if blanks >= 2 {
                continue;
            }
        } else {
            blanks = 0;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}
