//! Line-break normalization for LLM output.
//!
//! Models are asked to use line breaks instead of bullets; this pass re-emits
//! every `".\n"` sentence boundary and guarantees each resulting line ends with
//! exactly one `\n`.

const SENTENCE_BREAK: &str = ".\n";

/// Whether the final line break is kept on the formatted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingBreak {
    Keep,
    Trim,
}

/// Split on `".\n"`, restore the period on every segment but the last, and
/// terminate every segment (the last included) with a line break.
///
/// Periods that are not immediately followed by a newline are left inside
/// their segment untouched.
///
/// Not idempotent on text that already ends in `".\n"`: the empty tail segment
/// gets its own break, so each extra pass adds one empty line
/// (`"A.\nB.\n"` becomes `"A.\nB.\n\n"`).
pub fn format_line_breaks(text: &str, trailing: TrailingBreak) -> String {
    let segments: Vec<&str> = text.split(SENTENCE_BREAK).collect();
    let last = segments.len() - 1;

    let mut formatted = String::with_capacity(text.len() + 1);
    for (index, segment) in segments.iter().enumerate() {
        formatted.push_str(segment);
        if index < last {
            formatted.push('.');
        }
        formatted.push('\n');
    }

    if trailing == TrailingBreak::Trim {
        formatted.pop();
    }
    formatted
}
