//! Markup translation for LLM answers
//!
//! Covers exactly four rules, in this order:
//!
//! 1. newline → `<br>`
//! 2. `**text**` → `<strong>text</strong>` (non-greedy, at least one character)
//! 3. a line starting with `### heading` → `<strong>heading</strong>` followed by
//!    the line's `<br>`
//! 4. any `**` left without a partner is removed
//!
//! Bold pairs are matched over the whole answer, so a pair may span a line
//! break. Headings are then recognised per line on the bolded text.
//! Nothing else (lists, links, code, escaping) is touched.

use crate::types::FormattedAnswer;

const LINE_BREAK: &str = "<br>";
const STRONG_OPEN: &str = "<strong>";
const STRONG_CLOSE: &str = "</strong>";
const BOLD: &str = "**";
const HEADING: &str = "### ";

/// Converts raw LLM output into the chatbot's HTML markup
pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Apply the four markup rules to `raw`
    pub fn format(raw: &str) -> FormattedAnswer {
        // tags never contain a newline, so line boundaries survive bolding
        let mut bolded = String::with_capacity(raw.len() + raw.len() / 4);
        push_bold(&mut bolded, raw);

        let mut out = String::with_capacity(bolded.len() + bolded.len() / 4);
        let mut lines = bolded.split('\n').peekable();

        while let Some(line) = lines.next() {
            match heading_text(line) {
                Some(heading) => {
                    out.push_str(STRONG_OPEN);
                    out.push_str(heading);
                    out.push_str(STRONG_CLOSE);
                }
                None => out.push_str(line),
            }

            if lines.peek().is_some() {
                out.push_str(LINE_BREAK);
            }
        }

        FormattedAnswer::new(out)
    }
}

/// Heading text of a `### ` line, if it has any
fn heading_text(line: &str) -> Option<&str> {
    line.strip_prefix(HEADING).filter(|text| !text.is_empty())
}

/// Bold pairs over `text`; unmatched delimiters are dropped
fn push_bold(out: &mut String, text: &str) {
    let mut rest = text;

    while let Some(start) = rest.find(BOLD) {
        out.push_str(&rest[..start]);
        let after = &rest[start + BOLD.len()..];

        // the closing pair may only start after the first content character
        let close = after
            .chars()
            .next()
            .map(char::len_utf8)
            .and_then(|first| after[first..].find(BOLD).map(|pos| first + pos));

        match close {
            Some(end) => {
                out.push_str(STRONG_OPEN);
                out.push_str(&after[..end]);
                out.push_str(STRONG_CLOSE);
                rest = &after[end + BOLD.len()..];
            }
            None => rest = after,
        }
    }

    out.push_str(rest);
}
