//! Post-processing: deterministic cleanup of model-generated solutions.
//!
//! Even well-prompted models occasionally return artefacts that parse but
//! render badly:
//!
//! - Wrapping the whole answer in ` ```markdown ... ``` ` fences despite the
//!   prompt saying not to
//! - Windows-style `\r\n` line endings
//! - Zero-width characters copied from the assignment text
//! - Headings glued to the preceding paragraph
//! - A leading `# Solution` heading, which duplicates the header the
//!   assembler prints above every answer
//!
//! Each rule is a pure `&str → String` pass and is tested on its own.
//!
//! ## Rule Order
//!
//! Strip fences first so line-ending and heading rules see the real content;
//! the final-newline pass runs last. Whitespace rules leave the inside of
//! fenced code blocks alone and keep markdown hard line breaks (two trailing
//! spaces before a continuation line).

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to the raw model output.
///
/// Rules (applied in order):
/// 1. Strip outer ` ```markdown ` fences
/// 2. Normalise line endings (CRLF → LF)
/// 3. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 4. Trim trailing whitespace per line (outside code fences, hard breaks kept)
/// 5. Collapse 3+ consecutive blank lines down to 2 (outside code fences)
/// 6. Ensure heading lines have a blank line before them (outside code fences)
/// 7. Drop a leading "Solution"/"Answers" heading
/// 8. Ensure the text ends with exactly one newline
pub fn clean_solution(input: &str) -> String {
    let s = strip_markdown_fences(input);
    let s = normalise_line_endings(&s);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = normalise_heading_spacing(&s);
    let s = drop_echoed_header(&s);
    ensure_final_newline(&s)
}

// ── Rule 1: Strip outer markdown fences ──────────────────────────────────────

// Only `markdown`/`md` fences: a bare or language-tagged fence may be a
// genuine single code-block answer.
static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|md)[ \t]*\r?\n(.*?)\r?\n```\s*$").unwrap());

fn strip_markdown_fences(input: &str) -> String {
    match RE_OUTER_FENCES.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Fence tracking ───────────────────────────────────────────────────────────

fn is_fence(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("```") || t.starts_with("~~~")
}

/// Each line with whether it lies inside a fenced code block. Delimiter lines
/// count as outside; an unclosed fence runs to the end.
fn fence_states(input: &str) -> Vec<(&str, bool)> {
    let mut in_code = false;
    input
        .lines()
        .map(|line| {
            if is_fence(line) {
                in_code = !in_code;
                (line, false)
            } else {
                (line, in_code)
            }
        })
        .collect()
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

/// Two or more trailing spaces on a paragraph line followed by more paragraph
/// text is a hard line break; it is normalised to exactly two spaces.
fn trim_trailing_whitespace(input: &str) -> String {
    let lines = fence_states(input);
    lines
        .iter()
        .enumerate()
        .map(|(i, &(line, in_code))| {
            if in_code {
                return line.to_string();
            }
            let trimmed = line.trim_end();
            let spaces = line.len() - line.trim_end_matches(' ').len();
            let continues = lines.get(i + 1).is_some_and(|&(next, _)| {
                !next.trim().is_empty() && !is_fence(next) && !is_atx_heading(next)
            });
            let paragraph = !trimmed.is_empty() && !is_fence(line) && !is_atx_heading(line);
            if spaces >= 2 && paragraph && continues {
                format!("{trimmed}  ")
            } else {
                trimmed.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 5: Collapse excessive blank lines ───────────────────────────────────

fn collapse_blank_lines(input: &str) -> String {
    let mut kept = Vec::new();
    let mut blanks = 0;
    for (line, in_code) in fence_states(input) {
        if !in_code && line.trim().is_empty() {
            blanks += 1;
            if blanks > 2 {
                continue;
            }
        } else {
            blanks = 0;
        }
        kept.push(line);
    }
    kept.join("\n")
}

// ── Rule 6: Normalise heading spacing ────────────────────────────────────────

fn is_atx_heading(line: &str) -> bool {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    (1..=6).contains(&hashes)
        && line[hashes..]
            .chars()
            .next()
            .is_none_or(|c| c == ' ' || c == '\t')
}

/// Ensure a blank line before each heading, leaving `#` comments inside code
/// blocks untouched.
fn normalise_heading_spacing(input: &str) -> String {
    let mut result = String::with_capacity(input.len() + 64);
    let mut in_code = false;

    for (i, line) in input.lines().enumerate() {
        if is_fence(line) {
            in_code = !in_code;
        } else if !in_code && is_atx_heading(line) && i > 0 {
            let trimmed = result.trim_end_matches('\n');
            result.truncate(trimmed.len());
            result.push_str("\n\n");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}

// ── Rule 7: Drop an echoed section header ────────────────────────────────────

static RE_ECHOED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*#{1,6}[ \t]+(?:solutions?|answers?)[ \t]*:?[ \t]*(?:\n|$)").unwrap()
});

/// Only the very first line is checked; a "Solution" heading further down
/// belongs to the answer.
fn drop_echoed_header(input: &str) -> String {
    RE_ECHOED_HEADER.replace(input, "").into_owned()
}

// ── Rule 8: Ensure text ends with a single newline ───────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences() {
        let input = "```markdown\n# Hello\nWorld\n```";
        assert_eq!(strip_markdown_fences(input), "# Hello\nWorld");
    }

    #[test]
    fn test_strip_md_fences_with_crlf() {
        let input = "```md\r\n## Q1\r\nAnswer\r\n```\r\n";
        assert_eq!(strip_markdown_fences(input), "## Q1\r\nAnswer");
    }

    #[test]
    fn test_code_only_answer_is_kept() {
        let input = "```python\nprint('hi')\n```";
        assert_eq!(strip_markdown_fences(input), input);
    }

    #[test]
    fn test_no_fences_passthrough() {
        let input = "# Hello\nWorld";
        assert_eq!(strip_markdown_fences(input), "# Hello\nWorld");
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(
            trim_trailing_whitespace("  hello \t\nworld  "),
            "  hello\nworld"
        );
    }

    #[test]
    fn test_hard_line_break_is_kept() {
        assert_eq!(
            trim_trailing_whitespace("Line one   \nLine two  \n\nNext  "),
            "Line one  \nLine two\n\nNext"
        );
    }

    #[test]
    fn test_hard_break_before_heading_is_trimmed() {
        assert_eq!(trim_trailing_whitespace("text  \n## Q2"), "text\n## Q2");
        assert_eq!(trim_trailing_whitespace("## Q1  \nbody"), "## Q1\nbody");
    }

    #[test]
    fn test_code_block_whitespace_is_kept() {
        let input = "```text\ncol1  \t\n   \n```  \nafter  ";
        assert_eq!(
            trim_trailing_whitespace(input),
            "```text\ncol1  \t\n   \n```\nafter"
        );
    }

    #[test]
    fn test_collapse_blank_lines() {
        let input = "a\n\n\n\n\n\nb";
        assert_eq!(collapse_blank_lines(input), "a\n\n\nb");
    }

    #[test]
    fn test_collapse_skips_code_blocks() {
        let input = "```\nx\n\n\n\n\ny\n```\n\n\n\n\nz";
        assert_eq!(
            collapse_blank_lines(input),
            "```\nx\n\n\n\n\ny\n```\n\n\nz"
        );
    }

    #[test]
    fn test_ensure_final_newline() {
        assert_eq!(ensure_final_newline("hello"), "hello\n");
        assert_eq!(ensure_final_newline("hello\n\n\n"), "hello\n");
        assert_eq!(ensure_final_newline(""), "\n");
    }

    #[test]
    fn test_heading_spacing() {
        let input = "some text\n# Heading\nmore text";
        let result = normalise_heading_spacing(input);
        assert!(result.contains("text\n\n# Heading\n"));
    }

    #[test]
    fn test_heading_spacing_skips_code_comments() {
        let input = "```python\nx = 1\n# not a heading\n```";
        let result = normalise_heading_spacing(input);
        assert_eq!(result, format!("{input}\n"));
    }

    #[test]
    fn test_hashtag_is_not_a_heading() {
        assert!(!is_atx_heading("#hashtag"));
        assert!(!is_atx_heading("####### seven"));
        assert!(is_atx_heading("### Part (b)"));
        assert!(is_atx_heading("#"));
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{00AD}bar";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobar");
    }

    #[test]
    fn test_drop_echoed_header() {
        assert_eq!(drop_echoed_header("# Solution\n\n## Q1\n"), "\n## Q1\n");
        assert_eq!(drop_echoed_header("## answers:\nA"), "A");
        assert_eq!(drop_echoed_header("# Solution"), "");
    }

    #[test]
    fn test_later_solution_heading_is_kept() {
        let input = "## Q1\nx\n\n## Solution\ny";
        assert_eq!(drop_echoed_header(input), input);
        assert_eq!(drop_echoed_header("# Solution to Q1\n"), "# Solution to Q1\n");
    }

    #[test]
    fn test_clean_solution_full_pipeline() {
        let input = "```markdown\r\n## Question 1\r\nA stack is LIFO.   \r\n\r\n\r\n\r\n\r\n## Question 2\r\n```";
        let result = clean_solution(input);
        assert_eq!(
            result,
            "## Question 1\nA stack is LIFO.\n\n## Question 2\n"
        );
    }

    #[test]
    fn test_clean_solution_keeps_code_and_breaks() {
        let input = "Roses are red  \nViolets are blue\n\n```python\ndef f():  \n\n\n\n\n    return 1\n```\n";
        assert_eq!(clean_solution(input), input);
    }

    #[test]
    fn test_clean_solution_is_idempotent() {
        let once = clean_solution("Intro\n## Q1\n\u{200B}Answer\n\n\n\n\n");
        assert_eq!(clean_solution(&once), once);
    }
}
