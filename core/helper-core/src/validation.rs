//! Naive response heuristics shown to the reviewer before submitting.
//!
//! These are advisory: false positives are expected (a response that really
//! contains a closing HTML tag, say) and the reviewer decides what to do.

use tracing::{debug, warn};

use crate::config::ValidationConfig;
use crate::patterns::{RE_CLOSING_HTML_TAG, RE_CONSTANT_NAME};

const FENCE: &str = "```";

/// QA verdict signals read from the feedback section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentFacts {
    /// `None`, `0` or `-1` means the score was not rendered.
    pub score: Option<i32>,
    pub marked_for_rework: bool,
}

/// Everything the heuristics need about one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseFacts {
    pub code: Option<String>,
    pub unclosed_fence: bool,
    pub is_python: bool,
    pub alignment: AlignmentFacts,
}

impl ResponseFacts {
    /// Facts for already-extracted code (e.g. captured edited content).
    pub fn from_code(code: &str, is_python: bool, alignment: AlignmentFacts) -> Self {
        Self {
            code: Some(code.to_string()),
            unclosed_fence: false,
            is_python,
            alignment,
        }
    }

    /// Facts for a raw markdown response; the code is pulled out of its fence.
    pub fn from_markdown(response: &str, is_python: bool, alignment: AlignmentFacts) -> Self {
        Self {
            code: extract_code(response),
            unclosed_fence: response.matches(FENCE).count() % 2 == 1,
            is_python,
            alignment,
        }
    }
}

/// Returns the text between the first fence line and the last fence.
///
/// A response with a single fence yields everything after it. No fence at all
/// yields `None`.
pub fn extract_code(response: &str) -> Option<String> {
    let open = response.find(FENCE)?;
    let after_open = &response[open + FENCE.len()..];
    let body_start = after_open.find('\n').map(|idx| idx + 1).unwrap_or(after_open.len());
    let body = &after_open[body_start..];

    let code = match body.rfind(FENCE) {
        Some(close) => &body[..close],
        None => body,
    };
    Some(code.trim_end_matches('\n').to_string())
}

/// Python detection from the task's "Programming Language: X" field or any
/// button label mentioning Python.
pub fn detect_python(language_field: Option<&str>, button_labels: &[&str]) -> bool {
    let from_field = language_field
        .and_then(|field| field.split(':').nth(1))
        .map(|value| value.trim() == "Python")
        .unwrap_or(false);

    from_field || button_labels.iter().any(|label| label.contains("Python"))
}

fn truncate_line(line: &str, max_chars: usize) -> String {
    if line.chars().count() > max_chars {
        let head: String = line.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}

/// Flags long lines, unexpected top-level statements and inline comments.
pub fn validate_python(code: &str, config: &ValidationConfig, messages: &mut Vec<String>) {
    for line in code.split('\n') {
        if line.trim().is_empty() {
            continue;
        }

        let first_token = line.split(' ').next().unwrap_or_default();
        let is_constant = RE_CONSTANT_NAME.is_match(first_token);
        let is_function_or_class = line.starts_with("def ")
            || line.starts_with("class ")
            || line.starts_with('@')
            || line.starts_with("async def ");
        let is_import = line.starts_with("import ") || line.starts_with("from ");
        let is_indented = line.starts_with("    ");
        let is_commented = line.starts_with('#');
        let shortened = truncate_line(line, config.truncate_length);

        if line.chars().count() > config.max_line_length {
            warn!(line = %shortened, "Suspiciously long line");
            messages.push(format!(
                "A line in the bot response is suspiciously long: {shortened}"
            ));
        }

        if !is_constant
            && !is_import
            && !is_function_or_class
            && !is_indented
            && !is_commented
            && !line.starts_with(") ->")
        {
            warn!(line = %shortened, "Unexpected non-indented line");
            messages.push(format!(
                "[PYTHON] The bot response contains a non-indented line that doesn't appear to be an import, class definition, comment, or function definition: {shortened}"
            ));
        }

        if line.contains('#') && !line.trim().starts_with('#') {
            let suspected = line.split('#').nth(1).unwrap_or_default().trim();
            warn!(line = %shortened, "Possible inline comment");
            messages.push(format!(
                "[PYTHON] The bot response may contain an inline comment: {suspected}"
            ));
        }
    }
}

/// A closing tag usually means the response was cut mid-render.
pub fn check_for_html_in_code(code: &str, messages: &mut Vec<String>) {
    if RE_CLOSING_HTML_TAG.is_match(code) {
        warn!("Closing HTML tag found in bot response");
        messages.push("The bot response appears to contain HTML.".to_string());
    }
}

pub fn check_alignment_score(threshold: i32, facts: AlignmentFacts, messages: &mut Vec<String>) {
    let score = match facts.score {
        Some(score) if score != -1 && score != 0 => score,
        _ => {
            warn!("Alignment score not found");
            return;
        }
    };

    debug!(
        score,
        send_to_rework = facts.marked_for_rework,
        "Checking alignment score"
    );
    if score < threshold && !facts.marked_for_rework {
        messages.push(format!(
            "The alignment score is {score}, but the conversation is not marked as a rework."
        ));
    }
}

/// Runs every heuristic and returns the findings in display order.
pub fn response_status_messages(facts: &ResponseFacts, config: &ValidationConfig) -> Vec<String> {
    let mut messages = Vec::new();

    check_alignment_score(config.alignment_threshold, facts.alignment, &mut messages);

    let code = match facts.code.as_deref() {
        Some(code) if !code.trim().is_empty() => code,
        _ => {
            warn!("Cannot find bot response code");
            messages.push(
                "The code cannot be found in the response. Is it in a markdown block?"
                    .to_string(),
            );
            return messages;
        }
    };

    if facts.unclosed_fence || code.contains(FENCE) {
        warn!("Code block is not properly closed");
        messages.push(
            "The code does not appear to be in a properly-closed markdown code block.".to_string(),
        );
    }

    check_for_html_in_code(code, &mut messages);

    if code.split('\n').count() <= config.min_line_count {
        warn!("Bot response has suspiciously few lines");
        messages.push("The bot response has suspiciously few lines.".to_string());
    }

    if facts.is_python {
        debug!("Code appears to be Python");
        validate_python(code, config, &mut messages);
    }

    messages
}

/// Numbers messages for display: `"1. first\n"`, `"2. second\n"`, ...
pub fn format_messages(messages: &[String]) -> Vec<String> {
    messages
        .iter()
        .enumerate()
        .map(|(idx, message)| format!("{}. {}\n", idx + 1, message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN_PYTHON: &str = "import os\n\nMAX = 3\n\ndef f(x):\n    return x\n\nclass A:\n    pass";

    fn python_facts(code: &str) -> ResponseFacts {
        ResponseFacts::from_code(code, true, AlignmentFacts::default())
    }

    #[test]
    fn clean_python_has_no_findings() {
        let messages =
            response_status_messages(&python_facts(CLEAN_PYTHON), &ValidationConfig::default());
        assert!(messages.is_empty(), "unexpected: {messages:?}");
    }

    #[test]
    fn missing_code_short_circuits() {
        let facts = ResponseFacts::default();
        let messages = response_status_messages(&facts, &ValidationConfig::default());
        assert_eq!(
            messages,
            vec!["The code cannot be found in the response. Is it in a markdown block?"]
        );
    }

    #[test]
    fn flags_top_level_statement_and_inline_comment() {
        let mut messages = Vec::new();
        validate_python(
            "def f():\n    return 1  # one\nprint(f())",
            &ValidationConfig::default(),
            &mut messages,
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            "[PYTHON] The bot response may contain an inline comment: one"
        );
        assert!(messages[1].starts_with("[PYTHON] The bot response contains a non-indented line"));
        assert!(messages[1].ends_with("print(f())"));
    }

    #[test]
    fn long_lines_are_truncated_in_messages() {
        let config = ValidationConfig {
            max_line_length: 10,
            truncate_length: 4,
            ..ValidationConfig::default()
        };
        let mut messages = Vec::new();
        validate_python("    value = 1234567890", &config, &mut messages);
        assert_eq!(
            messages,
            vec!["A line in the bot response is suspiciously long:     ..."]
        );
    }

    #[test]
    fn multiline_signature_tail_is_allowed() {
        let mut messages = Vec::new();
        validate_python(
            "def f(\n    x: int,\n) -> int:\n    return x",
            &ValidationConfig::default(),
            &mut messages,
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn html_and_few_lines_are_flagged() {
        let facts = ResponseFacts::from_code("x = 1</div>", false, AlignmentFacts::default());
        let messages = response_status_messages(&facts, &ValidationConfig::default());
        assert_eq!(
            messages,
            vec![
                "The bot response appears to contain HTML.",
                "The bot response has suspiciously few lines.",
            ]
        );
    }

    #[test]
    fn alignment_below_threshold_without_rework() {
        let mut messages = Vec::new();
        check_alignment_score(
            85,
            AlignmentFacts {
                score: Some(70),
                marked_for_rework: false,
            },
            &mut messages,
        );
        assert_eq!(
            messages,
            vec!["The alignment score is 70, but the conversation is not marked as a rework."]
        );

        let mut messages = Vec::new();
        check_alignment_score(
            85,
            AlignmentFacts {
                score: Some(70),
                marked_for_rework: true,
            },
            &mut messages,
        );
        check_alignment_score(
            85,
            AlignmentFacts {
                score: Some(-1),
                marked_for_rework: false,
            },
            &mut messages,
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn zero_alignment_score_counts_as_missing() {
        let mut messages = Vec::new();
        check_alignment_score(
            85,
            AlignmentFacts {
                score: Some(0),
                marked_for_rework: false,
            },
            &mut messages,
        );
        assert!(messages.is_empty(), "unexpected: {messages:?}");
    }

    #[test]
    fn extract_code_takes_fenced_body() {
        let response = "Here you go:\n```python\ndef f():\n    pass\n```\nDone.";
        assert_eq!(
            extract_code(response).as_deref(),
            Some("def f():\n    pass")
        );
        assert_eq!(extract_code("no code"), None);
    }

    #[test]
    fn unbalanced_fence_is_reported() {
        let response = "```python\ndef f():\n    a = 1\n    b = 2\n    return a + b\n";
        let facts = ResponseFacts::from_markdown(response, false, AlignmentFacts::default());
        assert!(facts.unclosed_fence);
        let messages = response_status_messages(&facts, &ValidationConfig::default());
        assert_eq!(
            messages,
            vec!["The code does not appear to be in a properly-closed markdown code block."]
        );
    }

    #[test]
    fn detects_python_from_field_or_buttons() {
        assert!(detect_python(Some("Programming Language: Python"), &[]));
        assert!(!detect_python(Some("Programming Language: Rust"), &[]));
        assert!(detect_python(None, &["Run Python tests"]));
    }

    #[test]
    fn formats_numbered_messages() {
        let formatted = format_messages(&["a".to_string(), "b".to_string()]);
        assert_eq!(formatted, vec!["1. a\n", "2. b\n"]);
    }
}
