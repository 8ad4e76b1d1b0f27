//! Clipboard copies offered by the toolbar's dropdown, plus the text shaping
//! used for prompt copies.

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::patterns::{
    RE_MD_BOLD_ASTERISK, RE_MD_BOLD_UNDERSCORE, RE_MD_CODE, RE_MD_FENCE, RE_MD_HEADING,
    RE_MD_ITALIC_ASTERISK, RE_MD_ITALIC_UNDERSCORE, RE_MD_LINK, RE_MD_LIST_MARKER,
};
use crate::store::SessionState;

/// System clipboard. Writes are fire-and-forget from the engine's side.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), HostError>;
}

/// Clipboard that keeps every write, newest last.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub writes: Vec<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), HostError> {
        self.writes.push(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyTarget {
    OriginalContent,
    EditedContent,
    TaskId,
    OperatorName,
    /// Prompt dialog's "Copy Markdown": the prompt as rendered.
    PromptMarkdown,
    /// Prompt dialog's "Copy Plaintext": markdown stripped, double spaced.
    PromptPlaintext,
}

/// Text a copy of `target` would place on the clipboard, if captured yet.
pub fn copy_text(state: &SessionState, target: CopyTarget) -> Option<String> {
    let value = match target {
        CopyTarget::OriginalContent => state.original_content.as_deref(),
        CopyTarget::EditedContent => state.edited_content.as_deref(),
        CopyTarget::TaskId => state.task_id.as_deref(),
        CopyTarget::OperatorName => state.operator_name.as_deref(),
        CopyTarget::PromptMarkdown | CopyTarget::PromptPlaintext => {
            state.prompt_content.as_deref()
        }
    };
    let value = value.filter(|v| !v.is_empty())?;

    match target {
        CopyTarget::PromptPlaintext => Some(double_space(&markdown_to_plain(value))),
        _ => Some(value.to_string()),
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Puts a blank line between every non-empty line.
pub fn double_space(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Strips markdown syntax, keeping the readable text.
pub fn markdown_to_plain(markdown: &str) -> String {
    let text = RE_MD_FENCE.replace_all(markdown, "");
    let text = RE_MD_HEADING.replace_all(&text, "");
    let text = RE_MD_LIST_MARKER.replace_all(&text, "$1");
    let text = RE_MD_LINK.replace_all(&text, "$1");
    let text = RE_MD_BOLD_ASTERISK.replace_all(&text, "$1");
    let text = RE_MD_BOLD_UNDERSCORE.replace_all(&text, "$1");
    let text = RE_MD_ITALIC_ASTERISK.replace_all(&text, "$1");
    let text = RE_MD_ITALIC_UNDERSCORE.replace_all(&text, "$1");
    let text = RE_MD_CODE.replace_all(&text, "$1");
    text.trim().to_string()
}
