//! Shared vocabulary between the engine, host documents and UI consumers.

use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Locator Targets
// ═══════════════════════════════════════════════════════════════════════════════

/// Host-page elements the engine knows how to locate.
///
/// Each variant corresponds to one element locator on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Only rendered while a conversation is open; drives the lifecycle.
    SnoozeButton,
    SubmitButton,
    WindowCloseButton,
    EditButton,
    SaveButton,
    OriginalTab,
    EditedTab,
    OriginalTabContent,
    /// Edited response body. Its text starts with a decorative index digit.
    ResponseContent,
    MetadataSection,
    TabContainer,
    TaskId,
    OperatorName,
    /// "Close" button of the task prompt dialog; anchors the prompt controls.
    PromptCloseButton,
    /// Rendered task prompt inside the dialog.
    PromptContent,
}

impl Target {
    pub const ALL: [Target; 15] = [
        Target::SnoozeButton,
        Target::SubmitButton,
        Target::WindowCloseButton,
        Target::EditButton,
        Target::SaveButton,
        Target::OriginalTab,
        Target::EditedTab,
        Target::OriginalTabContent,
        Target::ResponseContent,
        Target::MetadataSection,
        Target::TabContainer,
        Target::TaskId,
        Target::OperatorName,
        Target::PromptCloseButton,
        Target::PromptContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::SnoozeButton => "snooze_button",
            Target::SubmitButton => "submit_button",
            Target::WindowCloseButton => "window_close_button",
            Target::EditButton => "edit_button",
            Target::SaveButton => "save_button",
            Target::OriginalTab => "original_tab",
            Target::EditedTab => "edited_tab",
            Target::OriginalTabContent => "original_tab_content",
            Target::ResponseContent => "response_content",
            Target::MetadataSection => "metadata_section",
            Target::TabContainer => "tab_container",
            Target::TaskId => "task_id",
            Target::OperatorName => "operator_name",
            Target::PromptCloseButton => "prompt_close_button",
            Target::PromptContent => "prompt_content",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Mode Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Which response tab the reviewer is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Original,
    Edited,
}

/// Layout used when the diff overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLayout {
    SideBySide,
    Unified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffViewState {
    #[default]
    Closed,
    SideBySide,
    Unified,
}

impl DiffViewState {
    pub fn is_open(&self) -> bool {
        !matches!(self, DiffViewState::Closed)
    }

    /// Closes an open view, or opens a closed one with `layout`.
    pub fn toggled(self, layout: DiffLayout) -> Self {
        if self.is_open() {
            return DiffViewState::Closed;
        }
        match layout {
            DiffLayout::SideBySide => DiffViewState::SideBySide,
            DiffLayout::Unified => DiffViewState::Unified,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Behaviors
// ═══════════════════════════════════════════════════════════════════════════════

/// Behavior bound to a host element's click.
///
/// Hosts store the action next to the element and hand it back to
/// [`crate::ReviewEngine::handle_click`] when the user clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    SubmitConversation,
    CloseWindow,
    OpenEditor,
    SaveEdit,
    SelectTab(Tab),
}

/// "Something in the document may have changed."
///
/// Carries no payload: reconcilers re-query the live document instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// Delivered by the host's mutation stream.
    #[default]
    Mutation,
    /// Host-driven re-scan for insertions the mutation stream never reports.
    Poll,
}
