//! The host document as seen by the engine.
//!
//! Implementors wrap the real page (or a fake one). The engine never holds on
//! to element handles across notifications; every reconciler re-queries.

use std::fmt::Debug;

use crate::error::HostError;
use crate::types::{ClickAction, Target};

/// Locators plus the handful of DOM edits the engine performs.
///
/// Implementors should:
/// - Return `Ok(None)` from [`HostDocument::query`] when an element is absent
///   (this is the normal state of a half-rendered page, not an error)
/// - Keep `query` and `text_content` free of side effects
/// - Reserve `Err` for genuinely unexpected page shapes
pub trait HostDocument {
    /// Handle to a live element instance.
    type Element: Clone + Debug;

    fn query(&self, target: Target) -> Result<Option<Self::Element>, HostError>;

    fn text_content(&self, element: &Self::Element) -> Result<Option<String>, HostError>;

    /// Registers `action` to run when the element is clicked.
    fn add_click_listener(
        &mut self,
        element: &Self::Element,
        action: ClickAction,
    ) -> Result<(), HostError>;

    fn remove_element(&mut self, element: &Self::Element) -> Result<(), HostError>;

    fn append_diff_toggles(&mut self, container: &Self::Element) -> Result<(), HostError>;

    fn insert_toolbar(&mut self) -> Result<(), HostError>;

    fn remove_diff_overlay(&mut self) -> Result<(), HostError>;

    /// Inserts the word count and the two prompt copy buttons after the
    /// prompt dialog's close button.
    fn insert_prompt_controls(
        &mut self,
        close_button: &Self::Element,
        word_count: usize,
    ) -> Result<(), HostError>;

    /// Convenience: locate `target` and read its text, treating empty text as
    /// absent.
    fn query_text(&self, target: Target) -> Result<Option<String>, HostError> {
        let Some(element) = self.query(target)? else {
            return Ok(None);
        };
        Ok(self
            .text_content(&element)?
            .filter(|text| !text.is_empty()))
    }
}
