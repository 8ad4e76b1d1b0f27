//! In-memory host document.
//!
//! Models the parts of the host page the engine cares about: at most one live
//! instance per [`Target`], click listeners keyed by instance, and counters for
//! the UI insertions. Page-level edits can be rejected once on demand. Remounting a target creates a new instance whose
//! listeners start empty, the same way the host's re-renders behave.
//!
//! Used by the replay CLI and by tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::document::HostDocument;
use crate::error::HostError;
use crate::types::{ClickAction, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryElement {
    pub id: ElementId,
    pub target: Target,
}

/// Page-level edits that do not go through a located element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOperation {
    InsertToolbar,
    RemoveDiffOverlay,
}

impl PageOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageOperation::InsertToolbar => "insert_toolbar",
            PageOperation::RemoveDiffOverlay => "remove_diff_overlay",
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    id: ElementId,
    text: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryDocument {
    next_id: u64,
    nodes: BTreeMap<Target, Node>,
    listeners: Vec<(ElementId, ClickAction)>,
    faults: BTreeMap<Target, String>,
    rejections: BTreeMap<PageOperation, String>,
    removed: Vec<ElementId>,
    prompt_controls: Vec<(ElementId, usize)>,
    toolbar_insertions: usize,
    diff_toggle_insertions: usize,
    diff_overlay_removals: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts a fresh instance of `target`, replacing any live one.
    pub fn mount(&mut self, target: Target, text: Option<&str>) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.nodes.insert(
            target,
            Node {
                id,
                text: text.map(str::to_string),
            },
        );
        id
    }

    pub fn unmount(&mut self, target: Target) -> bool {
        self.nodes.remove(&target).is_some()
    }

    /// Changes the text of the live instance without remounting it.
    pub fn set_text(&mut self, target: Target, text: Option<&str>) -> bool {
        match self.nodes.get_mut(&target) {
            Some(node) => {
                node.text = text.map(str::to_string);
                true
            }
            None => false,
        }
    }

    /// Makes every query for `target` fail until [`MemoryDocument::clear_fault`].
    pub fn inject_fault(&mut self, target: Target, details: &str) {
        self.faults.insert(target, details.to_string());
    }

    pub fn clear_fault(&mut self, target: Target) -> bool {
        self.faults.remove(&target).is_some()
    }

    /// Makes the next call of `operation` fail with [`HostError::Rejected`].
    pub fn reject_next(&mut self, operation: PageOperation, details: &str) {
        self.rejections.insert(operation, details.to_string());
    }

    pub fn is_present(&self, target: Target) -> bool {
        self.nodes.contains_key(&target)
    }

    pub fn element_id(&self, target: Target) -> Option<ElementId> {
        self.nodes.get(&target).map(|node| node.id)
    }

    pub fn listeners_on(&self, id: ElementId) -> Vec<ClickAction> {
        self.listeners
            .iter()
            .filter(|(element, _)| *element == id)
            .map(|(_, action)| *action)
            .collect()
    }

    /// Listeners registered on the live instance of `target`.
    pub fn listener_count(&self, target: Target) -> usize {
        self.element_id(target)
            .map(|id| self.listeners_on(id).len())
            .unwrap_or(0)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Actions a user click on `target` would fire, in registration order.
    pub fn click(&self, target: Target) -> Vec<ClickAction> {
        self.element_id(target)
            .map(|id| self.listeners_on(id))
            .unwrap_or_default()
    }

    pub fn removed_elements(&self) -> &[ElementId] {
        &self.removed
    }

    pub fn toolbar_insertions(&self) -> usize {
        self.toolbar_insertions
    }

    pub fn diff_toggle_insertions(&self) -> usize {
        self.diff_toggle_insertions
    }

    pub fn diff_overlay_removals(&self) -> usize {
        self.diff_overlay_removals
    }

    /// Close-button instance and word count of every prompt control insertion.
    pub fn prompt_controls(&self) -> &[(ElementId, usize)] {
        &self.prompt_controls
    }

    fn take_rejection(&mut self, operation: PageOperation) -> Result<(), HostError> {
        match self.rejections.remove(&operation) {
            Some(details) => Err(HostError::Rejected {
                operation: operation.as_str(),
                details,
            }),
            None => Ok(()),
        }
    }

    fn ensure_live(&self, element: &MemoryElement) -> Result<(), HostError> {
        match self.nodes.get(&element.target) {
            Some(node) if node.id == element.id => Ok(()),
            _ => Err(HostError::Detached {
                target: element.target,
            }),
        }
    }
}

impl HostDocument for MemoryDocument {
    type Element = MemoryElement;

    fn query(&self, target: Target) -> Result<Option<MemoryElement>, HostError> {
        if let Some(details) = self.faults.get(&target) {
            return Err(HostError::MalformedElement {
                target,
                details: details.clone(),
            });
        }
        Ok(self
            .nodes
            .get(&target)
            .map(|node| MemoryElement { id: node.id, target }))
    }

    fn text_content(&self, element: &MemoryElement) -> Result<Option<String>, HostError> {
        self.ensure_live(element)?;
        Ok(self
            .nodes
            .get(&element.target)
            .and_then(|node| node.text.clone()))
    }

    fn add_click_listener(
        &mut self,
        element: &MemoryElement,
        action: ClickAction,
    ) -> Result<(), HostError> {
        self.ensure_live(element)?;
        self.listeners.push((element.id, action));
        Ok(())
    }

    fn remove_element(&mut self, element: &MemoryElement) -> Result<(), HostError> {
        self.ensure_live(element)?;
        self.nodes.remove(&element.target);
        self.removed.push(element.id);
        Ok(())
    }

    fn append_diff_toggles(&mut self, container: &MemoryElement) -> Result<(), HostError> {
        self.ensure_live(container)?;
        self.diff_toggle_insertions += 1;
        Ok(())
    }

    fn insert_toolbar(&mut self) -> Result<(), HostError> {
        self.take_rejection(PageOperation::InsertToolbar)?;
        self.toolbar_insertions += 1;
        Ok(())
    }

    fn remove_diff_overlay(&mut self) -> Result<(), HostError> {
        self.take_rejection(PageOperation::RemoveDiffOverlay)?;
        self.diff_overlay_removals += 1;
        Ok(())
    }

    fn insert_prompt_controls(
        &mut self,
        close_button: &MemoryElement,
        word_count: usize,
    ) -> Result<(), HostError> {
        self.ensure_live(close_button)?;
        self.prompt_controls.push((close_button.id, word_count));
        Ok(())
    }
}
