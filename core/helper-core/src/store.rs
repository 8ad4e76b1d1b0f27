//! Session store: what the engine has already observed and done to the host
//! page since the current conversation opened.
//!
//! # Scopes
//!
//! Fields fall into three reset scopes:
//!
//! - **Lifecycle**: `conversation_open`, the submit/close/edit button listener
//!   flags. Cleared only by a full [`SessionStore::reset`].
//! - **Edit session**: save button and tab listener flags, `metadata_removed`,
//!   `diff_toggles_inserted`. Also cleared by [`StatePatch::edit_session_reset`]
//!   whenever the response editor is re-entered.
//! - **Content**: captured original/edited content and task metadata. Once set,
//!   only a full reset clears them.
//! - **Prompt dialog**: `prompt_controls_inserted`, `prompt_content`. Cleared
//!   when the dialog closes, and by a full reset.
//!
//! # Contract
//!
//! `set` shallow-merges a [`StatePatch`]; `reset` returns to the default state.
//! Neither validates values. Every write bumps [`SessionStore::revision`] and
//! synchronously notifies subscribers, with no batching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{DiffViewState, Tab};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub conversation_open: bool,
    pub conversation_opened_at: Option<DateTime<Utc>>,
    pub submit_button_has_listener: bool,
    pub close_button_has_listener: bool,
    pub edit_button_has_listener: bool,
    pub save_button_has_listener: bool,
    pub original_tab_has_listener: bool,
    pub edited_tab_has_listener: bool,
    pub metadata_removed: bool,
    pub diff_toggles_inserted: bool,
    pub original_content: Option<String>,
    pub edited_content: Option<String>,
    pub task_id: Option<String>,
    pub operator_name: Option<String>,
    pub current_tab: Tab,
    pub diff_view: DiffViewState,
    pub prompt_controls_inserted: bool,
    pub prompt_content: Option<String>,
}

impl SessionState {
    pub fn listener_attached(&self, flag: ListenerFlag) -> bool {
        match flag {
            ListenerFlag::SubmitButton => self.submit_button_has_listener,
            ListenerFlag::CloseButton => self.close_button_has_listener,
            ListenerFlag::EditButton => self.edit_button_has_listener,
            ListenerFlag::SaveButton => self.save_button_has_listener,
            ListenerFlag::OriginalTab => self.original_tab_has_listener,
            ListenerFlag::EditedTab => self.edited_tab_has_listener,
        }
    }

    pub fn has_original_content(&self) -> bool {
        is_captured(&self.original_content)
    }

    pub fn has_edited_content(&self) -> bool {
        is_captured(&self.edited_content)
    }

    pub fn has_prompt_content(&self) -> bool {
        is_captured(&self.prompt_content)
    }
}

fn is_captured(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.is_empty()).unwrap_or(false)
}

/// Listener flags, one per host element that gets a click behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerFlag {
    SubmitButton,
    CloseButton,
    EditButton,
    SaveButton,
    OriginalTab,
    EditedTab,
}

/// Partial update merged into the state by [`SessionStore::set`].
///
/// `None` leaves a field untouched. Optional fields take `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub conversation_open: Option<bool>,
    pub conversation_opened_at: Option<Option<DateTime<Utc>>>,
    pub submit_button_has_listener: Option<bool>,
    pub close_button_has_listener: Option<bool>,
    pub edit_button_has_listener: Option<bool>,
    pub save_button_has_listener: Option<bool>,
    pub original_tab_has_listener: Option<bool>,
    pub edited_tab_has_listener: Option<bool>,
    pub metadata_removed: Option<bool>,
    pub diff_toggles_inserted: Option<bool>,
    pub original_content: Option<Option<String>>,
    pub edited_content: Option<Option<String>>,
    pub task_id: Option<Option<String>>,
    pub operator_name: Option<Option<String>>,
    pub current_tab: Option<Tab>,
    pub diff_view: Option<DiffViewState>,
    pub prompt_controls_inserted: Option<bool>,
    pub prompt_content: Option<Option<String>>,
}

impl StatePatch {
    pub fn listener(flag: ListenerFlag, attached: bool) -> Self {
        let mut patch = StatePatch::default();
        let slot = match flag {
            ListenerFlag::SubmitButton => &mut patch.submit_button_has_listener,
            ListenerFlag::CloseButton => &mut patch.close_button_has_listener,
            ListenerFlag::EditButton => &mut patch.edit_button_has_listener,
            ListenerFlag::SaveButton => &mut patch.save_button_has_listener,
            ListenerFlag::OriginalTab => &mut patch.original_tab_has_listener,
            ListenerFlag::EditedTab => &mut patch.edited_tab_has_listener,
        };
        *slot = Some(attached);
        patch
    }

    /// Clears the edit-session scope. The editor mounts a fresh subtree whose
    /// elements need new listeners; lifecycle and content stay as they are.
    pub fn edit_session_reset() -> Self {
        StatePatch {
            diff_toggles_inserted: Some(false),
            edited_tab_has_listener: Some(false),
            metadata_removed: Some(false),
            original_tab_has_listener: Some(false),
            save_button_has_listener: Some(false),
            ..StatePatch::default()
        }
    }

    fn apply(self, state: &mut SessionState) {
        fn merge<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        merge(&mut state.conversation_open, self.conversation_open);
        merge(&mut state.conversation_opened_at, self.conversation_opened_at);
        merge(
            &mut state.submit_button_has_listener,
            self.submit_button_has_listener,
        );
        merge(
            &mut state.close_button_has_listener,
            self.close_button_has_listener,
        );
        merge(
            &mut state.edit_button_has_listener,
            self.edit_button_has_listener,
        );
        merge(
            &mut state.save_button_has_listener,
            self.save_button_has_listener,
        );
        merge(
            &mut state.original_tab_has_listener,
            self.original_tab_has_listener,
        );
        merge(
            &mut state.edited_tab_has_listener,
            self.edited_tab_has_listener,
        );
        merge(&mut state.metadata_removed, self.metadata_removed);
        merge(&mut state.diff_toggles_inserted, self.diff_toggles_inserted);
        merge(&mut state.original_content, self.original_content);
        merge(&mut state.edited_content, self.edited_content);
        merge(&mut state.task_id, self.task_id);
        merge(&mut state.operator_name, self.operator_name);
        merge(&mut state.current_tab, self.current_tab);
        merge(&mut state.diff_view, self.diff_view);
        merge(
            &mut state.prompt_controls_inserted,
            self.prompt_controls_inserted,
        );
        merge(&mut state.prompt_content, self.prompt_content);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&SessionState)>;

/// Observable container for [`SessionState`].
///
/// Owned by the engine and lent to reconcilers; there is no ambient instance.
#[derive(Default)]
pub struct SessionStore {
    state: SessionState,
    revision: u64,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &SessionState {
        &self.state
    }

    pub fn set(&mut self, patch: StatePatch) {
        patch.apply(&mut self.state);
        self.commit();
    }

    pub fn reset(&mut self) {
        self.state = SessionState::default();
        self.commit();
    }

    /// Number of writes (`set` or `reset`) since the store was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&SessionState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    fn commit(&mut self) {
        self.revision += 1;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn populated() -> SessionStore {
        let mut store = SessionStore::new();
        store.set(StatePatch {
            conversation_open: Some(true),
            submit_button_has_listener: Some(true),
            edit_button_has_listener: Some(true),
            save_button_has_listener: Some(true),
            original_tab_has_listener: Some(true),
            edited_tab_has_listener: Some(true),
            metadata_removed: Some(true),
            diff_toggles_inserted: Some(true),
            original_content: Some(Some("print(1)".to_string())),
            edited_content: Some(Some("print(2)".to_string())),
            current_tab: Some(Tab::Edited),
            diff_view: Some(DiffViewState::Unified),
            ..StatePatch::default()
        });
        store
    }

    #[test]
    fn set_merges_only_provided_fields() {
        let mut store = SessionStore::new();
        store.set(StatePatch {
            conversation_open: Some(true),
            ..StatePatch::default()
        });
        store.set(StatePatch {
            metadata_removed: Some(true),
            ..StatePatch::default()
        });

        let state = store.get();
        assert!(state.conversation_open);
        assert!(state.metadata_removed);
        assert!(!state.submit_button_has_listener);
    }

    #[test]
    fn reset_returns_every_field_to_default() {
        let mut store = populated();
        store.reset();
        assert_eq!(store.get(), &SessionState::default());
    }

    #[test]
    fn edit_session_reset_keeps_lifecycle_and_content() {
        let mut store = populated();
        store.set(StatePatch::edit_session_reset());

        let state = store.get();
        assert!(state.conversation_open);
        assert!(state.submit_button_has_listener);
        assert!(state.edit_button_has_listener);
        assert_eq!(state.original_content.as_deref(), Some("print(1)"));
        assert_eq!(state.edited_content.as_deref(), Some("print(2)"));

        assert!(!state.save_button_has_listener);
        assert!(!state.original_tab_has_listener);
        assert!(!state.edited_tab_has_listener);
        assert!(!state.metadata_removed);
        assert!(!state.diff_toggles_inserted);
    }

    #[test]
    fn listener_patch_targets_single_flag() {
        let mut store = SessionStore::new();
        store.set(StatePatch::listener(ListenerFlag::OriginalTab, true));
        assert!(store.get().listener_attached(ListenerFlag::OriginalTab));
        assert!(!store.get().listener_attached(ListenerFlag::EditedTab));
    }

    #[test]
    fn subscribers_see_every_write() {
        let mut store = SessionStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |state| sink.borrow_mut().push(state.conversation_open));

        store.set(StatePatch {
            conversation_open: Some(true),
            ..StatePatch::default()
        });
        store.reset();
        assert_eq!(*seen.borrow(), vec![true, false]);

        assert!(store.unsubscribe(id));
        store.reset();
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn empty_content_is_not_captured() {
        let mut store = SessionStore::new();
        store.set(StatePatch {
            original_content: Some(Some(String::new())),
            ..StatePatch::default()
        });
        assert!(!store.get().has_original_content());
    }
}
