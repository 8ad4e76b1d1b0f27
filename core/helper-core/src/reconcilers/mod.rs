//! Reconcilers, one per host-page feature.
//!
//! All of them share one shape: read an "already handled" flag and bail out
//! if set, query the live document and bail out if the element is absent,
//! perform the side effect once, then record the flag. The lifecycle
//! reconciler is the exception: an element disappearing is its signal.
//!
//! Register new reconcilers in [`default_reconcilers`] so engines pick them up.

mod content;
mod dom_edits;
mod lifecycle;
mod listeners;
mod prompt;

pub use content::{
    EditedContentCapture, OperatorNameCapture, OriginalContentCapture, TaskIdCapture,
};
pub use dom_edits::{DiffToggleInsertion, MetadataRemoval};
pub use lifecycle::{close_conversation, CloseReason, ConversationLifecycle};
pub use listeners::{
    CloseButtonListener, EditButtonListener, EditedTabListener, OriginalTabListener,
    SaveButtonListener, SubmitButtonListener,
};
pub use prompt::PromptDialogControls;

use tracing::debug;

use crate::dispatcher::{ReconcileContext, Reconciler};
use crate::document::HostDocument;
use crate::error::HostError;
use crate::store::{ListenerFlag, StatePatch};
use crate::types::{ClickAction, Target};

/// The full reconciler set, in the order the engine dispatches them.
pub fn default_reconcilers<D: HostDocument + 'static>() -> Vec<Box<dyn Reconciler<D>>> {
    vec![
        Box::new(ConversationLifecycle),
        Box::new(TaskIdCapture),
        Box::new(OperatorNameCapture),
        Box::new(EditedContentCapture),
        Box::new(OriginalContentCapture),
        Box::new(EditedTabListener),
        Box::new(OriginalTabListener),
        Box::new(MetadataRemoval),
        Box::new(EditButtonListener),
        Box::new(SaveButtonListener),
        Box::new(SubmitButtonListener),
        Box::new(CloseButtonListener),
        Box::new(DiffToggleInsertion),
        Box::new(PromptDialogControls),
    ]
}

/// Attaches `action` to the live `target` unless `flag` says it is already
/// wired. Returns whether a listener was attached.
///
/// The flag is written only after the host accepted the listener, so a failed
/// attach is retried on the next notification.
pub(crate) fn attach_once<D: HostDocument>(
    cx: &mut ReconcileContext<'_, D>,
    flag: ListenerFlag,
    target: Target,
    action: ClickAction,
) -> Result<bool, HostError> {
    if cx.store.get().listener_attached(flag) {
        return Ok(false);
    }

    let Some(element) = cx.document.query(target)? else {
        return Ok(false);
    };

    cx.document.add_click_listener(&element, action)?;
    cx.store.set(StatePatch::listener(flag, true));
    debug!(target = %target, action = ?action, "Listener added");
    Ok(true)
}


#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::memory::MemoryDocument;

    #[test]
    fn attach_once_skips_when_flag_set() {
        let mut harness = Harness::new();
        harness.document.mount(Target::SubmitButton, None);
        harness
            .store
            .set(StatePatch::listener(ListenerFlag::SubmitButton, true));
        let revision = harness.store.revision();

        let mut cx = ReconcileContext {
            document: &mut harness.document,
            store: &mut harness.store,
            signal: &harness.signal,
        };
        let attached = attach_once(
            &mut cx,
            ListenerFlag::SubmitButton,
            Target::SubmitButton,
            ClickAction::SubmitConversation,
        )
        .unwrap();

        assert!(!attached);
        assert_eq!(harness.document.listener_count(Target::SubmitButton), 0);
        assert_eq!(harness.store.revision(), revision);
    }

    #[test]
    fn attach_once_leaves_flag_clear_when_host_rejects() {
        let mut harness = Harness::new();
        harness.document.mount(Target::SaveButton, None);
        harness.document.inject_fault(Target::SaveButton, "detached subtree");

        let mut cx = ReconcileContext {
            document: &mut harness.document,
            store: &mut harness.store,
            signal: &harness.signal,
        };
        let result = attach_once(
            &mut cx,
            ListenerFlag::SaveButton,
            Target::SaveButton,
            ClickAction::SaveEdit,
        );

        assert!(result.is_err());
        assert!(!harness.store.get().save_button_has_listener);
    }

    #[test]
    fn default_set_has_unique_ids() {
        let reconcilers = default_reconcilers::<MemoryDocument>();
        let mut ids: Vec<_> = reconcilers.iter().map(|r| r.id()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 14);
    }
}
