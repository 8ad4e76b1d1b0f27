//! Click-listener reconcilers. What each click does lives in
//! [`crate::behavior`].

use crate::dispatcher::{ReconcileContext, Reconciler};
use crate::document::HostDocument;
use crate::error::HostError;
use crate::store::ListenerFlag;
use crate::types::{ClickAction, Notification, Tab, Target};

use super::attach_once;

macro_rules! listener_reconciler {
    ($(#[$meta:meta])* $name:ident, $id:literal, $flag:expr, $target:expr, $action:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl<D: HostDocument> Reconciler<D> for $name {
            fn id(&self) -> &'static str {
                $id
            }

            fn reconcile(
                &self,
                cx: &mut ReconcileContext<'_, D>,
                _notification: Notification,
            ) -> Result<(), HostError> {
                attach_once(cx, $flag, $target, $action).map(|_| ())
            }
        }
    };
}

listener_reconciler!(
    /// Submitting ends the conversation immediately.
    SubmitButtonListener,
    "submit_button",
    ListenerFlag::SubmitButton,
    Target::SubmitButton,
    ClickAction::SubmitConversation
);

listener_reconciler!(
    CloseButtonListener,
    "window_close_button",
    ListenerFlag::CloseButton,
    Target::WindowCloseButton,
    ClickAction::CloseWindow
);

listener_reconciler!(
    EditButtonListener,
    "edit_button",
    ListenerFlag::EditButton,
    Target::EditButton,
    ClickAction::OpenEditor
);

listener_reconciler!(
    SaveButtonListener,
    "save_button",
    ListenerFlag::SaveButton,
    Target::SaveButton,
    ClickAction::SaveEdit
);

listener_reconciler!(
    OriginalTabListener,
    "original_tab",
    ListenerFlag::OriginalTab,
    Target::OriginalTab,
    ClickAction::SelectTab(Tab::Original)
);

listener_reconciler!(
    EditedTabListener,
    "edited_tab",
    ListenerFlag::EditedTab,
    Target::EditedTab,
    ClickAction::SelectTab(Tab::Edited)
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcilers::test_support::Harness;

    #[test]
    fn attaches_exactly_one_listener_across_many_notifications() {
        let mut harness = Harness::new();
        harness.document.mount(Target::SubmitButton, None);

        harness.run_times(&SubmitButtonListener, 10);

        assert_eq!(harness.document.listener_count(Target::SubmitButton), 1);
        assert_eq!(
            harness.document.click(Target::SubmitButton),
            vec![ClickAction::SubmitConversation]
        );
        assert!(harness.store.get().submit_button_has_listener);
        assert_eq!(harness.store.revision(), 1);
    }

    #[test]
    fn absent_element_leaves_flag_clear() {
        let mut harness = Harness::new();
        harness.run_times(&SaveButtonListener, 3);

        assert!(!harness.store.get().save_button_has_listener);
        assert_eq!(harness.store.revision(), 0);
    }

    #[test]
    fn tab_listeners_bind_their_own_tab() {
        let mut harness = Harness::new();
        harness.document.mount(Target::OriginalTab, None);
        harness.document.mount(Target::EditedTab, None);

        harness.run(&OriginalTabListener).unwrap();
        harness.run(&EditedTabListener).unwrap();

        assert_eq!(
            harness.document.click(Target::OriginalTab),
            vec![ClickAction::SelectTab(Tab::Original)]
        );
        assert_eq!(
            harness.document.click(Target::EditedTab),
            vec![ClickAction::SelectTab(Tab::Edited)]
        );
    }

    #[test]
    fn cleared_flag_rewires_remounted_element() {
        let mut harness = Harness::new();
        harness.document.mount(Target::SaveButton, None);
        harness.run(&SaveButtonListener).unwrap();

        harness.document.mount(Target::SaveButton, None);
        harness
            .store
            .set(crate::store::StatePatch::listener(ListenerFlag::SaveButton, false));
        harness.run_times(&SaveButtonListener, 4);

        assert_eq!(harness.document.listener_count(Target::SaveButton), 1);
        assert_eq!(harness.document.total_listeners(), 2);
    }
}
