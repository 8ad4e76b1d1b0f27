//! What happens when the user clicks an element the engine wired up.
//!
//! ```text
//! SubmitConversation, CloseWindow → close conversation now
//! OpenEditor                      → edit-session reset
//! SaveEdit                        → diff closed, save listener flag cleared
//! SelectTab(tab)                  → current tab, diff overlay removed
//! ```

use tracing::info;

use crate::document::HostDocument;
use crate::error::HostError;
use crate::reconcilers::{close_conversation, CloseReason};
use crate::signal::AbortSignal;
use crate::store::{SessionStore, StatePatch};
use crate::types::{ClickAction, DiffViewState};

pub fn handle_click<D: HostDocument>(
    document: &mut D,
    store: &mut SessionStore,
    signal: &AbortSignal,
    action: ClickAction,
) -> Result<(), HostError> {
    match action {
        // The host's close animation outlives our need to stop reconciling.
        ClickAction::SubmitConversation => {
            close_conversation(store, signal, CloseReason::Submitted);
        }
        ClickAction::CloseWindow => {
            close_conversation(store, signal, CloseReason::WindowClosed);
        }
        ClickAction::OpenEditor => {
            info!("Response edit button clicked");
            store.set(StatePatch::edit_session_reset());
        }
        ClickAction::SaveEdit => {
            info!("Save button clicked");
            // Tab flags stay set: the tabs re-render after the save settles,
            // and re-querying them now would wire the outgoing instances.
            store.set(StatePatch {
                diff_view: Some(DiffViewState::Closed),
                save_button_has_listener: Some(false),
                ..StatePatch::default()
            });
        }
        ClickAction::SelectTab(tab) => {
            store.set(StatePatch {
                current_tab: Some(tab),
                diff_view: Some(DiffViewState::Closed),
                ..StatePatch::default()
            });
            document.remove_diff_overlay()?;
        }
    }
    Ok(())
}
