//! Conversation lifecycle: `Closed ⇄ Open`, keyed on the snooze button.
//!
//! ```text
//! Closed ── snooze present ──▶ Open     (toolbar inserted, then flag on)
//! Open   ── snooze absent  ──▶ Closed   (full reset, signal rotated)
//! ```
//!
//! Submit and window-close clicks also close the conversation without waiting
//! for the snooze button to go away. Every path goes through
//! [`close_conversation`] so they cannot drift apart.

use chrono::Utc;
use tracing::info;

use crate::dispatcher::{ReconcileContext, Reconciler};
use crate::document::HostDocument;
use crate::error::HostError;
use crate::signal::AbortSignal;
use crate::store::{SessionStore, StatePatch};
use crate::types::{Notification, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    IndicatorGone,
    Submitted,
    WindowClosed,
}

/// The only way back to a clean slate: clears the whole store and aborts any
/// wait that belongs to the closing conversation.
pub fn close_conversation(store: &mut SessionStore, signal: &AbortSignal, reason: CloseReason) {
    let generation = signal.rotate();
    store.reset();
    info!(reason = ?reason, generation, "Conversation closed");
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationLifecycle;

impl<D: HostDocument> Reconciler<D> for ConversationLifecycle {
    fn id(&self) -> &'static str {
        "conversation_lifecycle"
    }

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        _notification: Notification,
    ) -> Result<(), HostError> {
        let open = cx.store.get().conversation_open;
        let indicator_present = cx.document.query(Target::SnoozeButton)?.is_some();

        match (indicator_present, open) {
            (false, true) => close_conversation(cx.store, cx.signal, CloseReason::IndicatorGone),
            (true, false) => {
                // Stay closed until the toolbar is in, so a rejected insert
                // is retried on the next notification.
                cx.document.insert_toolbar()?;
                info!("New conversation detected");
                cx.store.set(StatePatch {
                    conversation_open: Some(true),
                    conversation_opened_at: Some(Some(Utc::now())),
                    ..StatePatch::default()
                });
            }
            _ => {}
        }

        Ok(())
    }
}
