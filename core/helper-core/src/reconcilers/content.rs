//! Content capture from the host page.
//!
//! Captures are write-once until the next full reset: the host renders in
//! pieces, and a transient empty render must never overwrite a good capture.

use tracing::debug;

use crate::dispatcher::{ReconcileContext, Reconciler};
use crate::document::HostDocument;
use crate::error::HostError;
use crate::store::StatePatch;
use crate::types::{Notification, Target};

/// Drops the index digit the host prepends to the edited response.
fn strip_response_index(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.as_str()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OriginalContentCapture;

impl<D: HostDocument> Reconciler<D> for OriginalContentCapture {
    fn id(&self) -> &'static str {
        "original_content"
    }

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        _notification: Notification,
    ) -> Result<(), HostError> {
        if cx.store.get().has_original_content() {
            return Ok(());
        }

        let Some(text) = cx.document.query_text(Target::OriginalTabContent)? else {
            return Ok(());
        };

        debug!(chars = text.chars().count(), "Original content captured");
        cx.store.set(StatePatch {
            original_content: Some(Some(text)),
            ..StatePatch::default()
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EditedContentCapture;

impl<D: HostDocument> Reconciler<D> for EditedContentCapture {
    fn id(&self) -> &'static str {
        "edited_content"
    }

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        _notification: Notification,
    ) -> Result<(), HostError> {
        if cx.store.get().has_edited_content() {
            return Ok(());
        }

        let Some(text) = cx.document.query_text(Target::ResponseContent)? else {
            return Ok(());
        };

        let content = strip_response_index(&text);
        if content.is_empty() {
            return Ok(());
        }

        debug!(chars = content.chars().count(), "Edited content captured");
        cx.store.set(StatePatch {
            edited_content: Some(Some(content.to_string())),
            ..StatePatch::default()
        });
        Ok(())
    }
}

/// Task id shown in the task window; captured once per conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskIdCapture;

impl<D: HostDocument> Reconciler<D> for TaskIdCapture {
    fn id(&self) -> &'static str {
        "task_id"
    }

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        _notification: Notification,
    ) -> Result<(), HostError> {
        let state = cx.store.get();
        if !state.conversation_open || state.task_id.is_some() {
            return Ok(());
        }

        let Some(task_id) = cx.document.query_text(Target::TaskId)? else {
            return Ok(());
        };

        let task_id = task_id.trim().to_string();
        if task_id.is_empty() {
            return Ok(());
        }

        debug!(task_id = %task_id, "Task id captured");
        cx.store.set(StatePatch {
            task_id: Some(Some(task_id)),
            ..StatePatch::default()
        });
        Ok(())
    }
}

/// Operator name; follows the host when it changes mid-conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperatorNameCapture;

impl<D: HostDocument> Reconciler<D> for OperatorNameCapture {
    fn id(&self) -> &'static str {
        "operator_name"
    }

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        _notification: Notification,
    ) -> Result<(), HostError> {
        if !cx.store.get().conversation_open {
            return Ok(());
        }

        let Some(name) = cx.document.query_text(Target::OperatorName)? else {
            return Ok(());
        };

        if cx.store.get().operator_name.as_deref() == Some(name.as_str()) {
            return Ok(());
        }

        cx.store.set(StatePatch {
            operator_name: Some(Some(name)),
            ..StatePatch::default()
        });
        Ok(())
    }
}
