//! Task prompt dialog: word count and copy buttons next to its close button.
//!
//! The dialog can be opened and closed any number of times. Its controls are
//! inserted once per opening; the flag and the captured prompt are cleared as
//! soon as the close button is gone.

use tracing::debug;

use crate::clipboard::word_count;
use crate::dispatcher::{ReconcileContext, Reconciler};
use crate::document::HostDocument;
use crate::error::HostError;
use crate::store::StatePatch;
use crate::types::{Notification, Target};

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptDialogControls;

impl<D: HostDocument> Reconciler<D> for PromptDialogControls {
    fn id(&self) -> &'static str {
        "prompt_dialog"
    }

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        _notification: Notification,
    ) -> Result<(), HostError> {
        let state = cx.store.get();
        let inserted = state.prompt_controls_inserted;
        let captured = state.prompt_content.is_some();

        let Some(close_button) = cx.document.query(Target::PromptCloseButton)? else {
            if inserted || captured {
                debug!("Prompt dialog closed");
                cx.store.set(StatePatch {
                    prompt_controls_inserted: Some(false),
                    prompt_content: Some(None),
                    ..StatePatch::default()
                });
            }
            return Ok(());
        };

        if inserted {
            return Ok(());
        }

        let Some(prompt) = cx.document.query_text(Target::PromptContent)? else {
            return Ok(());
        };

        let words = word_count(&prompt);
        cx.document.insert_prompt_controls(&close_button, words)?;
        cx.store.set(StatePatch {
            prompt_controls_inserted: Some(true),
            prompt_content: Some(Some(prompt)),
            ..StatePatch::default()
        });
        debug!(words, "Prompt controls inserted");
        Ok(())
    }
}
