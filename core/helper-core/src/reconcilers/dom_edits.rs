//! One-shot edits to the host page. Neither is ever undone.

use tracing::debug;

use crate::dispatcher::{ReconcileContext, Reconciler};
use crate::document::HostDocument;
use crate::error::HostError;
use crate::store::StatePatch;
use crate::types::{Notification, Target};

/// Deletes the metadata section (and its redundant save button).
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataRemoval;

impl<D: HostDocument> Reconciler<D> for MetadataRemoval {
    fn id(&self) -> &'static str {
        "metadata_section"
    }

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        _notification: Notification,
    ) -> Result<(), HostError> {
        if cx.store.get().metadata_removed {
            return Ok(());
        }

        let Some(section) = cx.document.query(Target::MetadataSection)? else {
            return Ok(());
        };

        cx.document.remove_element(&section)?;
        cx.store.set(StatePatch {
            metadata_removed: Some(true),
            ..StatePatch::default()
        });
        debug!("Metadata section removed");
        Ok(())
    }
}

/// Appends the diff toggles to the tab container. Needs the original content,
/// since there is nothing to diff against without it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffToggleInsertion;

impl<D: HostDocument> Reconciler<D> for DiffToggleInsertion {
    fn id(&self) -> &'static str {
        "diff_toggles"
    }

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        _notification: Notification,
    ) -> Result<(), HostError> {
        let state = cx.store.get();
        if state.diff_toggles_inserted || !state.has_original_content() {
            return Ok(());
        }

        let Some(container) = cx.document.query(Target::TabContainer)? else {
            return Ok(());
        };

        cx.document.append_diff_toggles(&container)?;
        cx.store.set(StatePatch {
            diff_toggles_inserted: Some(true),
            ..StatePatch::default()
        });
        debug!("Diff toggles inserted");
        Ok(())
    }
}
