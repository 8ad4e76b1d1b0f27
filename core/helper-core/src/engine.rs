//! ReviewEngine - the facade hosts drive.
//!
//! The host owns the notification source: it calls [`ReviewEngine::notify`]
//! for every mutation (and on its own polling schedule for insertions the
//! mutation stream misses) and [`ReviewEngine::handle_click`] when a wired
//! element is clicked. Everything runs synchronously on the caller's thread.

use tracing::{debug, warn};

use crate::behavior;
use crate::clipboard::{copy_text, Clipboard, CopyTarget};
use crate::config::HelperConfig;
use crate::dispatcher::{DispatchReport, Dispatcher, ReconcileContext};
use crate::document::HostDocument;
use crate::error::{HostError, WaitError};
use crate::poll::poll_until;
use crate::reconcilers::default_reconcilers;
use crate::signal::{AbortSignal, AbortToken};
use crate::store::{SessionState, SessionStore, StatePatch};
use crate::types::{ClickAction, DiffLayout, Notification};
use crate::validation::{response_status_messages, AlignmentFacts, ResponseFacts};

pub struct ReviewEngine<D: HostDocument> {
    document: D,
    store: SessionStore,
    signal: AbortSignal,
    dispatcher: Dispatcher<D>,
    config: HelperConfig,
}

impl<D: HostDocument + 'static> ReviewEngine<D> {
    /// Engine with the full reconciler set registered.
    pub fn new(document: D, config: HelperConfig) -> Self {
        Self::with_dispatcher(document, config, Dispatcher::new(default_reconcilers()))
    }
}

impl<D: HostDocument> ReviewEngine<D> {
    pub fn with_dispatcher(document: D, config: HelperConfig, dispatcher: Dispatcher<D>) -> Self {
        Self {
            document,
            store: SessionStore::new(),
            signal: AbortSignal::new(),
            dispatcher,
            config,
        }
    }

    /// Runs every reconciler once against the live document.
    pub fn notify(&mut self, notification: Notification) -> DispatchReport {
        let mut cx = ReconcileContext {
            document: &mut self.document,
            store: &mut self.store,
            signal: &self.signal,
        };
        let report = self.dispatcher.update_observers(&mut cx, notification);
        debug!(
            notification = ?notification,
            ran = report.ran,
            faults = report.faults.len(),
            "Dispatch complete"
        );
        report
    }

    pub fn handle_click(&mut self, action: ClickAction) -> Result<(), HostError> {
        behavior::handle_click(&mut self.document, &mut self.store, &self.signal, action)
    }

    /// Toolbar "View Diff". Does nothing until the original content is known.
    pub fn toggle_diff_view(&mut self, layout: DiffLayout) -> bool {
        let state = self.store.get();
        if !state.has_original_content() {
            return false;
        }
        let next = state.diff_view.toggled(layout);
        self.store.set(StatePatch {
            diff_view: Some(next),
            ..StatePatch::default()
        });
        true
    }

    /// Copies a captured value. Returns whether anything reached the clipboard.
    pub fn copy(&self, clipboard: &mut dyn Clipboard, target: CopyTarget) -> bool {
        let Some(text) = copy_text(self.store.get(), target) else {
            debug!(target = ?target, "Nothing captured to copy");
            return false;
        };
        match clipboard.write_text(&text) {
            Ok(()) => true,
            Err(err) => {
                warn!(target = ?target, error = %err, "Clipboard write failed");
                false
            }
        }
    }

    /// Heuristic findings for the captured edited response.
    pub fn check_edited_response(
        &self,
        is_python: bool,
        alignment: AlignmentFacts,
    ) -> Vec<String> {
        let facts = ResponseFacts {
            code: self.store.get().edited_content.clone(),
            is_python,
            alignment,
            ..ResponseFacts::default()
        };
        response_status_messages(&facts, &self.config.validation)
    }

    /// Token for the current conversation; aborted when it closes.
    pub fn abort_token(&self) -> AbortToken {
        self.signal.token()
    }

    /// Bounded wait with the configured interval and timeout, cancelled if the
    /// current conversation closes first.
    pub fn wait_for<T, F>(&self, check: F) -> Result<T, WaitError>
    where
        F: FnMut() -> Option<T>,
    {
        poll_until(&self.abort_token(), self.config.poll.options(), check)
    }

    pub fn state(&self) -> &SessionState {
        self.store.get()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// For UI consumers that subscribe to state changes.
    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    pub fn signal(&self) -> &AbortSignal {
        &self.signal
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<D> {
        &mut self.dispatcher
    }

    pub fn config(&self) -> &HelperConfig {
        &self.config
    }
}
