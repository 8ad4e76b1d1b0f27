//! Fans every notification out to the registered reconcilers.
//!
//! Reconcilers run in registration order against the same document snapshot.
//! A reconciler that fails is logged and recorded; the rest still run, so a
//! malformed element can never stop the lifecycle reconciler from seeing a
//! closed conversation.

use std::fmt;

use tracing::{debug, warn};

use crate::document::HostDocument;
use crate::error::HostError;
use crate::signal::AbortSignal;
use crate::store::SessionStore;
use crate::types::Notification;

/// Everything a reconciler may touch during one dispatch.
pub struct ReconcileContext<'a, D: HostDocument> {
    pub document: &'a mut D,
    pub store: &'a mut SessionStore,
    pub signal: &'a AbortSignal,
}

/// Idempotent synchronizer for one host-page feature.
///
/// Implementors should:
/// - Check their "already handled" flag first and return early
/// - Treat an absent element as `Ok(())`, never as a failure
/// - Perform their side effect at most once per flag transition
pub trait Reconciler<D: HostDocument> {
    /// Stable identifier, used by [`Dispatcher::remove_observer`] and in logs.
    fn id(&self) -> &'static str;

    fn reconcile(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        notification: Notification,
    ) -> Result<(), HostError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileFault {
    pub reconciler: &'static str,
    pub error: HostError,
}

/// Outcome of one [`Dispatcher::update_observers`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub ran: usize,
    pub faults: Vec<ReconcileFault>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

pub struct Dispatcher<D: HostDocument> {
    observers: Vec<Box<dyn Reconciler<D>>>,
}

impl<D: HostDocument> fmt::Debug for Dispatcher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("observers", &self.ids())
            .finish()
    }
}

impl<D: HostDocument> Default for Dispatcher<D> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
        }
    }
}

impl<D: HostDocument> Dispatcher<D> {
    pub fn new(observers: Vec<Box<dyn Reconciler<D>>>) -> Self {
        Self { observers }
    }

    /// Appends without deduplicating; registering twice runs twice.
    pub fn add_observer(&mut self, observer: Box<dyn Reconciler<D>>) {
        debug!(observer = observer.id(), "Adding observer");
        self.observers.push(observer);
    }

    /// Removes every observer with this id. Returns how many were removed.
    pub fn remove_observer(&mut self, id: &str) -> usize {
        debug!(observer = id, "Removing observer");
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id() != id);
        before - self.observers.len()
    }

    pub fn reset_observers(&mut self) {
        debug!("Resetting observers");
        self.observers.clear();
    }

    pub fn update_observers(
        &self,
        cx: &mut ReconcileContext<'_, D>,
        notification: Notification,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        for observer in &self.observers {
            report.ran += 1;
            if let Err(error) = observer.reconcile(cx, notification) {
                warn!(
                    observer = observer.id(),
                    error = %error,
                    "Reconciler failed; will retry on next notification"
                );
                report.faults.push(ReconcileFault {
                    reconciler: observer.id(),
                    error,
                });
            }
        }
        report
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.observers.iter().map(|observer| observer.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
