//! # helper-core
//!
//! Reconciliation engine for the Orochi review helper. The host page
//! re-renders on its own schedule; this crate keeps a derived session state in
//! step with it and wires exactly one behavior per host element.
//!
//! ## Design Principles
//!
//! - **Sidecar**: observe the host page, never depend on its internals. Every
//!   reconciler re-queries the live document instead of trusting notifications.
//! - **Synchronous**: no async runtime. Bounded waits block the calling thread
//!   and are cancelled through a generation-counted [`AbortSignal`].
//! - **Idempotent**: store flags are the single source of truth for "is this
//!   behavior wired"; reconcilers may run any number of times.
//! - **Graceful degradation**: absent elements are a normal no-op, and one
//!   failing reconciler never stops the others.
//!
//! ## Quick Start
//!
//! ```rust
//! use helper_core::{HelperConfig, MemoryDocument, Notification, ReviewEngine, Target};
//!
//! let mut engine = ReviewEngine::new(MemoryDocument::new(), HelperConfig::default());
//! engine.document_mut().mount(Target::SnoozeButton, None);
//! engine.notify(Notification::Mutation);
//! assert!(engine.state().conversation_open);
//! ```

pub mod behavior;
pub mod clipboard;
pub mod config;
pub mod dispatcher;
pub mod document;
pub mod engine;
pub mod error;
pub mod memory;
pub mod patterns;
pub mod poll;
pub mod reconcilers;
pub mod signal;
pub mod store;
pub mod types;
pub mod validation;

pub use clipboard::{Clipboard, CopyTarget, MemoryClipboard};
pub use config::{load_config, HelperConfig, PollConfig, ValidationConfig};
pub use dispatcher::{DispatchReport, Dispatcher, ReconcileContext, ReconcileFault, Reconciler};
pub use document::HostDocument;
pub use engine::ReviewEngine;
pub use error::{HelperError, HostError, Result, WaitError};
pub use memory::{ElementId, MemoryDocument, MemoryElement, PageOperation};
pub use poll::{poll_until, PollOptions};
pub use signal::{AbortSignal, AbortToken};
pub use store::{ListenerFlag, SessionState, SessionStore, StatePatch, SubscriptionId};
pub use types::{ClickAction, DiffLayout, DiffViewState, Notification, Tab, Target};
pub use validation::{AlignmentFacts, ResponseFacts};
