//! Trace replay: drives the engine against a scripted in-memory page.
//!
//! A trace is a JSON object with a `steps` array. Each step is tagged by
//! `"step"`:
//!
//! ```text
//! mount        { target, text? }      insert (or re-render) an element
//! unmount      { target }             remove it
//! set_text     { target, text? }      change its text, same instance
//! fail         { target, details }    make lookups of it fail
//! reject       { operation, details } make the next page-level edit fail
//! notify       { kind?, times? }      deliver notifications
//! click        { target }             run whatever is wired to it
//! toggle_diff  { layout }             toolbar "View Diff"
//! copy         { target }             toolbar copy dropdown
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use helper_core::{
    load_config, CopyTarget, DiffLayout, HelperConfig, HelperError, MemoryClipboard,
    MemoryDocument, Notification, PageOperation, ReviewEngine, SessionState, Target,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Trace {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Mount {
        target: Target,
        #[serde(default)]
        text: Option<String>,
    },
    Unmount {
        target: Target,
    },
    SetText {
        target: Target,
        #[serde(default)]
        text: Option<String>,
    },
    Fail {
        target: Target,
        details: String,
    },
    Reject {
        operation: PageOperation,
        details: String,
    },
    Notify {
        #[serde(default)]
        kind: Notification,
        #[serde(default = "one")]
        times: usize,
    },
    Click {
        target: Target,
    },
    ToggleDiff {
        layout: DiffLayout,
    },
    Copy {
        target: CopyTarget,
    },
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultRecord {
    /// Zero-based index of the step that produced the fault.
    pub step: usize,
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub replayed_at: DateTime<Utc>,
    pub steps: usize,
    pub dispatches: usize,
    pub state: SessionState,
    pub revision: u64,
    pub listeners: BTreeMap<Target, usize>,
    pub toolbar_insertions: usize,
    pub diff_toggle_insertions: usize,
    pub diff_overlay_removals: usize,
    pub removed_elements: usize,
    pub prompt_controls: usize,
    pub clipboard: Vec<String>,
    pub faults: Vec<FaultRecord>,
}

pub fn load_trace(path: &Path) -> Result<Trace, HelperError> {
    let contents = fs::read_to_string(path).map_err(|source| HelperError::Io {
        context: format!("reading trace {}", path.display()),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| HelperError::Json {
        context: format!("parsing trace {}", path.display()),
        source,
    })
}

/// Replays `trace` on a fresh page and engine.
pub fn replay(trace: &Trace, config: HelperConfig) -> ReplayReport {
    let mut engine = ReviewEngine::new(MemoryDocument::new(), config);
    let mut clipboard = MemoryClipboard::default();
    let mut faults = Vec::new();
    let mut dispatches = 0;

    for (index, step) in trace.steps.iter().enumerate() {
        debug!(index, step = ?step, "Replaying step");
        match step {
            Step::Mount { target, text } => {
                engine.document_mut().mount(*target, text.as_deref());
            }
            Step::Unmount { target } => {
                engine.document_mut().unmount(*target);
            }
            Step::SetText { target, text } => {
                if !engine.document_mut().set_text(*target, text.as_deref()) {
                    debug!(index, target = %target, "set_text on absent element");
                }
            }
            Step::Fail { target, details } => {
                engine.document_mut().inject_fault(*target, details);
            }
            Step::Reject { operation, details } => {
                engine.document_mut().reject_next(*operation, details);
            }
            Step::Notify { kind, times } => {
                for _ in 0..*times {
                    let report = engine.notify(*kind);
                    dispatches += 1;
                    faults.extend(report.faults.into_iter().map(|fault| FaultRecord {
                        step: index,
                        source: fault.reconciler.to_string(),
                        error: fault.error.to_string(),
                    }));
                }
            }
            Step::Click { target } => {
                let actions = engine.document().click(*target);
                if actions.is_empty() {
                    debug!(index, target = %target, "Click on element with no listener");
                }
                for action in actions {
                    if let Err(err) = engine.handle_click(action) {
                        faults.push(FaultRecord {
                            step: index,
                            source: format!("click:{target}"),
                            error: err.to_string(),
                        });
                    }
                }
            }
            Step::ToggleDiff { layout } => {
                if !engine.toggle_diff_view(*layout) {
                    debug!(index, "Diff toggle ignored, no original content");
                }
            }
            Step::Copy { target } => {
                engine.copy(&mut clipboard, *target);
            }
        }
    }

    let document = engine.document();
    let listeners = Target::ALL
        .iter()
        .map(|target| (*target, document.listener_count(*target)))
        .filter(|(_, count)| *count > 0)
        .collect();

    ReplayReport {
        replayed_at: Utc::now(),
        steps: trace.steps.len(),
        dispatches,
        state: engine.state().clone(),
        revision: engine.store().revision(),
        listeners,
        toolbar_insertions: document.toolbar_insertions(),
        diff_toggle_insertions: document.diff_toggle_insertions(),
        diff_overlay_removals: document.diff_overlay_removals(),
        removed_elements: document.removed_elements().len(),
        prompt_controls: document.prompt_controls().len(),
        clipboard: clipboard.writes,
        faults,
    }
}

pub fn run(trace_path: &Path, config_path: Option<PathBuf>) -> Result<(), String> {
    let config = load_config(config_path)?;
    let trace = load_trace(trace_path)?;
    let report = replay(&trace, config);

    info!(
        steps = report.steps,
        dispatches = report.dispatches,
        faults = report.faults.len(),
        "Replay finished"
    );

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to serialize report: {}", e))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helper_core::{DiffViewState, Tab};

    fn parse(json: &str) -> Trace {
        serde_json::from_str(json).expect("trace parses")
    }

    #[test]
    fn parses_every_step_kind() {
        let trace = parse(
            r#"{"steps": [
                {"step": "mount", "target": "snooze_button"},
                {"step": "mount", "target": "task_id", "text": "t-1"},
                {"step": "set_text", "target": "task_id", "text": "t-2"},
                {"step": "fail", "target": "edit_button", "details": "bad id"},
                {"step": "reject", "operation": "insert_toolbar", "details": "no slot"},
                {"step": "notify"},
                {"step": "notify", "kind": "poll", "times": 3},
                {"step": "click", "target": "submit_button"},
                {"step": "toggle_diff", "layout": "side_by_side"},
                {"step": "copy", "target": "operator_name"},
                {"step": "unmount", "target": "snooze_button"}
            ]}"#,
        );

        assert_eq!(trace.steps.len(), 11);
        assert_eq!(
            trace.steps[5],
            Step::Notify {
                kind: Notification::Mutation,
                times: 1
            }
        );
        assert_eq!(
            trace.steps[6],
            Step::Notify {
                kind: Notification::Poll,
                times: 3
            }
        );
    }

    #[test]
    fn unknown_step_is_rejected() {
        let result: Result<Trace, _> =
            serde_json::from_str(r#"{"steps": [{"step": "hover", "target": "edit_button"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn full_review_session() {
        let trace = parse(
            r#"{"steps": [
                {"step": "mount", "target": "snooze_button"},
                {"step": "mount", "target": "task_id", "text": " task-7 "},
                {"step": "mount", "target": "operator_name", "text": "grace"},
                {"step": "mount", "target": "original_tab_content", "text": "x = 1"},
                {"step": "mount", "target": "response_content", "text": "1x = 2"},
                {"step": "mount", "target": "edited_tab"},
                {"step": "mount", "target": "tab_container"},
                {"step": "notify", "times": 4},
                {"step": "toggle_diff", "layout": "unified"},
                {"step": "click", "target": "edited_tab"},
                {"step": "copy", "target": "edited_content"},
                {"step": "copy", "target": "task_id"}
            ]}"#,
        );

        let report = replay(&trace, HelperConfig::default());

        assert!(report.state.conversation_open);
        assert_eq!(report.state.task_id.as_deref(), Some("task-7"));
        assert_eq!(report.state.current_tab, Tab::Edited);
        assert_eq!(report.state.diff_view, DiffViewState::Closed);
        assert_eq!(report.dispatches, 4);
        assert_eq!(report.toolbar_insertions, 1);
        assert_eq!(report.diff_toggle_insertions, 1);
        assert_eq!(report.diff_overlay_removals, 1);
        assert_eq!(report.listeners.get(&Target::EditedTab), Some(&1));
        assert_eq!(report.clipboard, vec!["x = 2", "task-7"]);
        assert!(report.faults.is_empty());
    }

    #[test]
    fn faults_are_attributed_to_their_step() {
        let trace = parse(
            r#"{"steps": [
                {"step": "mount", "target": "snooze_button"},
                {"step": "mount", "target": "save_button"},
                {"step": "fail", "target": "save_button", "details": "duplicate id"},
                {"step": "notify", "times": 2}
            ]}"#,
        );

        let report = replay(&trace, HelperConfig::default());

        assert!(report.state.conversation_open);
        assert_eq!(report.faults.len(), 2);
        assert!(report.faults.iter().all(|f| f.step == 3));
        assert_eq!(report.faults[0].source, "save_button");
        assert!(report.listeners.is_empty());
    }

    #[test]
    fn report_serializes_listener_targets_as_names() {
        let trace = parse(
            r#"{"steps": [
                {"step": "mount", "target": "snooze_button"},
                {"step": "mount", "target": "submit_button"},
                {"step": "notify"}
            ]}"#,
        );

        let report = replay(&trace, HelperConfig::default());
        let json = serde_json::to_value(&report).expect("report serializes");

        assert_eq!(json["listeners"]["submit_button"], 1);
        assert_eq!(json["state"]["conversation_open"], true);
    }

    #[test]
    fn load_trace_reports_bad_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("trace.json");
        fs::write(&path, "{not json").expect("write trace");

        let err = load_trace(&path).unwrap_err();
        assert!(matches!(err, HelperError::Json { .. }));
    }

    #[test]
    fn rejected_toolbar_opens_on_a_later_notification() {
        let trace = parse(
            r#"{"steps": [
                {"step": "mount", "target": "snooze_button"},
                {"step": "reject", "operation": "insert_toolbar", "details": "no slot"},
                {"step": "notify", "times": 3}
            ]}"#,
        );

        let report = replay(&trace, HelperConfig::default());

        assert!(report.state.conversation_open);
        assert_eq!(report.toolbar_insertions, 1);
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].source, "conversation_lifecycle");
    }

    #[test]
    fn prompt_dialog_copy_buttons() {
        let trace = parse(
            r###"{"steps": [
                {"step": "mount", "target": "prompt_close_button"},
                {"step": "mount", "target": "prompt_content", "text": "## Goal\nSort **fast**"},
                {"step": "notify", "times": 2},
                {"step": "copy", "target": "prompt_plaintext"},
                {"step": "copy", "target": "prompt_markdown"}
            ]}"###,
        );

        let report = replay(&trace, HelperConfig::default());

        assert_eq!(report.prompt_controls, 1);
        assert_eq!(
            report.clipboard,
            vec!["Goal\n\nSort fast", "## Goal\nSort **fast**"]
        );
    }
}
