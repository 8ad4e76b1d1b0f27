//! Offline run of the response heuristics on a file.
//!
//! Markdown files (`.md`) have their code pulled out of the fenced block;
//! anything else is treated as bare code.

use std::path::{Path, PathBuf};

use fs_err as fs;
use tracing::info;

use helper_core::validation::{detect_python, format_messages, response_status_messages};
use helper_core::{load_config, AlignmentFacts, HelperError, ResponseFacts, ValidationConfig};

pub struct CheckOptions {
    pub python: bool,
    /// Task metadata line such as `Programming Language: Python`.
    pub language: Option<String>,
    /// Labels of the task page's buttons.
    pub button_labels: Vec<String>,
    pub score: Option<i32>,
    pub rework: bool,
}

impl CheckOptions {
    fn is_python(&self) -> bool {
        let labels: Vec<&str> = self.button_labels.iter().map(String::as_str).collect();
        self.python || detect_python(self.language.as_deref(), &labels)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

pub fn check_file(
    path: &Path,
    options: &CheckOptions,
    config: &ValidationConfig,
) -> Result<Vec<String>, HelperError> {
    let contents = fs::read_to_string(path).map_err(|source| HelperError::Io {
        context: format!("reading {}", path.display()),
        source,
    })?;

    let alignment = AlignmentFacts {
        score: options.score,
        marked_for_rework: options.rework,
    };
    let is_python = options.is_python();
    let facts = if is_markdown(path) {
        ResponseFacts::from_markdown(&contents, is_python, alignment)
    } else {
        ResponseFacts::from_code(&contents, is_python, alignment)
    };

    Ok(response_status_messages(&facts, config))
}

pub fn run(path: &Path, options: CheckOptions, config_path: Option<PathBuf>) -> Result<(), String> {
    let config = load_config(config_path)?;
    let messages = check_file(path, &options, &config.validation)?;
    info!(path = %path.display(), findings = messages.len(), "Check finished");

    if messages.is_empty() {
        println!("No issues found.");
        return Ok(());
    }
    for line in format_messages(&messages) {
        print!("{line}");
    }
    Ok(())
}
