//! Compiled regex patterns for the response heuristics and text formatting.
//!
//! Compiled once on first use and shared by `validation` and `clipboard`.

use once_cell::sync::Lazy;
use regex::Regex;

// ═══════════════════════════════════════════════════════════════════════════════
// Response Validation Regexes
// ═══════════════════════════════════════════════════════════════════════════════

pub static RE_CLOSING_HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</[^>]+>").unwrap());
pub static RE_CONSTANT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_]+").unwrap());

// ═══════════════════════════════════════════════════════════════════════════════
// Markdown Stripping Regexes
// ═══════════════════════════════════════════════════════════════════════════════

pub static RE_MD_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^```[^\n]*\n?").unwrap());
pub static RE_MD_BOLD_ASTERISK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
pub static RE_MD_ITALIC_ASTERISK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
pub static RE_MD_BOLD_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"__([^_]+)__").unwrap());
pub static RE_MD_ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b_([^_]+)_\b").unwrap());
pub static RE_MD_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
pub static RE_MD_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#+\s*").unwrap());
pub static RE_MD_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
pub static RE_MD_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\s*)(?:[-*+]|\d+\.)\s+").unwrap());
