//! Stack catalog parsing.
//!
//! The catalog is a markdown document where each stack is a level-3 heading
//! followed by labeled bullet lines:
//!
//! ```text
//! ### REACT_SPA
//! - **Description**: Single-page app with React
//! - **Tags**: web, frontend, react
//! - **Priority**: 2
//! - **Use Cases**:
//!   - Dashboards
//!   - Interactive tools
//! ```
//!
//! Parsing is a small line-driven state machine (`Outside` → `InStack` ⇄
//! `InUseCases`); any level-1 or level-2 heading closes the current entry.

use crate::error::{Result, SpecstackError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Priority assigned to entries that omit a `Priority` line.
pub const DEFAULT_PRIORITY: i64 = 999;

// ---------------------------------------------------------------------------
// StackRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRecord {
    pub name: String,
    pub description: String,
    /// Lowercased, deduplicated, in catalog order.
    pub tags: Vec<String>,
    /// Lower is preferred.
    pub priority: i64,
    pub use_cases: Vec<String>,
    /// Zero-based position among stack headings in the source document.
    pub order: usize,
}

impl StackRecord {
    fn new(name: &str, order: usize) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            tags: Vec::new(),
            priority: DEFAULT_PRIORITY,
            use_cases: Vec::new(),
            order,
        }
    }
}

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

static LABEL_RE: OnceLock<Regex> = OnceLock::new();
static NESTED_BULLET_RE: OnceLock<Regex> = OnceLock::new();

fn label_re() -> &'static Regex {
    LABEL_RE.get_or_init(|| {
        Regex::new(r"^[-*]\s+\*\*(?P<label>[^*]+)\*\*\s*:?\s*(?P<value>.*)$").unwrap()
    })
}

fn nested_bullet_re() -> &'static Regex {
    NESTED_BULLET_RE.get_or_init(|| Regex::new(r"^\s+[-*]\s+(?P<item>.+)$").unwrap())
}

#[derive(Debug, PartialEq)]
enum Line<'a> {
    /// `### NAME`
    StackHeading(&'a str),
    /// `#` or `##` heading.
    SectionHeading,
    Label { label: &'a str, value: &'a str },
    NestedBullet(&'a str),
    Other,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix("### ") {
        return Line::StackHeading(rest.trim());
    }
    if line.starts_with("# ") || line.starts_with("## ") {
        return Line::SectionHeading;
    }
    if let Some(caps) = label_re().captures(line) {
        let label = caps.name("label").map(|m| m.as_str()).unwrap_or_default();
        let value = caps.name("value").map(|m| m.as_str()).unwrap_or_default();
        return Line::Label {
            label: label.trim().trim_end_matches(':'),
            value: value.trim(),
        };
    }
    if let Some(caps) = nested_bullet_re().captures(line) {
        let item = caps.name("item").map(|m| m.as_str()).unwrap_or_default();
        return Line::NestedBullet(item.trim());
    }
    Line::Other
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InStack,
    InUseCases,
}

/// Read and parse the catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<Vec<StackRecord>> {
    if !path.is_file() {
        return Err(SpecstackError::CatalogNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// Parse catalog markdown into stack records, in document order.
pub fn parse_catalog(content: &str) -> Result<Vec<StackRecord>> {
    let mut stacks: Vec<StackRecord> = Vec::new();
    let mut current: Option<StackRecord> = None;
    let mut state = State::Outside;

    for raw in content.lines() {
        let line = raw.trim_end();
        match (state, classify(line)) {
            (_, Line::StackHeading(name)) => {
                finish(&mut stacks, current.take())?;
                current = Some(StackRecord::new(name, stacks.len()));
                state = State::InStack;
            }
            (_, Line::SectionHeading) => {
                finish(&mut stacks, current.take())?;
                state = State::Outside;
            }
            (State::Outside, _) => {}
            (State::InStack | State::InUseCases, Line::Label { label, value }) => {
                if let Some(stack) = current.as_mut() {
                    state = apply_label(stack, label, value)?;
                }
            }
            (State::InUseCases, Line::NestedBullet(item)) => {
                if let Some(stack) = current.as_mut() {
                    stack.use_cases.push(item.to_string());
                }
            }
            (State::InStack | State::InUseCases, _) => {}
        }
    }
    finish(&mut stacks, current.take())?;

    tracing::debug!(count = stacks.len(), "parsed stack catalog");
    Ok(stacks)
}

/// Apply a labeled line to `stack` and return the state to continue in.
fn apply_label(stack: &mut StackRecord, label: &str, value: &str) -> Result<State> {
    match label.to_ascii_lowercase().as_str() {
        "description" => stack.description = value.to_string(),
        "tags" => {
            for tag in value.split(',') {
                let tag = tag.trim().to_lowercase();
                if !tag.is_empty() && !stack.tags.contains(&tag) {
                    stack.tags.push(tag);
                }
            }
        }
        "priority" => {
            stack.priority = value.parse().map_err(|_| SpecstackError::Parse {
                stack: stack.name.clone(),
                message: format!("invalid Priority value '{value}'"),
            })?;
        }
        "use cases" => return Ok(State::InUseCases),
        _ => {}
    }
    Ok(State::InStack)
}

fn finish(stacks: &mut Vec<StackRecord>, record: Option<StackRecord>) -> Result<()> {
    let Some(record) = record else {
        return Ok(());
    };
    if stacks.iter().any(|s| s.name == record.name) {
        return Err(SpecstackError::Parse {
            stack: record.name,
            message: "duplicate stack name".to_string(),
        });
    }
    stacks.push(record);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
