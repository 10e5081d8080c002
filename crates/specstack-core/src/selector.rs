//! Deterministic stack selection.
//!
//! Two paths: a manual override resolved by name, and the automatic "yolo"
//! policy that scores every stack by how many of its tags the prompt hits and
//! takes the single best one without asking. Ties break on lower priority,
//! then on earlier catalog position.

use crate::catalog::{load_catalog, StackRecord};
use crate::error::{Result, SpecstackError};
use crate::paths;
use crate::technology::load_technologies;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

pub const FALLBACK_REASON: &str = "no tag match; fallback to lowest priority";

// ---------------------------------------------------------------------------
// SelectionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected_stack: StackRecord,
    pub matched_tags: Vec<String>,
    pub priority: i64,
    pub fallback: bool,
    pub match_reason: String,
    /// Filled by [`resolve`]; empty when only [`select`] ran.
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl SelectionResult {
    fn new(stack: &StackRecord, matched_tags: Vec<String>, fallback: bool, reason: String) -> Self {
        Self {
            selected_stack: stack.clone(),
            priority: stack.priority,
            matched_tags,
            fallback,
            match_reason: reason,
            technologies: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tag matching
// ---------------------------------------------------------------------------

/// Lowercase, whitespace-delimited prompt tokens.
pub fn tokenize(prompt: &str) -> Vec<String> {
    prompt.split_whitespace().map(str::to_lowercase).collect()
}

/// Does any token satisfy `tag`? `tag` must already be lowercase.
fn tag_matches(tag: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|token| {
        let token = token.as_str();
        if token == tag {
            return true;
        }
        if tag.contains('-')
            && tag
                .split('-')
                .any(|part| part.len() >= 3 && part == token)
        {
            return true;
        }
        tag.len() >= 4 && token.len() >= 3 && (tag.contains(token) || token.contains(tag))
    })
}

/// Tags of `stack` hit by `tokens`, in the stack's tag order. Each tag counts once.
pub fn matched_tags(stack: &StackRecord, tokens: &[String]) -> Vec<String> {
    stack
        .tags
        .iter()
        .filter(|tag| tag_matches(&tag.to_lowercase(), tokens))
        .cloned()
        .collect()
}

/// Lower priority first, then earlier catalog order.
fn preference(a: &StackRecord, b: &StackRecord) -> Ordering {
    a.priority.cmp(&b.priority).then(a.order.cmp(&b.order))
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Pick a stack from `stacks` for `prompt`, or resolve `manual` by name.
pub fn select(
    prompt: &str,
    stacks: &[StackRecord],
    manual: Option<&str>,
) -> Result<SelectionResult> {
    if stacks.is_empty() {
        return Err(SpecstackError::NoStacksAvailable);
    }

    if let Some(name) = manual {
        let stack = find_by_name(stacks, name)?;
        tracing::debug!(stack = %stack.name, "manual stack override");
        return Ok(SelectionResult::new(
            stack,
            Vec::new(),
            false,
            format!("manually specified stack: {}", stack.name),
        ));
    }

    let tokens = tokenize(prompt);
    let mut best: Option<(&StackRecord, Vec<String>)> = None;
    for stack in stacks {
        let hits = matched_tags(stack, &tokens);
        tracing::debug!(stack = %stack.name, score = hits.len(), "scored stack");
        let better = match &best {
            None => true,
            Some((current, current_hits)) => match hits.len().cmp(&current_hits.len()) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => preference(stack, current) == Ordering::Less,
            },
        };
        if better {
            best = Some((stack, hits));
        }
    }

    match best {
        Some((stack, hits)) if !hits.is_empty() => {
            let reason = format!("matched tags: {}", hits.join(", "));
            Ok(SelectionResult::new(stack, hits, false, reason))
        }
        _ => {
            let stack = stacks
                .iter()
                .min_by(|a, b| preference(a, b))
                .ok_or(SpecstackError::NoStacksAvailable)?;
            tracing::debug!(stack = %stack.name, "no tag matched; using fallback");
            Ok(SelectionResult::new(
                stack,
                Vec::new(),
                true,
                FALLBACK_REASON.to_string(),
            ))
        }
    }
}

/// Exact name first, then case-insensitive.
fn find_by_name<'a>(stacks: &'a [StackRecord], name: &str) -> Result<&'a StackRecord> {
    stacks
        .iter()
        .find(|s| s.name == name)
        .or_else(|| stacks.iter().find(|s| s.name.eq_ignore_ascii_case(name)))
        .ok_or_else(|| SpecstackError::StackNotFound {
            name: name.to_string(),
            known: stacks.iter().map(|s| s.name.clone()).collect(),
        })
}

/// Full pipeline over an installed stacks directory: parse the catalog,
/// select, require the detail document, extract its technologies.
pub fn resolve(stacks_dir: &Path, prompt: &str, manual: Option<&str>) -> Result<SelectionResult> {
    let catalog = load_catalog(&stacks_dir.join(paths::CATALOG_FILE_NAME))?;
    let mut result = select(prompt, &catalog, manual)?;

    let detail = paths::stack_detail_path(stacks_dir, &result.selected_stack.name);
    if !detail.is_file() {
        return Err(SpecstackError::StackFileMissing {
            stack: result.selected_stack.name.clone(),
            path: detail,
        });
    }
    result.technologies = load_technologies(&detail)?;
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stack(name: &str, tags: &[&str], priority: i64, order: usize) -> StackRecord {
        StackRecord {
            name: name.to_string(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            priority,
            use_cases: Vec::new(),
            order,
        }
    }

    fn web_catalog() -> Vec<StackRecord> {
        vec![
            stack("SIMPLE_WEB_APP", &["web", "frontend", "simple"], 1, 0),
            stack("REACT_SPA", &["web", "frontend", "react"], 2, 1),
        ]
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_whitespace() {
        assert_eq!(tokenize("  Build a\tReact\napp "), ["build", "a", "react", "app"]);
    }

    #[test]
    fn exact_token_match() {
        let tokens = tokenize("a web thing");
        assert!(tag_matches("web", &tokens));
        assert!(!tag_matches("api", &tokens));
    }

    #[test]
    fn hyphen_component_match_requires_three_chars() {
        assert!(tag_matches("rest-api", &tokenize("an api server")));
        assert!(!tag_matches("ui-kit", &tokenize("ui")));
    }

    #[test]
    fn substring_match_in_either_direction() {
        // tag inside token
        assert!(tag_matches("react", &tokenize("reactjs")));
        // token inside tag
        assert!(tag_matches("postgres", &tokenize("gres")));
        // short tags only match exactly
        assert!(!tag_matches("web", &tokenize("webapp")));
        // short tokens never substring-match
        assert!(!tag_matches("python", &tokenize("py")));
    }

    #[test]
    fn tag_counts_once() {
        let s = stack("X", &["react"], 1, 0);
        let hits = matched_tags(&s, &tokenize("react react reactjs"));
        assert_eq!(hits, ["react"]);
    }

    #[test]
    fn priority_breaks_ties() {
        let result = select("build a web app", &web_catalog(), None).unwrap();
        assert_eq!(result.selected_stack.name, "SIMPLE_WEB_APP");
        assert!(!result.fallback);
        assert_eq!(result.matched_tags, ["web"]);
        assert_eq!(result.match_reason, "matched tags: web");
        assert_eq!(result.priority, 1);
    }

    #[test]
    fn extra_tag_beats_priority() {
        let result = select("build a React app", &web_catalog(), None).unwrap();
        assert_eq!(result.selected_stack.name, "REACT_SPA");
        assert_eq!(result.matched_tags, ["react"]);
        assert!(!result.fallback);
    }

    #[test]
    fn priority_wins_regardless_of_catalog_order() {
        let catalog = vec![
            stack("SECOND", &["web", "frontend"], 2, 0),
            stack("FIRST", &["web", "frontend"], 1, 1),
        ];
        let result = select("web frontend", &catalog, None).unwrap();
        assert_eq!(result.selected_stack.name, "FIRST");
    }

    #[test]
    fn equal_priority_prefers_earlier_entry() {
        let catalog = vec![
            stack("EARLY", &["web", "api"], 3, 0),
            stack("LATE", &["web", "cli"], 3, 1),
        ];
        let result = select("web", &catalog, None).unwrap();
        assert_eq!(result.selected_stack.name, "EARLY");
    }

    #[test]
    fn unique_exact_tag_selects_stack() {
        let catalog = vec![
            stack("WEB", &["web"], 1, 0),
            stack("RUST_CLI", &["cli", "rust"], 5, 1),
        ];
        let result = select("a rust tool", &catalog, None).unwrap();
        assert_eq!(result.selected_stack.name, "RUST_CLI");
        assert!(!result.fallback);
    }

    #[test]
    fn no_match_falls_back_to_lowest_priority() {
        let catalog = vec![
            stack("A", &["web"], 3, 0),
            stack("B", &["cli"], 1, 1),
            stack("C", &["data"], 1, 2),
        ];
        let result = select("something unrelated", &catalog, None).unwrap();
        assert_eq!(result.selected_stack.name, "B");
        assert!(result.fallback);
        assert!(result.matched_tags.is_empty());
        assert_eq!(result.match_reason, FALLBACK_REASON);
    }

    #[test]
    fn selection_is_deterministic() {
        let catalog = web_catalog();
        for prompt in ["build a web app", "React frontend", "", "zzz"] {
            let first = select(prompt, &catalog, None).unwrap();
            let second = select(prompt, &catalog, None).unwrap();
            assert_eq!(first, second, "prompt: {prompt:?}");
        }
    }

    #[test]
    fn empty_catalog_fails() {
        assert!(matches!(
            select("anything", &[], None),
            Err(SpecstackError::NoStacksAvailable)
        ));
    }

    #[test]
    fn manual_override_exact_and_case_insensitive() {
        let catalog = web_catalog();
        let result = select("build a React app", &catalog, Some("SIMPLE_WEB_APP")).unwrap();
        assert_eq!(result.selected_stack.name, "SIMPLE_WEB_APP");
        assert_eq!(result.match_reason, "manually specified stack: SIMPLE_WEB_APP");
        assert!(!result.fallback);

        let result = select("", &catalog, Some("react_spa")).unwrap();
        assert_eq!(result.selected_stack.name, "REACT_SPA");
    }

    #[test]
    fn manual_override_unknown_lists_known_names() {
        let err = select("", &web_catalog(), Some("VUE")).unwrap_err();
        match err {
            SpecstackError::StackNotFound { name, known } => {
                assert_eq!(name, "VUE");
                assert_eq!(known, ["SIMPLE_WEB_APP", "REACT_SPA"]);
            }
            other => panic!("expected StackNotFound, got {other:?}"),
        }
    }

    #[test]
    fn result_serializes_snake_case() {
        let result = select("web", &web_catalog(), None).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["selected_stack"]["name"], "SIMPLE_WEB_APP");
        assert_eq!(json["fallback"], false);
    }

    const CATALOG: &str = "### SIMPLE_WEB_APP
- **Tags**: web, frontend, simple
- **Priority**: 1

### REACT_SPA
- **Tags**: web, frontend, react
- **Priority**: 2
";

    #[test]
    fn resolve_extracts_technologies() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("STACKS.md"), CATALOG).unwrap();
        std::fs::write(
            dir.path().join("REACT_SPA.md"),
            "# React\n\n## Core Technologies\n- **React** 18\n- **Vite**\n",
        )
        .unwrap();

        let result = resolve(dir.path(), "a react dashboard", None).unwrap();
        assert_eq!(result.selected_stack.name, "REACT_SPA");
        assert_eq!(result.technologies, ["React", "Vite"]);
    }

    #[test]
    fn resolve_requires_detail_document() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("STACKS.md"), CATALOG).unwrap();
        let err = resolve(dir.path(), "web", None).unwrap_err();
        assert!(matches!(
            err,
            SpecstackError::StackFileMissing { ref stack, .. } if stack == "SIMPLE_WEB_APP"
        ));
    }

    #[test]
    fn resolve_without_catalog_fails() {
        let dir = TempDir::new().unwrap();
        let err = resolve(dir.path(), "web", None).unwrap_err();
        assert!(matches!(err, SpecstackError::CatalogNotFound(_)));
    }
}
