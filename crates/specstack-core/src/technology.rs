//! Technology extraction from a stack detail document.
//!
//! Bold spans under `## Context7 Documentation` are the technology list. When
//! that section is absent or yields nothing, `## Core Technologies` is used
//! instead. A section runs until the next level-2 heading.

use crate::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const CONTEXT7_HEADING: &str = "Context7 Documentation";
pub const CORE_TECH_HEADING: &str = "Core Technologies";

static BOLD_RE: OnceLock<Regex> = OnceLock::new();

fn bold_re() -> &'static Regex {
    BOLD_RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Outside,
    Context7,
    CoreTech,
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

/// Ordered, first-use-deduplicated technology names from `content`.
pub fn extract_technologies(content: &str) -> Vec<String> {
    let mut context7 = Vec::new();
    let mut core = Vec::new();
    let mut section = Section::Outside;

    for line in content.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            section = match heading.trim() {
                CONTEXT7_HEADING => Section::Context7,
                CORE_TECH_HEADING => Section::CoreTech,
                _ => Section::Outside,
            };
            continue;
        }
        let target = match section {
            Section::Outside => continue,
            Section::Context7 => &mut context7,
            Section::CoreTech => &mut core,
        };
        for caps in bold_re().captures_iter(line) {
            let name = caps[1].trim();
            if !name.is_empty() {
                push_unique(target, name);
            }
        }
    }

    if context7.is_empty() {
        core
    } else {
        context7
    }
}

/// Read `path` and extract its technologies.
pub fn load_technologies(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(extract_technologies(&content))
}
