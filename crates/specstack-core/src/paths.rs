use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SPECSTACK_DIR: &str = ".specstack";
pub const COMMANDS_DIR: &str = ".specstack/commands";
pub const STACKS_DIR: &str = ".specstack/stacks";
pub const TEMPLATES_DIR: &str = ".specstack/templates";
pub const SCRIPTS_DIR: &str = ".specstack/scripts";

pub const CONFIG_FILE: &str = ".specstack/config.yaml";

pub const COMMAND_FILE_NAME: &str = "yolo.md";
pub const CATALOG_FILE_NAME: &str = "STACKS.md";

/// Installed directories a forced install wipes before rewriting.
/// The command directory is excluded so that command backups survive.
pub const MANAGED_DIRS: &[&str] = &[STACKS_DIR, TEMPLATES_DIR, SCRIPTS_DIR];

// ---------------------------------------------------------------------------
// Roots
// ---------------------------------------------------------------------------

/// The two filesystem anchors every component works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub project: PathBuf,
    pub home: PathBuf,
}

impl Roots {
    pub fn new(project: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            home: home.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn command_file(root: &Path) -> PathBuf {
    root.join(COMMANDS_DIR).join(COMMAND_FILE_NAME)
}

pub fn stacks_dir(root: &Path) -> PathBuf {
    root.join(STACKS_DIR)
}

pub fn catalog_path(root: &Path) -> PathBuf {
    stacks_dir(root).join(CATALOG_FILE_NAME)
}

/// Detail document for a stack: `<stacks dir>/<NAME>.md`.
pub fn stack_detail_path(stacks_dir: &Path, name: &str) -> PathBuf {
    stacks_dir.join(format!("{name}.md"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
