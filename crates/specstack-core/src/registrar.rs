//! Register the installed command file with AI agent CLIs.
//!
//! Each supported agent is a row in [`TARGETS`]: an identifier, which root the
//! agent reads from, and the directory it scans for prompt files. Adding an
//! agent means adding a row.

use crate::error::{Result, SpecstackError};
use crate::io;
use crate::paths::{self, Roots};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a registration target can do.
pub trait CliTarget {
    fn id(&self) -> &str;

    /// Where the command file lands for this target.
    fn registration_path(&self, roots: &Roots) -> PathBuf;

    /// Copy `source` into place, creating directories, always overwriting.
    fn register(&self, source: &Path, roots: &Roots) -> Result<PathBuf> {
        let dest = self.registration_path(roots);
        let data = std::fs::read(source)?;
        io::atomic_write(&dest, &data)?;
        tracing::debug!(agent = self.id(), path = %dest.display(), "registered command file");
        Ok(dest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Base {
    Project,
    Home,
}

/// A target that reads prompt files from a fixed directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirTarget {
    pub id: &'static str,
    pub base: Base,
    pub dir: &'static str,
}

impl CliTarget for DirTarget {
    fn id(&self) -> &str {
        self.id
    }

    fn registration_path(&self, roots: &Roots) -> PathBuf {
        let base = match self.base {
            Base::Project => &roots.project,
            Base::Home => &roots.home,
        };
        base.join(self.dir).join(paths::COMMAND_FILE_NAME)
    }
}

pub const TARGETS: &[DirTarget] = &[
    DirTarget {
        id: "claude",
        base: Base::Project,
        dir: ".claude/commands",
    },
    DirTarget {
        id: "codex",
        base: Base::Home,
        dir: ".codex/prompts",
    },
    DirTarget {
        id: "cursor",
        base: Base::Project,
        dir: ".cursor/commands",
    },
    DirTarget {
        id: "opencode",
        base: Base::Project,
        dir: ".opencode/command",
    },
];

pub fn supported_ids() -> Vec<String> {
    TARGETS.iter().map(|t| t.id.to_string()).collect()
}

pub fn lookup(id: &str) -> Result<&'static DirTarget> {
    TARGETS
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| SpecstackError::UnsupportedTarget {
            target: id.to_string(),
            supported: supported_ids(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub target: String,
    pub path: PathBuf,
}

/// Copy the installed command file into `id`'s prompt directory.
pub fn register(id: &str, roots: &Roots) -> Result<Registration> {
    let target = lookup(id)?;
    let source = paths::command_file(&roots.project);
    if !source.is_file() {
        return Err(SpecstackError::SourceMissing(source));
    }
    let path = target.register(&source, roots)?;
    Ok(Registration {
        target: target.id.to_string(),
        path,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn roots() -> (TempDir, TempDir, Roots) {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let roots = Roots::new(project.path(), home.path());
        (project, home, roots)
    }

    fn install_command(roots: &Roots, content: &str) {
        io::atomic_write(&paths::command_file(&roots.project), content.as_bytes()).unwrap();
    }

    #[test]
    fn registration_paths() {
        let roots = Roots::new("/p", "/h");
        assert_eq!(
            lookup("claude").unwrap().registration_path(&roots),
            PathBuf::from("/p/.claude/commands/yolo.md")
        );
        assert_eq!(
            lookup("codex").unwrap().registration_path(&roots),
            PathBuf::from("/h/.codex/prompts/yolo.md")
        );
    }

    #[test]
    fn target_ids_are_unique() {
        let mut ids = supported_ids();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), TARGETS.len());
    }

    #[test]
    fn register_copies_into_home_target() {
        let (_p, home, roots) = roots();
        install_command(&roots, "# yolo v1");

        let reg = register("codex", &roots).unwrap();
        assert_eq!(reg.target, "codex");
        assert_eq!(reg.path, home.path().join(".codex/prompts/yolo.md"));
        assert_eq!(std::fs::read_to_string(&reg.path).unwrap(), "# yolo v1");
    }

    #[test]
    fn register_always_overwrites() {
        let (project, _h, roots) = roots();
        install_command(&roots, "v1");
        register("claude", &roots).unwrap();
        install_command(&roots, "v2");

        let reg = register("claude", &roots).unwrap();
        assert_eq!(reg.path, project.path().join(".claude/commands/yolo.md"));
        assert_eq!(std::fs::read_to_string(&reg.path).unwrap(), "v2");
    }

    #[test]
    fn unsupported_target_lists_supported() {
        let (_p, _h, roots) = roots();
        let err = register("vim", &roots).unwrap_err();
        match err {
            SpecstackError::UnsupportedTarget { target, supported } => {
                assert_eq!(target, "vim");
                assert_eq!(supported, ["claude", "codex", "cursor", "opencode"]);
            }
            other => panic!("expected UnsupportedTarget, got {other:?}"),
        }
    }

    #[test]
    fn register_before_install_fails() {
        let (_p, _h, roots) = roots();
        let err = register("claude", &roots).unwrap_err();
        assert!(matches!(err, SpecstackError::SourceMissing(_)));
        assert!(err.is_not_found());
    }
}
