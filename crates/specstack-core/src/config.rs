use crate::error::{Result, SpecstackError};
use crate::paths;
use crate::registrar;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SelectionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Used as the manual override when `select` is run without `--stack`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_stack: Option<String>,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specstack_version: Option<String>,
    /// Agent targets registered so far; `update` re-registers each of them.
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub selection: SelectionConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            project: ProjectConfig {
                name: project_name.into(),
            },
            specstack_version: None,
            targets: Vec::new(),
            selection: SelectionConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(SpecstackError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load the config, or build a default named after the root directory.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(SpecstackError::NotInitialized) => Ok(Self::new(project_name_for(root))),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Record `target` as registered. Returns true if it was new.
    pub fn add_target(&mut self, target: &str) -> bool {
        if self.targets.iter().any(|t| t == target) {
            return false;
        }
        self.targets.push(target.to_string());
        true
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for target in &self.targets {
            if registrar::lookup(target).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown target '{target}' in targets"),
                });
            }
        }

        if let Some(stack) = &self.selection.default_stack {
            if stack.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "selection.default_stack is blank".to_string(),
                });
            }
        }

        warnings
    }
}

/// Directory name of `root`, or "project".
pub fn project_name_for(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("demo");
        cfg.add_target("claude");
        cfg.selection.default_stack = Some("RUST_CLI".to_string());
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(SpecstackError::NotInitialized)
        ));
    }

    #[test]
    fn load_or_default_uses_directory_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("my-app");
        std::fs::create_dir_all(&root).unwrap();
        let cfg = Config::load_or_default(&root).unwrap();
        assert_eq!(cfg.project.name, "my-app");
        assert!(cfg.targets.is_empty());
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("project:\n  name: x\n").unwrap();
        assert_eq!(cfg.version, 1);
        assert!(cfg.targets.is_empty());
        assert!(cfg.selection.default_stack.is_none());
        assert!(cfg.specstack_version.is_none());
    }

    #[test]
    fn add_target_is_idempotent() {
        let mut cfg = Config::new("x");
        assert!(cfg.add_target("codex"));
        assert!(!cfg.add_target("codex"));
        assert_eq!(cfg.targets, ["codex"]);
    }

    #[test]
    fn validate_flags_unknown_target_and_blank_stack() {
        let mut cfg = Config::new("x");
        cfg.targets = vec!["claude".to_string(), "emacs".to_string()];
        cfg.selection.default_stack = Some("  ".to_string());
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(warnings[0].message.contains("emacs"));
        assert_eq!(warnings[1].level, WarnLevel::Error);
    }

    #[test]
    fn validate_clean_config() {
        let mut cfg = Config::new("x");
        cfg.add_target("cursor");
        assert!(cfg.validate().is_empty());
    }
}
