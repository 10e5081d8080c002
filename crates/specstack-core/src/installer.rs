//! Materialize the bundled templates into a project.
//!
//! Without `force`, only destinations that do not exist yet are written; a
//! second run against a complete install touches nothing. With `force`, the
//! managed directories are removed first and every file is written again.
//! The command file is never deleted: it is regenerated through
//! [`backup::update_command_file`] so the previous version is kept.

use crate::backup::{self, BackupRecord};
use crate::catalog::parse_catalog;
use crate::error::{Result, SpecstackError};
use crate::io;
use crate::paths;
use crate::templates::{self, TemplateSource};
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// The generated command file; rendered and backed up on overwrite.
    Command,
    Document,
    /// Marked 0755 after writing.
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Key into the template source.
    pub source: String,
    /// Destination relative to the project root.
    pub destination: String,
    pub kind: AssetKind,
    /// Missing required templates abort the install; missing optional ones are skipped.
    pub required: bool,
}

impl ManifestEntry {
    fn required(source: &str, destination: &str, kind: AssetKind) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            kind,
            required: true,
        }
    }
}

const FIXED_ENTRIES: &[(&str, &str, AssetKind)] = &[
    (
        templates::COMMAND_TEMPLATE,
        ".specstack/commands/yolo.md",
        AssetKind::Command,
    ),
    (
        templates::CATALOG_TEMPLATE,
        ".specstack/stacks/STACKS.md",
        AssetKind::Document,
    ),
    (
        "templates/spec-template.md",
        ".specstack/templates/spec-template.md",
        AssetKind::Document,
    ),
    (
        "templates/plan-template.md",
        ".specstack/templates/plan-template.md",
        AssetKind::Document,
    ),
    (
        "templates/tasks-template.md",
        ".specstack/templates/tasks-template.md",
        AssetKind::Document,
    ),
    (
        "scripts/check-prerequisites.sh",
        ".specstack/scripts/check-prerequisites.sh",
        AssetKind::Script,
    ),
    (
        "scripts/create-new-feature.sh",
        ".specstack/scripts/create-new-feature.sh",
        AssetKind::Script,
    ),
];

/// Full manifest for `source`: the fixed entries plus one optional detail
/// document per stack named in the bundled catalog.
pub fn manifest(source: &dyn TemplateSource) -> Result<Vec<ManifestEntry>> {
    let mut entries: Vec<ManifestEntry> = FIXED_ENTRIES
        .iter()
        .map(|(src, dest, kind)| ManifestEntry::required(src, dest, *kind))
        .collect();

    let catalog = source
        .get(templates::CATALOG_TEMPLATE)
        .ok_or_else(|| SpecstackError::TemplateMissing(templates::CATALOG_TEMPLATE.to_string()))?;
    for stack in parse_catalog(&String::from_utf8_lossy(&catalog))? {
        entries.push(ManifestEntry {
            source: format!("stacks/{}.md", stack.name),
            destination: format!("{}/{}.md", paths::STACKS_DIR, stack.name),
            kind: AssetKind::Document,
            required: false,
        });
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// InstallationTarget
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationTarget {
    pub source: String,
    pub destination: PathBuf,
    pub force: bool,
}

impl InstallationTarget {
    /// Overwrite iff forced or the destination does not exist yet.
    pub fn should_write(&self) -> bool {
        self.force || !self.destination.exists()
    }
}

// ---------------------------------------------------------------------------
// InstallReport
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Serialize)]
pub struct InstallReport {
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    /// Already present, left untouched.
    pub existing: Vec<PathBuf>,
    /// Optional templates not shipped in this build.
    pub missing_optional: Vec<String>,
    pub backups: Vec<BackupRecord>,
    /// Non-fatal problems, e.g. the executable bit could not be set.
    pub warnings: Vec<String>,
}

impl InstallReport {
    /// Every managed file the install wrote or found in place.
    pub fn managed_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.created
            .iter()
            .chain(self.updated.iter())
            .chain(self.existing.iter())
    }
}

// ---------------------------------------------------------------------------
// Installer
// ---------------------------------------------------------------------------

/// Sets the executable bit on an installed script.
pub type ChmodFn = fn(&Path) -> std::io::Result<()>;

pub struct Installer<'a> {
    root: &'a Path,
    source: &'a dyn TemplateSource,
    version: &'a str,
    chmod: ChmodFn,
}

impl<'a> Installer<'a> {
    pub fn new(root: &'a Path, source: &'a dyn TemplateSource) -> Self {
        Self {
            root,
            source,
            version: crate::SPECSTACK_VERSION,
            chmod: io::mark_executable,
        }
    }

    pub fn with_version(mut self, version: &'a str) -> Self {
        self.version = version;
        self
    }

    /// Replace how scripts are marked executable.
    pub fn with_chmod(mut self, chmod: ChmodFn) -> Self {
        self.chmod = chmod;
        self
    }

    pub fn install(&self, force: bool) -> Result<InstallReport> {
        let entries = manifest(self.source)?;

        // Fail before touching the filesystem if a mandatory template is absent.
        if let Some(missing) = entries
            .iter()
            .find(|e| e.required && self.source.get(&e.source).is_none())
        {
            return Err(SpecstackError::TemplateMissing(missing.source.clone()));
        }

        if force {
            for dir in paths::MANAGED_DIRS {
                if io::remove_dir_if_exists(&self.root.join(dir))? {
                    tracing::debug!(dir, "removed managed directory");
                }
            }
        }

        let mut report = InstallReport::default();
        for entry in &entries {
            let target = InstallationTarget {
                source: entry.source.clone(),
                destination: self.root.join(&entry.destination),
                force,
            };
            self.install_one(entry, &target, &mut report)?;
        }
        Ok(report)
    }

    fn install_one(
        &self,
        entry: &ManifestEntry,
        target: &InstallationTarget,
        report: &mut InstallReport,
    ) -> Result<()> {
        if !target.should_write() {
            report.existing.push(target.destination.clone());
            return Ok(());
        }

        let Some(data) = self.source.get(&target.source) else {
            if entry.required {
                return Err(SpecstackError::TemplateMissing(target.source.clone()));
            }
            tracing::warn!(template = %target.source, "optional template not bundled; skipping");
            report.missing_optional.push(target.source.clone());
            return Ok(());
        };

        let existed = target.destination.exists();
        match entry.kind {
            AssetKind::Command => {
                let rendered = templates::render_command(&String::from_utf8_lossy(&data), self.version);
                let backup = backup::update_command_file(
                    &target.destination,
                    &rendered,
                    templates::LEGACY_COMMAND_MARKER,
                )?;
                report.backups.extend(backup);
            }
            AssetKind::Document => io::atomic_write(&target.destination, &data)?,
            AssetKind::Script => {
                io::atomic_write(&target.destination, &data)?;
                if let Err(e) = (self.chmod)(&target.destination) {
                    let warning = format!(
                        "could not mark {} executable: {e}",
                        target.destination.display()
                    );
                    tracing::warn!("{warning}");
                    report.warnings.push(warning);
                }
            }
        }

        if existed {
            report.updated.push(target.destination.clone());
        } else {
            report.created.push(target.destination.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
