//! Backup-then-overwrite for the generated command file.
//!
//! Before a command file is regenerated its current content is copied to
//! `<stem>.<epoch>[-<n>].<ext>` next to it. Backup names are claimed with
//! create-new semantics, so an existing backup is never overwritten. Nothing
//! here prunes old backups.

use crate::error::{Result, SpecstackError};
use crate::io;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub original_path: PathBuf,
    pub backup_path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// Candidate backup path for `path` at `epoch`, with collision suffix `n` (0 = none).
pub fn backup_path(path: &Path, epoch: i64, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = if n == 0 {
        epoch.to_string()
    } else {
        format!("{epoch}-{n}")
    };
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{suffix}"),
    };
    path.with_file_name(name)
}

/// Copy `path` to the first free backup name for `now`.
/// Returns `None` when there is nothing to back up.
pub fn create_backup(path: &Path, now: DateTime<Utc>) -> Result<Option<BackupRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let epoch = now.timestamp();
    let mut n = 0u32;
    loop {
        let candidate = backup_path(path, epoch, n);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(mut dst) => {
                if let Err(e) = copy_into(path, &mut dst) {
                    drop(dst);
                    let _ = std::fs::remove_file(&candidate);
                    return Err(e.into());
                }
                tracing::debug!(backup = %candidate.display(), "backed up command file");
                return Ok(Some(BackupRecord {
                    original_path: path.to_path_buf(),
                    backup_path: candidate,
                    created_at: now,
                }));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

fn copy_into(src: &Path, dst: &mut File) -> std::io::Result<()> {
    let mut src = File::open(src)?;
    std::io::copy(&mut src, dst)?;
    dst.sync_all()
}

/// Back up `path` (if present), write `content`, then verify the written file
/// no longer contains `forbidden`.
pub fn update_command_file(
    path: &Path,
    content: &str,
    forbidden: &str,
) -> Result<Option<BackupRecord>> {
    update_command_file_at(path, content, forbidden, Utc::now())
}

pub fn update_command_file_at(
    path: &Path,
    content: &str,
    forbidden: &str,
    now: DateTime<Utc>,
) -> Result<Option<BackupRecord>> {
    let backup = create_backup(path, now)?;
    io::atomic_write(path, content.as_bytes())?;

    let written = std::fs::read_to_string(path)?;
    if !forbidden.is_empty() && written.contains(forbidden) {
        return Err(SpecstackError::ContractViolation {
            path: path.to_path_buf(),
            marker: forbidden.to_string(),
        });
    }
    Ok(backup)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
