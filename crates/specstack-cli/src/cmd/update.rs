use super::init::stamp_version;
use crate::output::rel;
use crate::root;
use anyhow::Context;
use specstack_core::{
    backup,
    config::Config,
    installer::Installer,
    paths, registrar,
    templates::{self, Bundled},
    SPECSTACK_VERSION,
};
use std::path::Path;

/// `specstack update`: regenerate the command file and refresh registrations.
///
/// Requires an already-initialized project (`.specstack/config.yaml` must exist).
/// The previous command file is kept as a timestamped backup next to it.
pub fn run(root: &Path, home: Option<&Path>) -> anyhow::Result<()> {
    let mut config = Config::load(root)?;
    let previous = stamp_version(&mut config).unwrap_or_else(|| "unversioned".to_string());

    println!("Updating specstack in: {}", root.display());
    println!("  previous: {previous}  →  current: {SPECSTACK_VERSION}");

    // Regenerate the command file, keeping the old one
    let command_file = paths::command_file(root);
    let content = templates::command_file_content(&Bundled, SPECSTACK_VERSION)?;
    let backup = backup::update_command_file(
        &command_file,
        &content,
        templates::LEGACY_COMMAND_MARKER,
    )
    .with_context(|| format!("failed to regenerate {}", command_file.display()))?;
    if let Some(record) = &backup {
        println!("  backup:  {}", rel(root, &record.backup_path));
    }
    println!("  updated: {}", rel(root, &command_file));

    // Assets added in later versions, or deleted by hand
    let report = Installer::new(root, &Bundled)
        .install(false)
        .context("failed to install assets")?;
    for path in &report.created {
        println!("  created: {}", rel(root, path));
    }
    for source in &report.missing_optional {
        println!("  skipped: {source} (not bundled in this build)");
    }

    // Keep registered copies in step with the regenerated command
    if !config.targets.is_empty() {
        let roots = root::roots(root, home)?;
        println!("\nRefreshing registrations:");
        for target in &config.targets {
            match registrar::register(target, &roots) {
                Ok(reg) => println!("  {}: {}", reg.target, reg.path.display()),
                Err(e) => {
                    tracing::warn!(target_id = %target, error = %e, "registration skipped");
                    println!("  skipped: {target} ({e})");
                }
            }
        }
    }

    config.save(root).context("failed to save config.yaml")?;
    println!("\nspecstack updated to v{SPECSTACK_VERSION}.");
    Ok(())
}
