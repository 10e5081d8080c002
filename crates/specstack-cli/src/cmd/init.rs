use crate::output::rel;
use crate::root;
use anyhow::Context;
use specstack_core::{
    config::Config,
    installer::{InstallReport, Installer},
    paths, registrar,
    templates::Bundled,
    SPECSTACK_VERSION,
};
use std::path::Path;

pub fn run(root: &Path, home: Option<&Path>, force: bool, targets: &[String]) -> anyhow::Result<()> {
    // Reject unknown targets before writing anything.
    for target in targets {
        registrar::lookup(target)?;
    }

    println!("Installing specstack in: {}", root.display());
    if force {
        println!("  (force: managed directories will be rewritten)");
    }

    // 1. Templates, stacks, scripts, command file
    let report = Installer::new(root, &Bundled)
        .install(force)
        .context("failed to install assets")?;
    print_install_report(root, &report);

    // 2. Config (written if missing, or when the stamp or targets change)
    let config_existed = paths::config_path(root).exists();
    let mut config = Config::load_or_default(root).context("failed to load config.yaml")?;
    let loaded = config.clone();

    // 3. Agent registrations
    if !targets.is_empty() {
        let roots = root::roots(root, home)?;
        println!("\nRegistering command:");
        for target in targets {
            let reg = registrar::register(target, &roots)
                .with_context(|| format!("failed to register with {target}"))?;
            config.add_target(target);
            println!("  {}: {}", reg.target, reg.path.display());
        }
    }

    stamp_version(&mut config);
    if !config_existed {
        config.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else if config != loaded {
        config.save(root).context("failed to write config.yaml")?;
        println!("  updated: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    println!("\nspecstack {SPECSTACK_VERSION} installed.");
    println!("Next: specstack select \"<project description>\"");
    Ok(())
}

/// Record the running version in the config. Returns the previous value.
pub fn stamp_version(config: &mut Config) -> Option<String> {
    config
        .specstack_version
        .replace(SPECSTACK_VERSION.to_string())
}

pub fn print_install_report(root: &Path, report: &InstallReport) {
    for path in &report.created {
        println!("  created: {}", rel(root, path));
    }
    for path in &report.updated {
        println!("  updated: {}", rel(root, path));
    }
    for path in &report.existing {
        println!("  exists:  {}", rel(root, path));
    }
    for backup in &report.backups {
        println!("  backup:  {}", rel(root, &backup.backup_path));
    }
    for source in &report.missing_optional {
        println!("  skipped: {source} (not bundled in this build)");
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
}
