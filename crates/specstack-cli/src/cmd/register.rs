use crate::output::print_json;
use crate::root;
use anyhow::Context;
use specstack_core::{config::Config, registrar};
use std::path::Path;

pub fn run(root: &Path, home: Option<&Path>, target: &str, json: bool) -> anyhow::Result<()> {
    let roots = root::roots(root, home)?;
    let reg = registrar::register(target, &roots)?;

    let mut config = Config::load_or_default(root).context("failed to load config.yaml")?;
    if config.add_target(&reg.target) {
        config.save(root).context("failed to save config.yaml")?;
    }

    if json {
        print_json(&reg)?;
    } else {
        println!("Registered with {}: {}", reg.target, reg.path.display());
    }
    Ok(())
}
