use crate::output::{print_json, print_table};
use anyhow::Context;
use specstack_core::{catalog::load_catalog, paths};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let stacks = load_catalog(&paths::catalog_path(root)).context("failed to read stack catalog")?;

    if json {
        return print_json(&stacks);
    }

    if stacks.is_empty() {
        println!("No stacks defined in {}.", paths::catalog_path(root).display());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = stacks
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.priority.to_string(),
                s.tags.join(", "),
                s.description.clone(),
            ]
        })
        .collect();
    print_table(&["STACK", "PRIORITY", "TAGS", "DESCRIPTION"], &rows);
    Ok(())
}
