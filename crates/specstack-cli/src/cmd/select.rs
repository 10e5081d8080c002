use crate::output::print_json;
use anyhow::Context;
use specstack_core::{config::Config, paths, selector};
use std::path::Path;

pub fn run(root: &Path, prompt: &[String], stack: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config.yaml")?;
    let manual = stack.or(config.selection.default_stack.as_deref());
    let prompt = prompt.join(" ");

    let result = selector::resolve(&paths::stacks_dir(root), &prompt, manual)
        .context("stack selection failed")?;

    if json {
        return print_json(&result);
    }

    let stack = &result.selected_stack;
    println!("Stack:    {} (priority {})", stack.name, result.priority);
    if !stack.description.is_empty() {
        println!("          {}", stack.description);
    }
    println!("Reason:   {}", result.match_reason);
    if result.technologies.is_empty() {
        println!("Tech:     (none listed)");
    } else {
        println!("Tech:     {}", result.technologies.join(", "));
    }
    println!(
        "Details:  {}",
        paths::stack_detail_path(&paths::stacks_dir(root), &stack.name).display()
    );
    Ok(())
}
