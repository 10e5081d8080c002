use crate::error::{Result, SpecstackError};
use rust_embed::Embed;
use std::borrow::Cow;
use std::collections::HashMap;

/// Placeholder in the command template replaced with the crate version.
pub const VERSION_PLACEHOLDER: &str = "{{SPECSTACK_VERSION}}";

/// Legacy interactive step that must never reappear in a generated command file.
pub const LEGACY_COMMAND_MARKER: &str = "AWAIT_STACK_CONFIRMATION";

// Template keys, relative to the bundled `templates/` folder.
pub const COMMAND_TEMPLATE: &str = "commands/yolo.md";
pub const CATALOG_TEMPLATE: &str = "stacks/STACKS.md";

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct BundledAssets;

/// Somewhere template bytes come from, keyed by slash-separated relative path.
pub trait TemplateSource {
    fn get(&self, key: &str) -> Option<Cow<'static, [u8]>>;
}

/// Templates compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bundled;

impl TemplateSource for Bundled {
    fn get(&self, key: &str) -> Option<Cow<'static, [u8]>> {
        <BundledAssets as Embed>::get(key).map(|file| file.data)
    }
}

impl TemplateSource for HashMap<String, Vec<u8>> {
    fn get(&self, key: &str) -> Option<Cow<'static, [u8]>> {
        HashMap::get(self, key).map(|data| Cow::Owned(data.clone()))
    }
}

/// Render the command file from its template.
pub fn render_command(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

/// Render the command file from `source`'s command template.
pub fn command_file_content(source: &dyn TemplateSource, version: &str) -> Result<String> {
    let data = source
        .get(COMMAND_TEMPLATE)
        .ok_or_else(|| SpecstackError::TemplateMissing(COMMAND_TEMPLATE.to_string()))?;
    Ok(render_command(&String::from_utf8_lossy(&data), version))
}
