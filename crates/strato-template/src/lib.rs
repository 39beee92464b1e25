//! Prompt template renderer.
//!
//! Templates mix tag markup (`<green>text</green>`, `<blue,bold>...`) with
//! runtime placeholders (`{username}`, `{short_pwd}`). Rendering always
//! resolves tags first, then placeholders, so a placeholder's literal value
//! (say a directory named `<red>`) can never be re-parsed as markup.

mod placeholders;
mod tags;

pub use placeholders::{placeholder_values, substitute_placeholders};
pub use tags::resolve_tags;

use strato_config::ConfigStore;
use strato_platform::SystemProbe;

/// Render a template: tag resolution, then placeholder substitution.
pub fn render(template: &str, config: &ConfigStore, probe: &dyn SystemProbe) -> String {
    let resolved = resolve_tags(template, config);
    substitute_placeholders(&resolved, config, probe)
}
