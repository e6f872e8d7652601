/// Help listing for the command table.
use crate::registry::CommandRegistry;

pub const HELP_TITLE: &str = "Commands";

/// Render one line per registered command, in table order.
///
/// Each line is the display override (or raw pattern) followed by the
/// trimmed description.
pub fn render_help(registry: &CommandRegistry) -> String {
    let mut lines = vec![HELP_TITLE.to_string()];
    for entry in registry.entries() {
        let spec = entry.spec();
        let line = format!("{}    {}", spec.label(), spec.description.trim());
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}
