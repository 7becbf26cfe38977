//! Homebrew text output.

mod formula;
mod lint;

pub use formula::{Formula, render_formula};
pub use lint::lint;

/// One `resource` stanza's worth of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub url: String,
    pub sha256: String,
}

/// Render a single stanza, without a trailing newline.
pub fn render_resource(resource: &Resource) -> String {
    format!(
        "  resource \"{}\" do\n    url \"{}\"\n    sha256 \"{}\"\n  end",
        resource.name, resource.url, resource.sha256
    )
}

/// Render stanzas separated by one blank line, without a trailing newline.
pub fn render_resources(resources: &[Resource]) -> String {
    resources
        .iter()
        .map(render_resource)
        .collect::<Vec<_>>()
        .join("\n\n")
}
