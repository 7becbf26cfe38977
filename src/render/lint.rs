use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// One stanza: a `resource "<name>" do` line through the next line holding only `end`.
const STANZA_PATTERN: &str = r#"(?ms)^[ \t]*resource "([^"]+)" do[ \t]*$.*?^[ \t]*end[ \t]*$"#;

/// Alphabetize and tidy the `resource` stanzas found in `text`.
///
/// Everything outside the stanzas is dropped. When a resource appears more
/// than once, the last occurrence wins.
pub fn lint(text: &str) -> Result<String> {
    let stanza_regex = Regex::new(STANZA_PATTERN).context("Invalid stanza regex")?;

    let mut stanzas: BTreeMap<&str, String> = BTreeMap::new();
    for cap in stanza_regex.captures_iter(text) {
        if let (Some(stanza), Some(name)) = (cap.get(0), cap.get(1)) {
            let tidy = stanza
                .as_str()
                .lines()
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n");
            stanzas.insert(name.as_str(), tidy);
        }
    }

    Ok(stanzas.into_values().collect::<Vec<_>>().join("\n\n"))
}
