//! Parsers for core metadata (`METADATA`/`PKG-INFO`) and `requires.txt`.

use anyhow::{Result, anyhow};

use super::InstalledDistribution;

/// Parse an email-header style core metadata document.
///
/// Only the header block is read; the long description after the first
/// blank line is ignored.
pub fn parse_metadata(content: &str) -> Result<InstalledDistribution> {
    let mut dist = InstalledDistribution::default();
    let mut name = None;
    let mut version = None;
    let mut project_homepage = None;

    for (key, value) in headers(content) {
        match key.to_ascii_lowercase().as_str() {
            "name" => name = Some(value),
            "version" => version = Some(value),
            "summary" => dist.summary = Some(value).filter(|s| !s.is_empty() && s != "UNKNOWN"),
            "home-page" => {
                dist.homepage = Some(value).filter(|s| !s.is_empty() && s != "UNKNOWN")
            }
            "project-url" => {
                // "Homepage, https://example.org"
                if let Some((label, url)) = value.split_once(',') {
                    if label.trim().eq_ignore_ascii_case("homepage") {
                        project_homepage = Some(url.trim().to_string());
                    }
                }
            }
            "requires-dist" => {
                if let Some(req) = parse_requirement(&value) {
                    dist.requires.push(req);
                }
            }
            _ => {}
        }
    }

    dist.name = name.ok_or_else(|| anyhow!("missing Name field"))?;
    dist.version = version.ok_or_else(|| anyhow!("missing Version field"))?;
    if dist.homepage.is_none() {
        dist.homepage = project_homepage;
    }
    Ok(dist)
}

/// Header fields in order, with continuation lines folded in.
fn headers(content: &str) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }
        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = fields.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            fields.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    fields
}

/// Extract the project name from a requirement line.
///
/// Returns `None` for requirements that only apply when an extra is
/// requested (`foo; extra == "socks"`), and for blank or comment lines.
/// Other environment markers are not evaluated.
pub fn parse_requirement(line: &str) -> Option<String> {
    let line = line.split('#').next().unwrap_or("").trim();
    let (spec, marker) = match line.split_once(';') {
        Some((spec, marker)) => (spec, Some(marker)),
        None => (line, None),
    };

    if marker.is_some_and(mentions_extra) {
        return None;
    }

    let name: String = spec
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if name.is_empty() { None } else { Some(name) }
}

fn mentions_extra(marker: &str) -> bool {
    marker
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|token| token == "extra")
}

/// Parse a setuptools `requires.txt`.
///
/// Lines before the first section header are unconditional. `[name]` and
/// `[name:marker]` sections belong to extras and are skipped; `[:marker]`
/// sections are environment-conditional and kept.
pub fn parse_requires_txt(content: &str) -> Vec<String> {
    let mut requires = Vec::new();
    let mut in_extra = false;

    for line in content.lines() {
        let line = line.trim();
        if let Some(section) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            in_extra = !section.starts_with(':');
            continue;
        }
        if in_extra {
            continue;
        }
        if let Some(req) = parse_requirement(line) {
            requires.push(req);
        }
    }

    requires
}
