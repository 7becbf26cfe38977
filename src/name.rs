//! Package name handling.

/// Normalize a distribution name so that case and separator variants compare equal.
///
/// Lowercases and collapses every run of `-`, `_` and `.` into a single `-`,
/// so `Foo-Bar`, `foo_bar` and `FOO.bar` all become `foo-bar`.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// Turn a dashed package name into a Ruby class name: `foo-bar_baz` -> `FooBarBaz`.
pub fn dash_to_studly(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if matches!(c, '-' | '_') {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
