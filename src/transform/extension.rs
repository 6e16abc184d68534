//! Extension handling
//!
//! The extension is whatever follows the final `.`, provided that dot is
//! neither the first nor the last character of the name. Directories
//! have no extension.

use crate::types::EntryKind;

/// Split `name` into stem and extension (without the dot)
pub fn split_extension(name: &str, kind: EntryKind) -> (&str, Option<&str>) {
    if kind.is_dir() {
        return (name, None);
    }

    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Rewrite the extension with `f`; names without one are unchanged
pub fn map_extension<F>(name: &str, kind: EntryKind, f: F) -> String
where
    F: FnOnce(&str) -> String,
{
    match split_extension(name, kind) {
        (stem, Some(ext)) => format!("{stem}.{}", f(ext)),
        _ => name.to_string(),
    }
}

/// Append `.suffix` unless the name already ends with it
pub fn append_suffix(name: &str, kind: EntryKind, suffix: &str) -> String {
    if kind.is_dir() || has_suffix(name, suffix) {
        return name.to_string();
    }
    format!("{name}.{suffix}")
}

/// Remove a trailing `.suffix` if present
pub fn remove_suffix(name: &str, kind: EntryKind, suffix: &str) -> String {
    if kind.is_dir() || !has_suffix(name, suffix) {
        return name.to_string();
    }
    name[..name.len() - suffix.len() - 1].to_string()
}

/// Drop the final extension
pub fn clear_extension(name: &str, kind: EntryKind) -> String {
    split_extension(name, kind).0.to_string()
}

/// True when the name is `<something>.suffix` with a non-empty stem
fn has_suffix(name: &str, suffix: &str) -> bool {
    matches!(split_extension(name, EntryKind::File), (_, Some(ext)) if ext == suffix)
}
