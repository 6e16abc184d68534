//! Date tagging
//!
//! A date token is `_YYYYMMDD` at the end of the stem (files) or of the
//! whole name (directories). Only tokens that parse as a real calendar
//! date count, so `photo_12345678.jpg` is left alone by `rdate`.

use crate::transform::split_extension;
use crate::types::EntryKind;
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// chrono format of the date token
pub const DATE_FORMAT: &str = "%Y%m%d";

static DATE_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d{8})$").expect("Invalid date token regex"));

/// Today's local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Byte offset of the `_` that starts a valid trailing date token
fn date_token_start(stem: &str) -> Option<usize> {
    let caps = DATE_TOKEN_REGEX.captures(stem)?;
    let digits = caps.get(1)?;
    NaiveDate::parse_from_str(digits.as_str(), DATE_FORMAT)
        .ok()
        .map(|_| digits.start() - 1)
}

/// True if the name already carries a valid date token
pub fn has_date(name: &str, kind: EntryKind) -> bool {
    date_token_start(split_extension(name, kind).0).is_some()
}

/// Append `_YYYYMMDD` for `date`, unless a valid token is already there
pub fn append_date_on(name: &str, kind: EntryKind, date: NaiveDate) -> String {
    let (stem, ext) = split_extension(name, kind);
    if stem.is_empty() || date_token_start(stem).is_some() {
        return name.to_string();
    }

    let stamped = format!("{stem}_{}", date.format(DATE_FORMAT));
    match ext {
        Some(ext) => format!("{stamped}.{ext}"),
        None => stamped,
    }
}

/// Remove every trailing valid `_YYYYMMDD`; no token means no change.
/// A token that would leave the stem empty stays.
pub fn strip_date(name: &str, kind: EntryKind) -> String {
    let (mut stem, ext) = split_extension(name, kind);
    let original = stem.len();
    while let Some(start) = date_token_start(stem).filter(|&start| start > 0) {
        stem = &stem[..start];
    }
    if stem.len() == original {
        return name.to_string();
    }

    match ext {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}
