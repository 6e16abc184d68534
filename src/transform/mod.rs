//! Name transformations
//!
//! Maps a single entry name to its new name for the selected
//! [`Transformation`]. Every function here is pure: it looks at the name
//! and the entry kind only. The two modes that depend on more than the
//! name (sequence numbering and the run date) are resolved through
//! [`crate::state::NameStateStore`].
//!
//! Extension handling:
//! - Character-level case modes (`lower`, `upper`, `title`, ...) see the
//!   full name, extension included.
//! - Word-joining and stripping modes (`camel`, `snake`, `rnumeric`, ...)
//!   only see the stem; the extension is reattached untouched.
//! - Extension modes only see the extension and leave directories alone.

pub mod case;
pub mod extension;
pub mod strip;

use crate::state::{date, sequence};
use crate::types::EntryKind;
use clap::ValueEnum;
use std::fmt;

pub use extension::split_extension;
pub use strip::CharFilter;

/// Suffix used by the `bak`/`rbak` modes
pub const BACKUP_SUFFIX: &str = "bak";

/// The selected name-rewriting rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Transformation {
    /// lowercase
    Lower,
    /// UPPERCASE
    Upper,
    /// iNVERT the case of every letter
    Reverse,
    /// Title Case Per Word
    Title,
    /// Sentence case
    Sentence,
    /// AlTeRnAtInG case starting upper
    Swap,
    /// aLtErNaTiNg case starting lower
    #[value(name = "swapr")]
    SwapReverse,
    /// camelCase
    Camel,
    /// camelCase back to space separated lowercase words
    #[value(name = "rcamel")]
    CamelReverse,
    /// PascalCase
    Pascal,
    /// PascalCase back to space separated words
    #[value(name = "rpascal")]
    PascalReverse,
    /// snake_case
    Snake,
    /// underscores to spaces
    #[value(name = "rsnake")]
    SnakeReverse,
    /// kebab-case
    Kebab,
    /// hyphens to spaces
    #[value(name = "rkebab")]
    KebabReverse,
    /// remove ( ) [ ] { }
    #[value(name = "rbra")]
    StripBrackets,
    /// remove operator symbols
    #[value(name = "roperand")]
    StripOperands,
    /// remove special characters
    #[value(name = "rspecial")]
    StripSpecial,
    /// remove digits
    #[value(name = "rnumeric")]
    StripNumeric,
    /// 001_ style numbering of siblings
    Sequence,
    /// remove numbering
    #[value(name = "rsequence")]
    SequenceReverse,
    /// append _YYYYMMDD
    #[value(name = "date")]
    DateAppend,
    /// remove _YYYYMMDD
    #[value(name = "rdate")]
    DateRemove,
    /// lowercase extension
    ExtLower,
    /// UPPERCASE extension
    ExtUpper,
    /// invert extension case
    ExtReverse,
    /// Title case extension
    ExtTitle,
    /// append .bak
    #[value(name = "bak")]
    ExtAppendSuffix,
    /// remove .bak
    #[value(name = "rbak")]
    ExtRemoveSuffix,
    /// drop the extension
    #[value(name = "noext")]
    ExtClear,
}

impl Transformation {
    /// Modes whose output depends on more than the single name
    pub fn is_stateful(&self) -> bool {
        matches!(self, Transformation::Sequence | Transformation::DateAppend)
    }

    /// Modes that only touch the extension (and never directories)
    pub fn targets_extension(&self) -> bool {
        matches!(
            self,
            Transformation::ExtLower
                | Transformation::ExtUpper
                | Transformation::ExtReverse
                | Transformation::ExtTitle
                | Transformation::ExtAppendSuffix
                | Transformation::ExtRemoveSuffix
                | Transformation::ExtClear
        )
    }

    /// The name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Transformation::Lower => "lower",
            Transformation::Upper => "upper",
            Transformation::Reverse => "reverse",
            Transformation::Title => "title",
            Transformation::Sentence => "sentence",
            Transformation::Swap => "swap",
            Transformation::SwapReverse => "swapr",
            Transformation::Camel => "camel",
            Transformation::CamelReverse => "rcamel",
            Transformation::Pascal => "pascal",
            Transformation::PascalReverse => "rpascal",
            Transformation::Snake => "snake",
            Transformation::SnakeReverse => "rsnake",
            Transformation::Kebab => "kebab",
            Transformation::KebabReverse => "rkebab",
            Transformation::StripBrackets => "rbra",
            Transformation::StripOperands => "roperand",
            Transformation::StripSpecial => "rspecial",
            Transformation::StripNumeric => "rnumeric",
            Transformation::Sequence => "sequence",
            Transformation::SequenceReverse => "rsequence",
            Transformation::DateAppend => "date",
            Transformation::DateRemove => "rdate",
            Transformation::ExtLower => "ext-lower",
            Transformation::ExtUpper => "ext-upper",
            Transformation::ExtReverse => "ext-reverse",
            Transformation::ExtTitle => "ext-title",
            Transformation::ExtAppendSuffix => "bak",
            Transformation::ExtRemoveSuffix => "rbak",
            Transformation::ExtClear => "noext",
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transform a single name.
///
/// `Sequence` needs the sibling set and is returned unchanged here; the
/// walker resolves it through the state store. `DateAppend` uses today's
/// local date; the engine goes through the store instead so every entry
/// of a run gets the same date.
///
/// An empty input, or an output that would be empty, yields the input.
pub fn transform(name: &str, kind: EntryKind, mode: Transformation) -> String {
    if name.is_empty() {
        return String::new();
    }

    let out = match mode {
        Transformation::Lower => name.to_lowercase(),
        Transformation::Upper => name.to_uppercase(),
        Transformation::Reverse => case::invert(name),
        Transformation::Title => case::title(name),
        Transformation::Sentence => case::sentence(name),
        Transformation::Swap => case::alternate(name, true),
        Transformation::SwapReverse => case::alternate(name, false),
        Transformation::Camel => on_stem(name, kind, case::camel),
        Transformation::CamelReverse => on_stem(name, kind, case::camel_reverse),
        Transformation::Pascal => on_stem(name, kind, case::pascal),
        Transformation::PascalReverse => on_stem(name, kind, case::pascal_reverse),
        Transformation::Snake => on_stem(name, kind, case::snake),
        Transformation::SnakeReverse => on_stem(name, kind, |s| s.replace('_', " ")),
        Transformation::Kebab => on_stem(name, kind, case::kebab),
        Transformation::KebabReverse => on_stem(name, kind, |s| s.replace('-', " ")),
        Transformation::StripBrackets => on_stem(name, kind, |s| CharFilter::Brackets.apply(s)),
        Transformation::StripOperands => on_stem(name, kind, |s| CharFilter::Operands.apply(s)),
        Transformation::StripSpecial => on_stem(name, kind, |s| CharFilter::Special.apply(s)),
        Transformation::StripNumeric => on_stem(name, kind, |s| CharFilter::Numeric.apply(s)),
        Transformation::Sequence => name.to_string(),
        Transformation::SequenceReverse => sequence::strip_sequence(name).to_string(),
        Transformation::DateAppend => date::append_date_on(name, kind, date::today()),
        Transformation::DateRemove => date::strip_date(name, kind),
        Transformation::ExtLower => extension::map_extension(name, kind, |e| e.to_lowercase()),
        Transformation::ExtUpper => extension::map_extension(name, kind, |e| e.to_uppercase()),
        Transformation::ExtReverse => extension::map_extension(name, kind, case::invert),
        Transformation::ExtTitle => extension::map_extension(name, kind, case::capitalize),
        Transformation::ExtAppendSuffix => extension::append_suffix(name, kind, BACKUP_SUFFIX),
        Transformation::ExtRemoveSuffix => extension::remove_suffix(name, kind, BACKUP_SUFFIX),
        Transformation::ExtClear => extension::clear_extension(name, kind),
    };

    if out.is_empty() {
        name.to_string()
    } else {
        out
    }
}

/// Apply `f` to the stem only and reattach the extension.
///
/// An empty stem result keeps the original name so a file never turns
/// into a bare `.ext` dotfile.
fn on_stem<F>(name: &str, kind: EntryKind, f: F) -> String
where
    F: FnOnce(&str) -> String,
{
    match split_extension(name, kind) {
        (stem, Some(ext)) => {
            let new_stem = f(stem);
            if new_stem.is_empty() {
                name.to_string()
            } else {
                format!("{new_stem}.{ext}")
            }
        }
        (stem, None) => f(stem),
    }
}
