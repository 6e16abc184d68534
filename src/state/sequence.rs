//! Sequence numbering
//!
//! A numbered name is `NNN_<base>`: a run of digits, an underscore and
//! the original name. Numbers are zero padded to [`SEQUENCE_WIDTH`]
//! digits; larger numbers simply print wider.

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Minimum digits in a sequence prefix
pub const SEQUENCE_WIDTH: usize = 3;

static SEQUENCE_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)_").expect("Invalid sequence prefix regex"));

static SEQUENCE_PREFIXES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]+_)+").expect("Invalid sequence prefixes regex"));

/// True if the name starts with ASCII digits followed by `_`
pub fn is_numbered(name: &str) -> bool {
    SEQUENCE_PREFIX_REGEX.is_match(name)
}

/// Numeric prefix of an already numbered name; `None` also when the
/// prefix does not fit in a `u64`
pub fn sequence_prefix(name: &str) -> Option<u64> {
    SEQUENCE_PREFIX_REGEX
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Remove every leading `NNN_`; names without one are returned as-is
pub fn strip_sequence(name: &str) -> &str {
    match SEQUENCE_PREFIXES_REGEX.find(name) {
        Some(m) => &name[m.end()..],
        None => name,
    }
}

/// `7`, `"a.txt"` -> `"007_a.txt"`
pub fn format_sequence(number: u64, base: &str) -> String {
    format!("{number:0width$}_{base}", width = SEQUENCE_WIDTH)
}

/// Lowest positive integer not in `used`
pub fn first_gap(used: &BTreeSet<u64>) -> u64 {
    let mut candidate = 1;
    for &n in used.range(1..) {
        if n == candidate {
            candidate += 1;
        } else if n > candidate {
            break;
        }
    }
    candidate
}

/// Compute a full renumbering of one sibling set.
///
/// Names are ordered by base name (prefix stripped), ties broken by the
/// full name, and paired with `NNN_<base>` for their 1-based position.
/// Pairs whose name is already correct come back unchanged, so a set
/// that is already numbered `1..N` in order yields only no-ops.
pub fn plan_renumber(names: &[String]) -> Vec<(String, String)> {
    let mut ordered: Vec<(&str, &str)> = names
        .iter()
        .map(|name| (strip_sequence(name), name.as_str()))
        .collect();
    ordered.sort_unstable();

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (base, name))| (name.to_string(), format_sequence(i as u64 + 1, base)))
        .collect()
}

/// Numbering state for one sibling set of one parent directory
#[derive(Debug)]
pub struct DirectoryCounterState {
    /// Base names numbered during this run
    assigned: HashMap<String, u64>,

    /// Every number in use, pre-existing or assigned
    used: BTreeSet<u64>,

    /// Lowest unused positive integer
    gap: u64,

    /// Whether a full renumbering has already been planned
    renumbered: bool,
}

impl Default for DirectoryCounterState {
    fn default() -> Self {
        Self::from_siblings(std::iter::empty())
    }
}

impl DirectoryCounterState {
    /// Build the state from the names present when the directory was first seen
    pub fn from_siblings<'a, I>(siblings: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let used: BTreeSet<u64> = siblings.into_iter().filter_map(sequence_prefix).collect();
        let gap = first_gap(&used);

        Self {
            assigned: HashMap::new(),
            used,
            gap,
            renumbered: false,
        }
    }

    /// The number the next assignment will receive
    pub fn gap(&self) -> u64 {
        self.gap
    }

    /// Number `raw_name` with the next free number.
    ///
    /// Already numbered names come back unchanged. Asking twice for the
    /// same name returns the same number.
    pub fn assign(&mut self, raw_name: &str) -> String {
        if is_numbered(raw_name) {
            return raw_name.to_string();
        }

        let number = match self.assigned.get(raw_name) {
            Some(&n) => n,
            None => {
                let n = self.take_gap();
                self.assigned.insert(raw_name.to_string(), n);
                n
            }
        };

        format_sequence(number, raw_name)
    }

    /// Claim the full renumbering of this set; true only the first time
    pub fn claim_renumber(&mut self) -> bool {
        !std::mem::replace(&mut self.renumbered, true)
    }

    fn take_gap(&mut self) -> u64 {
        let n = self.gap;
        self.used.insert(n);
        while self.used.contains(&self.gap) {
            self.gap += 1;
        }
        n
    }
}
