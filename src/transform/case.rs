//! Case conversions
//!
//! Character-level modes (`invert`, `title`, `sentence`, `alternate`)
//! and word-level modes (`camel`, `pascal`, `snake`, `kebab`, ...).
//! All of them except `invert` are idempotent.

/// Characters that separate words
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '_' || c == '-'
}

/// Split a name into words.
///
/// Words end at whitespace, `_` and `-`, and before an uppercase letter
/// that follows a non-uppercase character (`helloWorld`, `v2Final`,
/// `(draft)Notes`). Runs of capitals stay together (`XMLFile`).
pub fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if is_separator(c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        if c.is_uppercase() && prev.is_some_and(|p| !p.is_uppercase()) {
            words.push(std::mem::take(&mut current));
        }

        current.push(c);
        prev = Some(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// First character uppercase, the rest lowercase
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Swap the case of every letter
pub fn invert(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Uppercase the first letter of each word, lowercase the rest
pub fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if is_separator(c) {
            at_word_start = true;
            out.push(c);
        } else if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Uppercase the first letter of the name, lowercase every other letter
pub fn sentence(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut seen_letter = false;

    for c in s.chars() {
        if c.is_alphabetic() && !seen_letter {
            out.extend(c.to_uppercase());
            seen_letter = true;
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Alternate letter case, counting letters only.
///
/// `start_upper` selects `HeLlO` (swap) or `hElLo` (swapr).
pub fn alternate(s: &str, start_upper: bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper = start_upper;

    for c in s.chars() {
        if c.is_alphabetic() {
            if upper {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            upper = !upper;
        } else {
            out.push(c);
        }
    }

    out
}

/// helloWorld
pub fn camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, word) in split_words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// HelloWorld
pub fn pascal(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// helloWorld -> hello world
pub fn camel_reverse(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// HelloWorld -> Hello World
pub fn pascal_reverse(s: &str) -> String {
    split_words(s).join(" ")
}

/// hello_world
pub fn snake(s: &str) -> String {
    join_lower(s, "_")
}

/// hello-world
pub fn kebab(s: &str) -> String {
    join_lower(s, "-")
}

fn join_lower(s: &str, sep: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("helloWorld"), vec!["hello", "World"]);
        assert_eq!(split_words("Hello  big_world-now"), vec!["Hello", "big", "world", "now"]);
        assert_eq!(split_words("XMLFile"), vec!["XMLFile"]);
        assert_eq!(split_words("v2Final"), vec!["v2", "Final"]);
        assert_eq!(split_words("(draft)Notes"), vec!["(draft)", "Notes"]);
        assert!(split_words("__").is_empty());
    }

    #[test]
    fn test_title_and_sentence() {
        assert_eq!(title("the quick_brown-FOX"), "The Quick_Brown-Fox");
        assert_eq!(title("(draft) notes"), "(Draft) Notes");
        assert_eq!(sentence("hELLO World.TXT"), "Hello world.txt");
        assert_eq!(sentence("2024 report"), "2024 Report");
    }

    #[test]
    fn test_alternate() {
        assert_eq!(alternate("hello world", true), "HeLlO wOrLd");
        assert_eq!(alternate("hello world", false), "hElLo WoRlD");
    }

    #[test]
    fn test_word_modes() {
        assert_eq!(camel("Hello big World"), "helloBigWorld");
        assert_eq!(pascal("hello_big-world"), "HelloBigWorld");
        assert_eq!(snake("helloBigWorld"), "hello_big_world");
        assert_eq!(kebab("Hello Big World"), "hello-big-world");
        assert_eq!(camel_reverse("helloBigWorld"), "hello big world");
        assert_eq!(pascal_reverse("HelloBigWorld"), "Hello Big World");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("tXT"), "Txt");
        assert_eq!(capitalize(""), "");
    }
}
