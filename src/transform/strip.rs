//! Character stripping
//!
//! Each filter has a fixed policy that decides which characters survive.

/// Bracket and parenthesis characters
pub const BRACKETS: &[char] = &['(', ')', '[', ']', '{', '}'];

/// Operator symbols removed by `roperand`
pub const OPERANDS: &[char] = &['+', '-', '*', '=', '<', '>', '^', '%', '&', '|', '~', '!'];

/// Punctuation kept by `rspecial` besides alphanumerics and whitespace
pub const SPECIAL_RETAINED: &[char] = &['.', '_', '-'];

/// Character-class filter used by the stripping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharFilter {
    /// Drop `( ) [ ] { }`
    Brackets,
    /// Drop operator symbols
    Operands,
    /// Keep alphanumerics, whitespace, `. _ -` and brackets; drop the rest
    Special,
    /// Drop ASCII digits
    Numeric,
}

impl CharFilter {
    /// Whether `c` survives this filter
    pub fn keeps(&self, c: char) -> bool {
        match self {
            CharFilter::Brackets => !BRACKETS.contains(&c),
            CharFilter::Operands => !OPERANDS.contains(&c),
            CharFilter::Special => {
                c.is_alphanumeric()
                    || c.is_whitespace()
                    || SPECIAL_RETAINED.contains(&c)
                    || BRACKETS.contains(&c)
            }
            CharFilter::Numeric => !c.is_ascii_digit(),
        }
    }

    pub fn apply(&self, s: &str) -> String {
        s.chars().filter(|&c| self.keeps(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets() {
        assert_eq!(CharFilter::Brackets.apply("[2024] {a} (b)"), "2024 a b");
    }

    #[test]
    fn test_operands() {
        assert_eq!(CharFilter::Operands.apply("a+b-c*d=e<f>g"), "abcdefg");
        assert_eq!(CharFilter::Operands.apply("plain_name"), "plain_name");
    }

    #[test]
    fn test_special_keeps_retained_set() {
        assert_eq!(CharFilter::Special.apply("my-file_v1.(copy) #2@home"), "my-file_v1.(copy) 2home");
        assert_eq!(CharFilter::Special.apply("café ünïcode"), "café ünïcode");
    }

    #[test]
    fn test_numeric() {
        assert_eq!(CharFilter::Numeric.apply("IMG_0042 copy 2"), "IMG_ copy ");
    }
}
