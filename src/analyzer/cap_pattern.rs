//! Case-pattern capture/reapplication, so a word's output casing always
//! round-trips its input casing regardless of how the dictionary stem
//! is cased.

/// The input word's letter-casing shape, captured once per `analyse`
/// call and reapplied to every candidate stem so the surface casing of
/// the input survives even though lookups are case-folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapPattern {
    Lower,
    /// First letter upper, rest lower (`"Maja"`).
    Initial,
    Upper,
    /// Anything else, e.g. `"maJA"`.
    Mixed,
}

impl CapPattern {
    pub fn of(word: &str) -> Self {
        let mut chars = word.chars().filter(|c| c.is_alphabetic());
        let Some(first) = chars.next() else {
            return CapPattern::Lower;
        };
        let rest_all_lower = word
            .chars()
            .filter(|c| c.is_alphabetic())
            .skip(1)
            .all(|c| c.is_lowercase());
        let rest_all_upper = word
            .chars()
            .filter(|c| c.is_alphabetic())
            .skip(1)
            .all(|c| c.is_uppercase());

        if first.is_uppercase() && rest_all_lower {
            CapPattern::Initial
        } else if first.is_uppercase() && rest_all_upper {
            CapPattern::Upper
        } else if first.is_lowercase() && rest_all_lower {
            CapPattern::Lower
        } else {
            CapPattern::Mixed
        }
    }

    /// Reapplies this pattern to `canonical` (which is expected to be
    /// stored lowercase in the dictionary). `Mixed` is irreproducible
    /// from a pattern alone, so it passes the string through unchanged.
    pub fn apply(self, canonical: &str) -> String {
        match self {
            CapPattern::Lower => canonical.to_string(),
            CapPattern::Upper => canonical.to_uppercase(),
            CapPattern::Initial => {
                let mut chars = canonical.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            }
            CapPattern::Mixed => canonical.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("maja", CapPattern::Lower)]
    #[test_case("Maja", CapPattern::Initial)]
    #[test_case("MAJA", CapPattern::Upper)]
    #[test_case("mAja", CapPattern::Mixed)]
    fn detects_lower_initial_upper_mixed(word: &str, expected: CapPattern) {
        assert_eq!(CapPattern::of(word), expected);
    }

    #[test_case("maja", "maja")]
    #[test_case("Maja", "Maja")]
    #[test_case("MAJA", "MAJA")]
    fn round_trips_lower_and_initial(word: &str, expected: &str) {
        assert_eq!(CapPattern::of(word).apply("maja"), expected);
    }
}
