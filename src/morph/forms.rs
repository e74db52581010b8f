use allocative::Allocative;
use serde::{Deserialize, Serialize};
use smallstr::SmallString;

/// Bytes reserved inline for a stem/lemma before it spills to the heap.
/// Sized experimentally to the common case rather than the worst case.
pub const SMALLSTEM: usize = 16;
/// Bytes reserved inline for an ending or suffix string.
pub const SMALLENDING: usize = 8;
/// Bytes reserved inline for a form-feature string (`"sg n"`, `"ma"`, ...).
pub const SMALLFORM: usize = 8;

pub type Stem = SmallString<[u8; SMALLSTEM]>;
pub type Ending = SmallString<[u8; SMALLENDING]>;
pub type FormName = SmallString<[u8; SMALLFORM]>;

/// One character of a POS-class string.
///
/// Letters follow the Filosoft/vabamorf convention the `original_source/`
/// lexicon was compiled with; kept as an exhaustive enum (rather than a
/// bare `char`) so unknown letters are caught at load time as
/// `LexiconError::Corrupt` instead of silently round-tripping.
#[rustfmt::skip]
#[derive(Debug, derive_more::Display, Copy, Clone, Deserialize, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, Allocative)]
pub enum PartOfSpeech {
    /// Nimisõna (noun)
    #[display(fmt = "S")]
    Noun,
    /// Pärisnimi (proper noun)
    #[display(fmt = "H")]
    ProperNoun,
    /// Omadussõna (adjective)
    #[display(fmt = "A")]
    Adjective,
    /// Omadussõna, keskvõrre (comparative)
    #[display(fmt = "C")]
    Comparative,
    /// Omadussõna, ülivõrre (superlative)
    #[display(fmt = "U")]
    Superlative,
    /// Põhiarvsõna (cardinal numeral)
    #[display(fmt = "N")]
    CardinalNumeral,
    /// Järgarvsõna (ordinal numeral)
    #[display(fmt = "O")]
    OrdinalNumeral,
    /// Asesõna (pronoun)
    #[display(fmt = "P")]
    Pronoun,
    /// Tegusõna (verb)
    #[display(fmt = "V")]
    Verb,
    /// Määrsõna (adverb)
    #[display(fmt = "D")]
    Adverb,
    /// Kaassõna (adposition)
    #[display(fmt = "K")]
    Adposition,
    /// Sidesõna (conjunction)
    #[display(fmt = "J")]
    Conjunction,
    /// Hüüdsõna (interjection)
    #[display(fmt = "I")]
    Interjection,
    /// Lühend (abbreviation)
    #[display(fmt = "Y")]
    Abbreviation,
    /// Erisõna / muu (foreign / other)
    #[display(fmt = "X")]
    Other,
    /// Lausemärk (punctuation)
    #[display(fmt = "Z")]
    Punctuation,
    /// Rooma number
    #[display(fmt = "G")]
    RomanNumeral,
}

impl PartOfSpeech {
    /// The single character this variant was encoded as in the POS-class
    /// string pool.
    pub fn as_char(self) -> char {
        match self {
            PartOfSpeech::Noun => 'S',
            PartOfSpeech::ProperNoun => 'H',
            PartOfSpeech::Adjective => 'A',
            PartOfSpeech::Comparative => 'C',
            PartOfSpeech::Superlative => 'U',
            PartOfSpeech::CardinalNumeral => 'N',
            PartOfSpeech::OrdinalNumeral => 'O',
            PartOfSpeech::Pronoun => 'P',
            PartOfSpeech::Verb => 'V',
            PartOfSpeech::Adverb => 'D',
            PartOfSpeech::Adposition => 'K',
            PartOfSpeech::Conjunction => 'J',
            PartOfSpeech::Interjection => 'I',
            PartOfSpeech::Abbreviation => 'Y',
            PartOfSpeech::Other => 'X',
            PartOfSpeech::Punctuation => 'Z',
            PartOfSpeech::RomanNumeral => 'G',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'S' => PartOfSpeech::Noun,
            'H' => PartOfSpeech::ProperNoun,
            'A' => PartOfSpeech::Adjective,
            'C' => PartOfSpeech::Comparative,
            'U' => PartOfSpeech::Superlative,
            'N' => PartOfSpeech::CardinalNumeral,
            'O' => PartOfSpeech::OrdinalNumeral,
            'P' => PartOfSpeech::Pronoun,
            'V' => PartOfSpeech::Verb,
            'D' => PartOfSpeech::Adverb,
            'K' => PartOfSpeech::Adposition,
            'J' => PartOfSpeech::Conjunction,
            'I' => PartOfSpeech::Interjection,
            'Y' => PartOfSpeech::Abbreviation,
            'X' => PartOfSpeech::Other,
            'Z' => PartOfSpeech::Punctuation,
            'G' => PartOfSpeech::RomanNumeral,
            _ => return None,
        })
    }
}

/// A decoded POS-class string: one reading per homonym, in on-disk order
/// (the number of homonyms equals the length of the POS-class string).
#[derive(Debug, Clone, PartialEq, Eq, Allocative)]
pub struct PosClass(pub Vec<PartOfSpeech>);

impl PosClass {
    pub fn parse(s: &str) -> Result<Self, char> {
        let mut out = Vec::with_capacity(s.chars().count());
        for c in s.chars() {
            out.push(PartOfSpeech::from_char(c).ok_or(c)?);
        }
        Ok(PosClass(out))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `(stem, ending, clitic, pos-char, form-string)`.
///
/// This is the minimal grammatical label attached to one reading; the
/// full `Analysis` (in `analyzer`) wraps this with the actual surface
/// decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GrammaticalTag {
    pub pos: char,
    pub form: FormName,
}

impl std::fmt::Display for GrammaticalTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.pos, self.form)
    }
}

impl GrammaticalTag {
    pub fn new(pos: char, form: impl Into<FormName>) -> Self {
        Self {
            pos,
            form: form.into(),
        }
    }
}
