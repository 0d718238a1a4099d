//! Boilerplate removal for extracted passages.
//!
//! A [`TextCleaner`] applies an ordered list of [`CleanRule`]s, each one a
//! regex whose matches are replaced over the whole text. The built-in list
//! targets the procedural phrasing found in Dutch parliamentary records.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref DEFAULT_CLEANER: TextCleaner =
        TextCleaner::new(&default_rules()).expect("built-in cleanup rules must compile");
}

/// A single rewrite step: every match of `pattern` is replaced by `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanRule {
    pub pattern: String,

    #[serde(default)]
    pub replacement: String,

    #[serde(default)]
    pub case_insensitive: bool,
}

impl CleanRule {
    /// Removes every match, case-sensitively.
    pub fn strip(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: String::new(),
            case_insensitive: false,
        }
    }

    /// Removes every match, ignoring case.
    pub fn strip_nocase(pattern: &str) -> Self {
        Self {
            case_insensitive: true,
            ..Self::strip(pattern)
        }
    }

    /// Replaces every match with `replacement`.
    pub fn replace(pattern: &str, replacement: &str) -> Self {
        Self {
            replacement: replacement.to_string(),
            ..Self::strip(pattern)
        }
    }

    fn compile(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.pattern)
            .case_insensitive(self.case_insensitive)
            .build()
    }
}

/// The built-in cleanup pipeline, in application order.
pub fn default_rules() -> Vec<CleanRule> {
    vec![
        // Residual markup
        CleanRule::strip(r"</?[\p{L}!?][^<>]*>"),
        // Whitespace
        CleanRule::replace(r"\s+", " "),
        CleanRule::strip(r"^\s+|\s+$"),
        // Procedural announcements
        CleanRule::strip_nocase(
            r"\(The sitting (?:was suspended|opened|closed|ended) at.*?\)",
        ),
        CleanRule::strip_nocase(r"\(Voting time ended at.*?\)"),
        CleanRule::strip_nocase(r"\((?:debat|stemming|vraag|interventie)(?::[^)]*)?\)"),
        CleanRule::strip_nocase(r"\(Het woord wordt gevoerd door:.*?\)"),
        CleanRule::strip(
            r"\(de Voorzitter(?: maakt na de toespraak van.*?| weigert in te gaan op.*?| stemt toe| herinnert eraan dat de gedragsregels moeten worden nageleefd| neemt er akte van)?\)",
        ),
        CleanRule::strip_nocase(r"\(zie bijlage.*?\)"),
        CleanRule::strip(r"\(\s*De vergadering wordt om.*?geschorst\.\)"),
        CleanRule::strip(r"\(\s*De vergadering wordt om.*?hervat\.\)"),
        CleanRule::strip(r"\(“Stemmingsuitslagen”, punt \d+\)"),
        // Citations and procedure codes
        CleanRule::strip_nocase(
            r"[(\[]\s*(?:[a-z]{2,3}\s*)?(?:artikel|rule|punt|item)\s*\d+(?:,\s*lid\s*\d+)?(?:\s+\w+)?\s*[)\]]",
        ),
        CleanRule::strip(r"\[(?:COM|A)\d+-\d+(?:/\d+)?\]"),
        CleanRule::strip(r"\(?https?://\S+?\)"),
        CleanRule::strip(r"\[\s*\d{4}/\d{4}\((?:COD|INI|RSP|IMM|NLE)\)\]"),
        CleanRule::strip(r"\[\s*\d{5}/\d{4}\s*-\s*C\d+-\d+/\d+\s*-\s*\d{4}/\d{4}\(NLE\)\]"),
        // Narrative procedure sentences
        CleanRule::strip(r"Volgens de “catch the eye”-procedure wordt het woord gevoerd door.*?\."),
        CleanRule::strip(r"Het woord wordt gevoerd door .*?\."),
        CleanRule::strip(r"De vergadering wordt om \d{1,2}\.\d{2} uur gesloten\."),
        CleanRule::strip(r"De vergadering wordt om \d{1,2}\.\d{2} uur geopend\."),
        CleanRule::strip(r"Het debat wordt gesloten\."),
        CleanRule::strip(r"Stemming:.*?\."),
        // Final whitespace
        CleanRule::replace(r"\s{2,}", " "),
        CleanRule::replace(r"\s+([.,;:!?])", "$1"),
        CleanRule::strip(r"^\s+|\s+$"),
    ]
}

/// Compiled cleanup pipeline.
///
/// [`TextCleaner::clean`] runs the rules until the text stops changing, so
/// cleaning already cleaned text is a no-op. A pass that changes the text
/// without shortening it can only normalize whitespace, which is why the
/// number of passes is bounded by twice the input length. Rules whose
/// replacement is longer than what they match can defeat this, the built-in
/// ones never do.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    rules: Vec<(Regex, String)>,
}

impl TextCleaner {
    pub fn new(rules: &[CleanRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| Ok((rule.compile()?, rule.replacement.clone())))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    pub fn clean(&self, text: &str) -> String {
        let mut current = self.apply(text);
        for _ in 0..=2 * current.len() {
            let next = self.apply(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        DEFAULT_CLEANER.clone()
    }
}
