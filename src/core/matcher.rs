//! Recognizing translation references by their configured prefix.

use regex::Regex;
use tracing::trace;

use crate::core::DottedKey;

/// Ordered set of prefixes that mark a translation reference,
/// e.g. `this._translate` and `_translate`.
///
/// The pattern is compiled once; build a new `MatchSpec` when the
/// configuration changes.
#[derive(Debug, Clone)]
pub struct MatchSpec {
    prefixes: Vec<String>,
    pattern: Option<Regex>,
}

impl MatchSpec {
    pub fn new<I, S>(prefixes: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut distinct: Vec<String> = Vec::new();
        for prefix in prefixes {
            let prefix = prefix.into();
            if !prefix.is_empty() && !distinct.contains(&prefix) {
                distinct.push(prefix);
            }
        }

        let pattern = if distinct.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = distinct.iter().map(|p| regex::escape(p)).collect();
            Some(Regex::new(&format!(
                r"^(?:{})(?:\.[A-Za-z0-9_]+)*$",
                alternatives.join("|")
            ))?)
        };

        Ok(Self {
            prefixes: distinct,
            pattern,
        })
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Whether `text` is a prefix followed by zero or more `.segment` parts.
    pub fn is_reference(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Strip the recognized prefix from `span` and return the remaining key.
    ///
    /// The first prefix in configured order that the text equals, or starts
    /// with followed by `.`, wins.
    pub fn extract_key(&self, span: &str) -> Option<DottedKey> {
        let text = trim_quotes(span);
        if !self.is_reference(text) {
            trace!(text, "not a translation reference");
            return None;
        }

        self.prefixes.iter().find_map(|prefix| {
            let rest = text.strip_prefix(prefix.as_str())?;
            if rest.is_empty() {
                Some(DottedKey::root())
            } else {
                rest.strip_prefix('.').map(DottedKey::new)
            }
        })
    }
}

/// Remove one layer of matching `'` or `"` around `text`.
pub fn trim_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
