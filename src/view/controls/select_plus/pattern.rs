//! Value pattern: gate for free-typed values
//!
//! A query typed into the control only becomes the value when it matches the
//! configured pattern. The match is unanchored, so `\d{1,5}` accepts `"a12"`;
//! write `^...$` in the pattern to require a full match.

use regex::Regex;

/// Pattern used when none is configured: one to five digits
pub const DEFAULT_VALUE_PATTERN: &str = r"\d{1,5}";

/// A compiled value pattern together with its source text
#[derive(Debug, Clone)]
pub struct ValuePattern {
    source: String,
    regex: Regex,
}

impl ValuePattern {
    /// Compile `source`, failing on invalid syntax
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(source).map_err(|e| PatternError {
            source: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern text as configured
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, query: &str) -> bool {
        self.regex.is_match(query)
    }

    /// The query as the new value if it matches, `None` to keep the old value
    pub fn resolve(&self, query: &str) -> Option<String> {
        if self.is_match(query) {
            Some(query.to_string())
        } else {
            None
        }
    }
}

impl Default for ValuePattern {
    fn default() -> Self {
        Self::new(DEFAULT_VALUE_PATTERN).expect("default value pattern compiles")
    }
}

impl PartialEq for ValuePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// An invalid value pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    pub source: String,
    pub message: String,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value pattern {:?}: {}", self.source, self.message)
    }
}

impl std::error::Error for PatternError {}
