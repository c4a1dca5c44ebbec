//! Tag blacklist matching.
//!
//! An entry is a whitespace-separated list of tags. Plain tags are required,
//! tags prefixed with `-` are forbidden. An entry matches a tag set when every
//! required tag is present and no forbidden tag is.

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

/// One blacklist line, e.g. `young -rating:s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistEntry {
    original: Vec<String>,
    required: Vec<String>,
    forbidden: Vec<String>,
}

impl BlacklistEntry {
    /// Parses a line of space-separated tags.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut entry = Self {
            original: Vec::new(),
            required: Vec::new(),
            forbidden: Vec::new(),
        };
        for tag in line.split_whitespace() {
            entry.original.push(tag.to_string());
            match tag.strip_prefix('-') {
                Some(negated) if !negated.is_empty() => entry.forbidden.push(negated.to_string()),
                _ => entry.required.push(tag.to_string()),
            }
        }
        entry
    }

    /// Tags that must all be present.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Tags of which none may be present.
    #[must_use]
    pub fn forbidden(&self) -> &[String] {
        &self.forbidden
    }

    /// Whether `tags` is hidden by this entry.
    #[must_use]
    pub fn matches(&self, tags: &HashSet<&str>) -> bool {
        self.required.iter().all(|t| tags.contains(t.as_str()))
            && !self.forbidden.iter().any(|t| tags.contains(t.as_str()))
    }
}

impl fmt::Display for BlacklistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original.join(" "))
    }
}

/// A set of entries; content is blacklisted if any entry matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    entries: Vec<BlacklistEntry>,
}

impl Blacklist {
    /// Builds a blacklist from one line per entry. Blank lines are skipped.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = lines
            .into_iter()
            .filter(|line| !line.as_ref().trim().is_empty())
            .map(|line| BlacklistEntry::parse(line.as_ref()))
            .collect();
        Self { entries }
    }

    /// Parses the JSON array-of-strings form used by the site's
    /// `blacklisted-tags` meta tag.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `json` is not an array of strings.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct TagLists(Vec<String>);

        let TagLists(lines) = serde_json::from_str(json)?;
        Ok(Self::from_lines(lines))
    }

    /// The parsed entries.
    #[must_use]
    pub fn entries(&self) -> &[BlacklistEntry] {
        &self.entries
    }

    /// Whether the blacklist has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry matches `tags`.
    #[must_use]
    pub fn matches<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tags: HashSet<&str> = tags.into_iter().collect();
        self.entries.iter().any(|entry| entry.matches(&tags))
    }
}
