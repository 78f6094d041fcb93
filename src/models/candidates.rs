//! Candidate base-URL list

use serde::{Deserialize, Serialize};
use std::fmt;

/// On-disk shape of the candidate list: `{ "baseUrls": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CandidateFile {
    #[serde(rename = "baseUrls", default)]
    base_urls: Vec<String>,
}

/// Ordered, duplicate-free list of candidate base URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CandidateFile", into = "CandidateFile")]
pub struct CandidateList {
    urls: Vec<String>,
}

impl From<CandidateFile> for CandidateList {
    fn from(file: CandidateFile) -> Self {
        Self::from_urls(file.base_urls)
    }
}

impl From<CandidateList> for CandidateFile {
    fn from(list: CandidateList) -> Self {
        Self { base_urls: list.urls }
    }
}

/// Split a raw argument into URL tokens.
///
/// Commas, semicolons and any whitespace separate tokens; empty tokens are dropped.
pub fn split_url_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl CandidateList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from existing entries, keeping the first of any duplicates
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for url in urls {
            let url = url.into();
            if !url.is_empty() && !list.contains(&url) {
                list.urls.push(url);
            }
        }
        list
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|existing| existing == url)
    }

    /// Append every token of every raw argument that is not yet present
    pub fn add<I, S>(&mut self, raw_args: I) -> AddReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = AddReport::default();

        for raw in raw_args {
            for token in split_url_tokens(raw.as_ref()) {
                if self.contains(token) {
                    report.duplicates.push(token.to_string());
                } else {
                    self.urls.push(token.to_string());
                    report.added.push(token.to_string());
                }
            }
        }

        report
    }

    /// Remove the first exact match. Returns false if the URL was not present.
    pub fn remove(&mut self, url: &str) -> bool {
        match self.urls.iter().position(|existing| existing == url) {
            Some(index) => {
                self.urls.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empty the list, returning how many entries were dropped
    pub fn clear(&mut self) -> usize {
        let removed = self.urls.len();
        self.urls.clear();
        removed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.urls.iter()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

/// Outcome of an add operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    /// Tokens appended to the list, in order
    pub added: Vec<String>,
    /// Tokens skipped because they were already present
    pub duplicates: Vec<String>,
}

impl AddReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// True when nothing new was appended
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
    }
}

impl fmt::Display for AddReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} added", self.added.len())?;
        if !self.added.is_empty() {
            write!(f, " ({})", self.added.join(", "))?;
        }
        if !self.duplicates.is_empty() {
            write!(
                f,
                ", {} duplicate ({})",
                self.duplicates.len(),
                self.duplicates.join(", ")
            )?;
        }
        Ok(())
    }
}
