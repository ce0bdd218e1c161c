//! Patent record type.
//!
//! Records are immutable documents produced by the external patent-search
//! client. The analytics core borrows them and never mutates or copies
//! them; all derived structures hold references back into the corpus.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single patent document.
///
/// Constructed once by the caller from a search-provider response and
/// treated as read-only afterwards. Date fields are already parsed by
/// the caller; records without any date are still valid corpus members
/// and are simply skipped by year-based bucketing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentRecord {
    /// Unique document identifier, e.g. a registration number
    pub id: String,

    /// Patent title (may be empty)
    pub title: String,

    /// Patent abstract (may be empty)
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Inventors, in document order
    #[serde(default)]
    pub authors: Vec<String>,

    /// Assignee organizations
    #[serde(default)]
    pub patent_holders: Vec<String>,

    /// Hierarchical classification codes, e.g. `G06F17/16`
    #[serde(default)]
    pub ipc_codes: Vec<String>,

    /// Date the patent was published
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,

    /// Date the application was filed, used when no publication date exists
    #[serde(default)]
    pub application_date: Option<NaiveDate>,

    /// ISO country code of the issuing office
    #[serde(default)]
    pub country: Option<String>,
}

impl PatentRecord {
    /// Create a new record with the given identifier and text fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            authors: Vec::new(),
            patent_holders: Vec::new(),
            ipc_codes: Vec::new(),
            publication_date: None,
            application_date: None,
            country: None,
        }
    }

    /// Set the authors.
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set the patent holders.
    pub fn with_patent_holders(mut self, patent_holders: Vec<String>) -> Self {
        self.patent_holders = patent_holders;
        self
    }

    /// Set the classification codes.
    pub fn with_ipc_codes(mut self, ipc_codes: Vec<String>) -> Self {
        self.ipc_codes = ipc_codes;
        self
    }

    /// Set the publication date.
    pub fn with_publication_date(mut self, date: NaiveDate) -> Self {
        self.publication_date = Some(date);
        self
    }

    /// Set the application date.
    pub fn with_application_date(mut self, date: NaiveDate) -> Self {
        self.application_date = Some(date);
        self
    }

    /// Set the country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Title and abstract joined with a single space.
    ///
    /// This is the text the feature extractor vectorizes. Either field
    /// may be empty; the result is never trimmed.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text)
    }

    /// Publication date, falling back to the application date.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.publication_date.or(self.application_date)
    }

    /// Year of the effective date, if any date is present.
    pub fn effective_year(&self) -> Option<i32> {
        self.effective_date().map(|d| d.year())
    }
}
