//! Analytics data types.
//!
//! Reports and clusters are created fresh per request, borrow the
//! caller's corpus where possible, and serialize directly to the wire
//! shape the presentation layer expects.

use chrono::NaiveDate;
use patent_types::PatentRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A TF-IDF document vector.
pub type FeatureVector = Vec<f32>;

/// Marker emitted when a growth rate cannot be computed.
const INSUFFICIENT_DATA: &str = "insufficient data";

/// A thematic group of patents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster<'a> {
    /// Human-readable theme label
    pub theme: String,
    /// Member records, in original corpus order
    pub members: Vec<&'a PatentRecord>,
    /// Mean cosine similarity of members to the cluster centroid
    pub cohesion: Option<f32>,
}

/// A similarity-ranked neighbor of a target patent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarPatent<'a> {
    /// The neighboring record
    pub patent: &'a PatentRecord,
    /// Cosine similarity to the target, rounded to three decimals
    pub similarity: f32,
}

/// An inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First year of the window
    pub start_year: i32,
    /// Last year of the window
    pub end_year: i32,
}

impl Period {
    /// Create a period. `end_year` must not precede `start_year`.
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    /// Number of years covered, endpoints inclusive.
    pub fn years(&self) -> u32 {
        (self.end_year - self.start_year + 1) as u32
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

/// Percentage change across an analysis window.
///
/// Serializes as a plain number, or as the string `"insufficient data"`
/// when the window holds fewer than two non-zero years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthRate {
    /// Percentage change, rounded to one decimal
    Percent(f64),
    /// Not enough non-zero years to compare
    InsufficientData,
}

impl GrowthRate {
    /// The percentage value, if one was computed.
    pub fn as_percent(&self) -> Option<f64> {
        match self {
            GrowthRate::Percent(v) => Some(*v),
            GrowthRate::InsufficientData => None,
        }
    }
}

impl std::fmt::Display for GrowthRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowthRate::Percent(v) => write!(f, "{v}%"),
            GrowthRate::InsufficientData => write!(f, "{INSUFFICIENT_DATA}"),
        }
    }
}

impl Serialize for GrowthRate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            GrowthRate::Percent(v) => serializer.serialize_f64(*v),
            GrowthRate::InsufficientData => serializer.serialize_str(INSUFFICIENT_DATA),
        }
    }
}

impl<'de> Deserialize<'de> for GrowthRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Percent(f64),
            Marker(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Percent(v) => Ok(GrowthRate::Percent(v)),
            Raw::Marker(s) if s == INSUFFICIENT_DATA => Ok(GrowthRate::InsufficientData),
            Raw::Marker(s) => Err(serde::de::Error::custom(format!(
                "unknown growth rate marker: {s}"
            ))),
        }
    }
}

/// An author and how many corpus records list them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    /// Author name as it appears in the records
    pub author: String,
    /// Occurrence count
    pub count: u64,
}

/// A classification code and how many corpus records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCount {
    /// The classification code
    pub ipc_code: String,
    /// Number of records carrying the code
    pub count: u64,
    /// Resolved description, when the code is known
    pub description: Option<String>,
}

/// Year-over-year percentage change for one window year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearGrowth {
    /// The later year of the compared pair
    pub year: i32,
    /// Percentage change from the previous year, rounded to one decimal
    pub growth: f64,
}

/// Publication-activity statistics over an analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Analysis window, endpoints inclusive
    pub period: Period,
    /// Corpus size as supplied by the caller
    pub total_patents: u64,
    /// Records whose effective year falls inside the window
    pub analyzed_patents: u64,
    /// Record count per window year, gap-free
    pub yearly_statistics: BTreeMap<i32, u64>,
    /// Change between the first and last non-zero window years
    pub growth_rate: GrowthRate,
    /// Consecutive-year changes inside the window
    pub year_over_year: Vec<YearGrowth>,
    /// Most frequent authors, count descending then name ascending
    pub top_authors: Vec<AuthorCount>,
    /// Most frequent codes, count descending then code ascending
    pub top_ipc_codes: Vec<CodeCount>,
}

/// Trend statistics for a single classification code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcTrendReport {
    /// The queried code, normalized
    pub ipc_code: String,
    /// Resolved description of the queried code
    pub description: Option<String>,
    /// Records matching the code within the corpus
    pub total_patents: u64,
    /// Analysis window, endpoints inclusive
    pub period: Period,
    /// Matching record count per window year, gap-free
    pub yearly_statistics: BTreeMap<i32, u64>,
    /// Matching records divided by window length, one decimal
    pub avg_per_year: f64,
    /// Change between the first and last non-zero window years
    pub growth_rate: GrowthRate,
    /// Newest matching records from the trailing window years
    pub recent_patents: Vec<RecentPatent>,
}

/// Owned snapshot of a record for the recent-patents list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPatent {
    /// Record identifier
    pub id: String,
    /// Record title
    pub title: String,
    /// Publication date, if the record carries one
    pub publication_date: Option<NaiveDate>,
}

/// Chart-ready projection of a [`TrendReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChartData {
    /// Yearly counts as parallel arrays in ascending year order
    pub line_chart: LineChart,
    /// Top classification codes by count
    pub pie_chart: Vec<PieSlice>,
    /// Headline figures for the summary panel
    pub trends_summary: TrendSummary,
}

/// Parallel year/count arrays for a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    /// Window years, ascending
    pub years: Vec<i32>,
    /// Record count per year, aligned with `years`
    pub patents_count: Vec<u64>,
}

/// One slice of the classification-code pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSlice {
    /// The classification code
    pub ipc_code: String,
    /// Number of records carrying the code
    pub count: u64,
}

/// Headline figures for a trend summary panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Window-wide growth rate
    pub total_growth_rate: GrowthRate,
    /// Most frequent classification code, if any
    pub top_ipc_code: Option<String>,
    /// Most frequent author, if any
    pub most_active_author: Option<String>,
}
