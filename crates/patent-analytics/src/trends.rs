//! Publication trend aggregation.
//!
//! Computes time-series and ranking statistics over a patent corpus:
//! gap-free yearly counts across an analysis window, ranked authors and
//! classification codes, endpoint growth rates, per-code drill-downs and
//! a chart-ready projection. Every report is a plain value built fresh
//! per call; nothing is cached between corpora.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate, Utc};
use patent_types::PatentRecord;
use tracing::{debug, instrument};

use crate::config::{AnalyticsConfig, TrendConfig};
use crate::error::AnalyticsError;
use crate::ipc;
use crate::types::{
    AuthorCount, CodeCount, GrowthRate, IpcTrendReport, LineChart, Period, PieSlice, RecentPatent,
    TrendChartData, TrendReport, TrendSummary, YearGrowth,
};

/// Trend aggregator over a caller-supplied corpus.
///
/// Stateless between calls: every report is recomputed from its input,
/// so concurrent requests never interfere. An empty corpus is not an
/// error here, unlike clustering; it aggregates to a degenerate report
/// with zero counts, since "nothing published" is a valid answer.
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    /// Create an analyzer from the master configuration.
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            config: config.trends.clone(),
        }
    }

    /// Aggregate publication activity over the trailing window.
    ///
    /// The window ends at the latest effective year in the corpus and
    /// spans `period_years` back from it, endpoints inclusive. A corpus
    /// without any dated record anchors on the current wall-clock year
    /// instead.
    ///
    /// # Errors
    /// Returns [`AnalyticsError::InvalidPeriod`] when `period_years` is
    /// zero.
    pub fn aggregate(
        &self,
        corpus: &[PatentRecord],
        period_years: u32,
    ) -> Result<TrendReport, AnalyticsError> {
        self.aggregate_at(corpus, period_years, Utc::now().year())
    }

    /// Aggregate with an explicit reference year.
    ///
    /// `reference_year` anchors the window only when no record carries a
    /// date; a corpus with dates always anchors on its own latest year.
    /// [`aggregate`](Self::aggregate) passes the current year here.
    ///
    /// # Errors
    /// Returns [`AnalyticsError::InvalidPeriod`] when `period_years` is
    /// zero.
    #[instrument(skip(self, corpus), fields(records = corpus.len()))]
    pub fn aggregate_at(
        &self,
        corpus: &[PatentRecord],
        period_years: u32,
        reference_year: i32,
    ) -> Result<TrendReport, AnalyticsError> {
        if period_years == 0 {
            return Err(AnalyticsError::InvalidPeriod(period_years));
        }

        let period = analysis_window(corpus.iter(), period_years, reference_year);
        let yearly_statistics = yearly_counts(corpus.iter(), period);
        let analyzed_patents = yearly_statistics.values().sum();
        let growth_rate = endpoint_growth(&yearly_statistics);
        let year_over_year = year_over_year(&yearly_statistics);

        let report = TrendReport {
            period,
            total_patents: corpus.len() as u64,
            analyzed_patents,
            yearly_statistics,
            growth_rate,
            year_over_year,
            top_authors: top_authors(corpus, self.config.top_entries),
            top_ipc_codes: top_codes(corpus, self.config.top_entries),
        };

        debug!(
            period = %report.period,
            analyzed = report.analyzed_patents,
            growth = %report.growth_rate,
            "Aggregated corpus trends"
        );

        Ok(report)
    }

    /// Aggregate activity for a single classification code.
    ///
    /// A record matches when any of its codes equals or extends the
    /// normalized query, so `G06F` covers `G06F17/16`. The window
    /// anchors on the latest matching year, falling back to the current
    /// wall-clock year.
    ///
    /// # Errors
    /// Returns [`AnalyticsError::InvalidPeriod`] when `period_years` is
    /// zero. A code that matches nothing is not an error; the report is
    /// simply zero-filled.
    pub fn aggregate_by_code(
        &self,
        corpus: &[PatentRecord],
        code: &str,
        period_years: u32,
    ) -> Result<IpcTrendReport, AnalyticsError> {
        self.aggregate_by_code_at(corpus, code, period_years, Utc::now().year())
    }

    /// Per-code aggregation with an explicit reference year.
    ///
    /// # Errors
    /// Returns [`AnalyticsError::InvalidPeriod`] when `period_years` is
    /// zero.
    #[instrument(skip(self, corpus), fields(records = corpus.len()))]
    pub fn aggregate_by_code_at(
        &self,
        corpus: &[PatentRecord],
        code: &str,
        period_years: u32,
        reference_year: i32,
    ) -> Result<IpcTrendReport, AnalyticsError> {
        if period_years == 0 {
            return Err(AnalyticsError::InvalidPeriod(period_years));
        }

        let query = ipc::normalize(code);
        // An empty query would prefix-match every code
        let matching: Vec<&PatentRecord> = if query.is_empty() {
            Vec::new()
        } else {
            corpus
                .iter()
                .filter(|record| {
                    record
                        .ipc_codes
                        .iter()
                        .any(|c| ipc::normalize(c).starts_with(&query))
                })
                .collect()
        };

        let period = analysis_window(matching.iter().copied(), period_years, reference_year);
        let yearly_statistics = yearly_counts(matching.iter().copied(), period);
        let growth_rate = endpoint_growth(&yearly_statistics);
        let recent_patents = self.recent_patents(&matching, period);

        let report = IpcTrendReport {
            description: ipc::resolve(&query),
            total_patents: matching.len() as u64,
            period,
            avg_per_year: round1(matching.len() as f64 / f64::from(period.years())),
            yearly_statistics,
            growth_rate,
            recent_patents,
            ipc_code: query,
        };

        debug!(
            code = %report.ipc_code,
            matched = report.total_patents,
            avg_per_year = report.avg_per_year,
            "Aggregated per-code trends"
        );

        Ok(report)
    }

    /// Project a report into chart-ready arrays.
    ///
    /// The report already carries gap-free yearly counts and sorted
    /// rankings, so this is pure reshaping; nothing is re-sorted or
    /// re-counted.
    pub fn chart_data(&self, report: &TrendReport) -> TrendChartData {
        TrendChartData {
            line_chart: LineChart {
                years: report.yearly_statistics.keys().copied().collect(),
                patents_count: report.yearly_statistics.values().copied().collect(),
            },
            pie_chart: report
                .top_ipc_codes
                .iter()
                .take(self.config.pie_slices)
                .map(|entry| PieSlice {
                    ipc_code: entry.ipc_code.clone(),
                    count: entry.count,
                })
                .collect(),
            trends_summary: TrendSummary {
                total_growth_rate: report.growth_rate,
                top_ipc_code: report
                    .top_ipc_codes
                    .first()
                    .map(|entry| entry.ipc_code.clone()),
                most_active_author: report.top_authors.first().map(|entry| entry.author.clone()),
            },
        }
    }

    /// Newest dated records from the trailing window years.
    ///
    /// Covers the last `recent_window_years` of the window (clamped to
    /// the window start for short periods), newest first, capped at
    /// `recent_patents_cap`. Undated records never appear.
    fn recent_patents(&self, records: &[&PatentRecord], period: Period) -> Vec<RecentPatent> {
        let cutoff =
            (period.end_year - self.config.recent_window_years as i32 + 1).max(period.start_year);

        let mut recent: Vec<(&PatentRecord, NaiveDate)> = records
            .iter()
            .filter_map(|record| record.effective_date().map(|date| (*record, date)))
            .filter(|(_, date)| date.year() >= cutoff && date.year() <= period.end_year)
            .collect();

        // Stable sort keeps corpus order for same-day records
        recent.sort_by(|a, b| b.1.cmp(&a.1));
        recent.truncate(self.config.recent_patents_cap);

        recent
            .into_iter()
            .map(|(record, _)| RecentPatent {
                id: record.id.clone(),
                title: record.title.clone(),
                publication_date: record.publication_date,
            })
            .collect()
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new(&AnalyticsConfig::default())
    }
}

/// Window of `period_years` ending at the latest effective year.
///
/// Falls back to `reference_year` when no record carries a date.
fn analysis_window<'a, I>(records: I, period_years: u32, reference_year: i32) -> Period
where
    I: IntoIterator<Item = &'a PatentRecord>,
{
    let end_year = records
        .into_iter()
        .filter_map(PatentRecord::effective_year)
        .max()
        .unwrap_or(reference_year);

    Period::new(end_year - period_years as i32 + 1, end_year)
}

/// Bucket records by effective year over the window, zeros included.
///
/// Records outside the window, or without any date, are not counted.
fn yearly_counts<'a, I>(records: I, period: Period) -> BTreeMap<i32, u64>
where
    I: IntoIterator<Item = &'a PatentRecord>,
{
    let mut counts: BTreeMap<i32, u64> = (period.start_year..=period.end_year)
        .map(|year| (year, 0))
        .collect();

    for record in records {
        if let Some(year) = record.effective_year() {
            if let Some(count) = counts.get_mut(&year) {
                *count += 1;
            }
        }
    }

    counts
}

/// Percentage change between the first and last non-zero window years.
///
/// Fewer than two distinct non-zero years cannot anchor a comparison
/// and yield the insufficient-data marker.
fn endpoint_growth(yearly: &BTreeMap<i32, u64>) -> GrowthRate {
    let mut non_zero = yearly.iter().filter(|&(_, &count)| count > 0);
    let first = non_zero.next();
    let last = non_zero.next_back();

    match (first, last) {
        (Some((_, &first)), Some((_, &last))) => {
            let change = (last as f64 - first as f64) / first as f64 * 100.0;
            GrowthRate::Percent(round1(change))
        }
        _ => GrowthRate::InsufficientData,
    }
}

/// Consecutive-year percentage changes inside the window.
///
/// A pair is only comparable when the earlier year has a non-zero
/// count; pairs starting from a zero year are skipped.
fn year_over_year(yearly: &BTreeMap<i32, u64>) -> Vec<YearGrowth> {
    let counts: Vec<(i32, u64)> = yearly.iter().map(|(&year, &count)| (year, count)).collect();

    counts
        .windows(2)
        .filter(|pair| pair[0].1 > 0)
        .map(|pair| YearGrowth {
            year: pair[1].0,
            growth: round1((pair[1].1 as f64 - pair[0].1 as f64) / pair[0].1 as f64 * 100.0),
        })
        .collect()
}

/// Rank authors by occurrence across the whole corpus.
///
/// Count descending, name ascending on ties, truncated to `limit`.
fn top_authors(corpus: &[PatentRecord], limit: usize) -> Vec<AuthorCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in corpus {
        for author in &record.authors {
            *counts.entry(author.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(author, count)| AuthorCount {
            author: author.to_string(),
            count,
        })
        .collect()
}

/// Rank classification codes across the whole corpus.
///
/// A record counts once per distinct code it carries. Count descending,
/// code ascending on ties, truncated to `limit`; resolvable codes carry
/// their description.
fn top_codes(corpus: &[PatentRecord], limit: usize) -> Vec<CodeCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in corpus {
        let distinct: HashSet<&str> = record.ipc_codes.iter().map(String::as_str).collect();
        for code in distinct {
            *counts.entry(code).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(code, count)| CodeCount {
            ipc_code: code.to_string(),
            count,
            description: ipc::resolve(code),
        })
        .collect()
}

/// Round to one decimal for presentation.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
