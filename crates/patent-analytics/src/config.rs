//! Analytics configuration.

use serde::{Deserialize, Serialize};

/// Master configuration for the analytics core.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalyticsConfig {
    /// Feature extraction settings
    #[serde(default)]
    pub features: FeatureConfig,

    /// Clustering settings
    #[serde(default)]
    pub clustering: ClusterConfig,

    /// Trend aggregation settings
    #[serde(default)]
    pub trends: TrendConfig,
}

/// Feature extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Maximum vocabulary size; the corpus-wide most frequent terms are kept
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Include adjacent-token bigrams alongside unigrams
    #[serde(default = "default_true")]
    pub bigrams: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            bigrams: default_true(),
        }
    }
}

fn default_max_features() -> usize {
    1000
}
fn default_true() -> bool {
    true
}

/// Clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Iteration cap for centroid refinement
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// RNG seed for centroid initialization
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Independent runs; the partition with the lowest inertia wins
    #[serde(default = "default_restarts")]
    pub restarts: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            seed: default_seed(),
            restarts: default_restarts(),
        }
    }
}

fn default_max_iterations() -> usize {
    100
}
fn default_seed() -> u64 {
    42
}
fn default_restarts() -> usize {
    10
}

/// Trend aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Entries kept in the top-author and top-code rankings
    #[serde(default = "default_top_entries")]
    pub top_entries: usize,

    /// Trailing window (in years) for the recent-patents list
    #[serde(default = "default_recent_window_years")]
    pub recent_window_years: u32,

    /// Maximum entries in the recent-patents list
    #[serde(default = "default_recent_patents_cap")]
    pub recent_patents_cap: usize,

    /// Slices in the classification-code pie chart
    #[serde(default = "default_pie_slices")]
    pub pie_slices: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            top_entries: default_top_entries(),
            recent_window_years: default_recent_window_years(),
            recent_patents_cap: default_recent_patents_cap(),
            pie_slices: default_pie_slices(),
        }
    }
}

fn default_top_entries() -> usize {
    10
}
fn default_recent_window_years() -> u32 {
    3
}
fn default_recent_patents_cap() -> usize {
    10
}
fn default_pie_slices() -> usize {
    8
}
