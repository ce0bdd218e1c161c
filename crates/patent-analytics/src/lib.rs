//! # patent-analytics
//!
//! Corpus analytics core for the patent intelligence service.
//!
//! This crate turns a ranked list of patent documents, as returned by an
//! external patent-search provider, into two derived views: thematic
//! clusters of semantically similar patents and trend reports over
//! publication activity. Every operation is a pure, synchronous function
//! of the caller-supplied corpus plus configuration; the crate performs
//! no I/O and keeps no state between calls, so any number of requests
//! may run concurrently.
//!
//! ## Features
//! - TF-IDF feature extraction over title and abstract text, with
//!   bilingual (Russian/English) tokenization and optional bigrams
//! - Seeded k-means clustering labeled from classification codes
//! - Nearest-neighbor patent lookup by cosine similarity
//! - Trend reports: gap-free yearly counts, ranked authors and codes,
//!   endpoint growth rates, per-code drill-downs, chart projections
//! - Longest-prefix classification code resolution over static tables

pub mod clustering;
pub mod config;
pub mod error;
pub mod features;
pub mod ipc;
pub mod kmeans;
pub mod similarity;
pub mod trends;
pub mod types;

pub use clustering::ClusteringEngine;
pub use config::{AnalyticsConfig, ClusterConfig, FeatureConfig, TrendConfig};
pub use error::AnalyticsError;
pub use features::FeatureExtractor;
pub use kmeans::KMeans;
pub use similarity::{calculate_centroid, cosine_similarity};
pub use trends::TrendAnalyzer;
pub use types::{
    AuthorCount, Cluster, CodeCount, FeatureVector, GrowthRate, IpcTrendReport, LineChart, Period,
    PieSlice, RecentPatent, SimilarPatent, TrendChartData, TrendReport, TrendSummary, YearGrowth,
};
