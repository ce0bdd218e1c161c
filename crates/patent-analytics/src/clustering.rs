//! Thematic clustering of patent corpora.
//!
//! Groups a corpus into clusters of semantically similar patents using
//! TF-IDF vectors and seeded centroid clustering, then labels each
//! cluster from its members' classification codes. Also answers
//! nearest-neighbor queries against a single target patent.

use std::collections::HashMap;

use patent_types::PatentRecord;
use tracing::{debug, instrument};

use crate::config::{AnalyticsConfig, ClusterConfig};
use crate::error::AnalyticsError;
use crate::features::FeatureExtractor;
use crate::ipc;
use crate::kmeans::KMeans;
use crate::similarity::{calculate_centroid, cosine_similarity, is_zero};
use crate::types::{Cluster, FeatureVector, SimilarPatent};

/// Clustering engine over a caller-supplied corpus.
///
/// Stateless between calls: every invocation re-extracts features and
/// re-partitions from scratch, so concurrent requests never interfere.
pub struct ClusteringEngine {
    extractor: FeatureExtractor,
    config: ClusterConfig,
}

impl ClusteringEngine {
    /// Create an engine from the master configuration.
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            extractor: FeatureExtractor::new(config.features.clone()),
            config: config.clustering.clone(),
        }
    }

    /// Partition the corpus into thematic clusters.
    ///
    /// The effective cluster count is
    /// `min(max_clusters_hint, max(1, floor(sqrt(n))))`, so a small
    /// corpus degrades to fewer clusters and a single record yields one
    /// cluster. Output is ordered by member count descending, theme
    /// ascending; members keep their corpus order inside each cluster.
    ///
    /// # Errors
    /// Returns [`AnalyticsError::EmptyCorpus`] when `corpus` is empty.
    #[instrument(skip(self, corpus), fields(records = corpus.len()))]
    pub fn cluster<'a>(
        &self,
        corpus: &'a [PatentRecord],
        max_clusters_hint: usize,
    ) -> Result<Vec<Cluster<'a>>, AnalyticsError> {
        if corpus.is_empty() {
            return Err(AnalyticsError::EmptyCorpus);
        }

        let k = effective_cluster_count(corpus.len(), max_clusters_hint);
        let vectors = self.extractor.extract(corpus);
        let labels = KMeans::new(k, &self.config).fit(&vectors);

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
        for (index, &label) in labels.iter().enumerate() {
            groups[label].push(index);
        }

        let mut clusters: Vec<Cluster<'a>> = groups
            .iter()
            .enumerate()
            .filter(|(_, indices)| !indices.is_empty())
            .map(|(group, indices)| {
                let members: Vec<&PatentRecord> = indices.iter().map(|&i| &corpus[i]).collect();
                Cluster {
                    theme: derive_theme(&members, group + 1),
                    cohesion: cohesion(&vectors, indices),
                    members,
                }
            })
            .collect();

        clusters.sort_by(|a, b| {
            b.members
                .len()
                .cmp(&a.members.len())
                .then_with(|| a.theme.cmp(&b.theme))
        });

        debug!(clusters = clusters.len(), k, "Clustered corpus");

        Ok(clusters)
    }

    /// Find the patents most similar to a target record.
    ///
    /// Vectorizes the corpus, ranks every other record by cosine
    /// similarity to the target (original corpus order on ties) and
    /// returns at most `limit` neighbors with similarities rounded to
    /// three decimals.
    ///
    /// # Errors
    /// Returns [`AnalyticsError::PatentNotFound`] when no record carries
    /// `target_id`.
    #[instrument(skip(self, corpus), fields(records = corpus.len()))]
    pub fn find_similar<'a>(
        &self,
        corpus: &'a [PatentRecord],
        target_id: &str,
        limit: usize,
    ) -> Result<Vec<SimilarPatent<'a>>, AnalyticsError> {
        let target_index = corpus
            .iter()
            .position(|record| record.id == target_id)
            .ok_or_else(|| AnalyticsError::PatentNotFound(target_id.to_string()))?;

        let vectors = self.extractor.extract(corpus);
        let target_vector = &vectors[target_index];

        let mut neighbors: Vec<(usize, f32)> = vectors
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != target_index)
            .map(|(index, vector)| (index, cosine_similarity(target_vector, vector)))
            .collect();

        neighbors.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        neighbors.truncate(limit);

        debug!(target_id = %target_id, neighbors = neighbors.len(), "Ranked similar patents");

        Ok(neighbors
            .into_iter()
            .map(|(index, similarity)| SimilarPatent {
                patent: &corpus[index],
                similarity: round3(similarity),
            })
            .collect())
    }
}

impl Default for ClusteringEngine {
    fn default() -> Self {
        Self::new(&AnalyticsConfig::default())
    }
}

/// `min(hint, max(1, floor(sqrt(n))))`, clamped so `1 <= k <= n`.
fn effective_cluster_count(corpus_size: usize, max_clusters_hint: usize) -> usize {
    let heuristic = ((corpus_size as f64).sqrt().floor() as usize).max(1);
    max_clusters_hint.max(1).min(heuristic)
}

/// Derive a cluster theme from member classification codes.
///
/// Most frequent resolved description wins, ties going to the
/// description reached through the lexicographically smallest code.
/// When nothing resolves, the most frequent raw code is used, and a
/// cluster without any codes falls back to a positional label.
fn derive_theme(members: &[&PatentRecord], ordinal: usize) -> String {
    // description -> (occurrences, smallest code that resolved to it)
    let mut resolved: HashMap<String, (usize, &str)> = HashMap::new();
    let mut raw: HashMap<&str, usize> = HashMap::new();

    for record in members {
        for code in &record.ipc_codes {
            match ipc::resolve(code) {
                Some(description) => {
                    let entry = resolved.entry(description).or_insert((0, code.as_str()));
                    entry.0 += 1;
                    if code.as_str() < entry.1 {
                        entry.1 = code.as_str();
                    }
                }
                None => {
                    *raw.entry(code.as_str()).or_insert(0) += 1;
                }
            }
        }
    }

    if !resolved.is_empty() {
        let mut ranked: Vec<(String, usize, &str)> = resolved
            .into_iter()
            .map(|(description, (count, code))| (description, count, code))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(b.2)).then_with(|| a.0.cmp(&b.0)));
        return ranked.swap_remove(0).0;
    }

    if !raw.is_empty() {
        let mut ranked: Vec<(&str, usize)> = raw.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        return ranked[0].0.to_string();
    }

    format!("Cluster {ordinal}")
}

/// Mean cosine similarity of the group's vectors to their centroid.
///
/// `None` when the centroid degenerates to zero, which happens when
/// every member has empty text.
fn cohesion(vectors: &[FeatureVector], indices: &[usize]) -> Option<f32> {
    let group: Vec<&[f32]> = indices.iter().map(|&i| vectors[i].as_slice()).collect();
    let centroid = calculate_centroid(&group);
    if centroid.is_empty() || is_zero(&centroid) {
        return None;
    }

    let total: f32 = group
        .iter()
        .map(|vector| cosine_similarity(vector, &centroid))
        .sum();
    Some(total / group.len() as f32)
}

/// Round to three decimals for presentation.
fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}
