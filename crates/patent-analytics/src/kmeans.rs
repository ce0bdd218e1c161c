//! Seeded centroid clustering.
//!
//! A small k-means implementation over cosine geometry: centroids are
//! spherical (mean then renormalized), distance is `1 - cosine`, and
//! every random choice flows from a fixed seed, so a given input and
//! configuration always produce the same partition.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ClusterConfig;
use crate::similarity::{calculate_centroid, cosine_similarity};
use crate::types::FeatureVector;

/// K-means runner for one clustering request.
pub struct KMeans {
    k: usize,
    max_iterations: usize,
    seed: u64,
    restarts: usize,
}

impl KMeans {
    /// Create a runner for `k` clusters with the given configuration.
    pub fn new(k: usize, config: &ClusterConfig) -> Self {
        Self {
            k,
            max_iterations: config.max_iterations,
            seed: config.seed,
            restarts: config.restarts,
        }
    }

    /// Partition the vectors into `k` groups.
    ///
    /// Runs the configured number of restarts, each seeded independently,
    /// and keeps the partition with the lowest inertia (earlier restart
    /// wins ties). Labels may leave a group empty when the input is
    /// degenerate, e.g. all-zero vectors; callers drop such groups.
    ///
    /// # Returns
    /// A cluster label in `0..k` for each input vector, in input order.
    ///
    /// # Panics
    /// Panics if `k` is zero.
    pub fn fit(&self, vectors: &[FeatureVector]) -> Vec<usize> {
        assert!(self.k > 0, "k must be at least 1");
        if vectors.is_empty() {
            return Vec::new();
        }

        let mut best_assignments = Vec::new();
        let mut best_inertia = f64::INFINITY;

        for restart in 0..self.restarts.max(1) {
            let seed = self.seed.wrapping_add(restart as u64);
            let (assignments, inertia) = self.run(vectors, seed);
            if inertia < best_inertia {
                best_inertia = inertia;
                best_assignments = assignments;
            }
        }

        best_assignments
    }

    /// One seeded k-means run: init, iterate, score.
    fn run(&self, vectors: &[FeatureVector], seed: u64) -> (Vec<usize>, f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids = self.init_centroids(vectors, &mut rng);
        let mut assignments = assign(vectors, &centroids);

        for _ in 0..self.max_iterations {
            centroids = self.update_centroids(vectors, &mut assignments);
            let next = assign(vectors, &centroids);
            if next == assignments {
                break;
            }
            assignments = next;
        }

        let inertia = inertia(vectors, &centroids, &assignments);
        (assignments, inertia)
    }

    /// K-means++ style initialization.
    ///
    /// The first centroid is a uniformly drawn point; each further
    /// centroid is drawn with probability proportional to the squared
    /// distance from the nearest centroid chosen so far.
    fn init_centroids(&self, vectors: &[FeatureVector], rng: &mut StdRng) -> Vec<Vec<f32>> {
        let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(self.k);
        let first = rng.random_range(0..vectors.len());
        centroids.push(vectors[first].clone());

        while centroids.len() < self.k {
            let weights: Vec<f64> = vectors
                .iter()
                .map(|v| {
                    let nearest = centroids
                        .iter()
                        .map(|c| distance(v, c))
                        .fold(f64::INFINITY, f64::min);
                    nearest * nearest
                })
                .collect();
            let total: f64 = weights.iter().sum();

            let chosen = if total > 0.0 {
                let mut target = rng.random::<f64>() * total;
                let mut picked = vectors.len() - 1;
                for (i, weight) in weights.iter().enumerate() {
                    target -= weight;
                    if target <= 0.0 {
                        picked = i;
                        break;
                    }
                }
                picked
            } else {
                // Every point coincides with a centroid already
                rng.random_range(0..vectors.len())
            };

            centroids.push(vectors[chosen].clone());
        }

        centroids
    }

    /// Recompute centroids from the current assignment.
    ///
    /// A group that lost all members is reseeded to the worst-fitting
    /// point, which is moved into the group so two empty groups never
    /// reseed to the same point. When no reseed candidate exists the
    /// group keeps a zero centroid, which attracts nothing.
    fn update_centroids(
        &self,
        vectors: &[FeatureVector],
        assignments: &mut [usize],
    ) -> Vec<Vec<f32>> {
        let dim = vectors[0].len();
        let mut centroids = Vec::with_capacity(self.k);
        let mut counts = vec![0usize; self.k];
        for &label in assignments.iter() {
            counts[label] += 1;
        }

        for j in 0..self.k {
            let members: Vec<&[f32]> = assignments
                .iter()
                .enumerate()
                .filter(|&(_, &label)| label == j)
                .map(|(i, _)| vectors[i].as_slice())
                .collect();
            if members.is_empty() {
                centroids.push(vec![0.0; dim]);
            } else {
                centroids.push(calculate_centroid(&members));
            }
        }

        for j in 0..self.k {
            if counts[j] > 0 {
                continue;
            }
            // A point exactly on its centroid cannot seed a new group
            if let Some(worst) = worst_fitting_point(vectors, &centroids, assignments) {
                counts[assignments[worst]] -= 1;
                counts[j] += 1;
                centroids[j] = vectors[worst].clone();
                assignments[worst] = j;
            }
        }

        centroids
    }
}

/// Assign each vector to its most similar centroid.
///
/// Only a strictly greater similarity replaces the current choice, so
/// equal-similarity ties keep the lowest centroid index.
fn assign(vectors: &[FeatureVector], centroids: &[Vec<f32>]) -> Vec<usize> {
    vectors
        .iter()
        .map(|v| {
            let mut best = 0;
            let mut best_similarity = f32::NEG_INFINITY;
            for (j, centroid) in centroids.iter().enumerate() {
                let similarity = cosine_similarity(v, centroid);
                if similarity > best_similarity {
                    best_similarity = similarity;
                    best = j;
                }
            }
            best
        })
        .collect()
}

/// The point farthest from its assigned centroid, lowest index on ties.
///
/// Returns `None` when every point sits exactly on its centroid, since
/// reseeding with such a point would just duplicate an existing group.
fn worst_fitting_point(
    vectors: &[FeatureVector],
    centroids: &[Vec<f32>],
    assignments: &[usize],
) -> Option<usize> {
    let mut worst: Option<(usize, f64)> = None;
    for (i, v) in vectors.iter().enumerate() {
        let d = distance(v, &centroids[assignments[i]]);
        if d <= 0.0 {
            continue;
        }
        let farther = match worst {
            None => true,
            Some((_, worst_distance)) => d > worst_distance,
        };
        if farther {
            worst = Some((i, d));
        }
    }
    worst.map(|(i, _)| i)
}

/// Sum of squared distances from each point to its centroid.
fn inertia(vectors: &[FeatureVector], centroids: &[Vec<f32>], assignments: &[usize]) -> f64 {
    vectors
        .iter()
        .zip(assignments.iter())
        .map(|(v, &label)| {
            let d = distance(v, &centroids[label]);
            d * d
        })
        .sum()
}

/// Cosine distance in [0.0, 2.0].
fn distance(a: &[f32], b: &[f32]) -> f64 {
    1.0 - cosine_similarity(a, b) as f64
}
