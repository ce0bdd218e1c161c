//! TF-IDF feature extraction.
//!
//! Converts patent title+abstract text into unit-length term vectors
//! that are comparable by cosine similarity. Pure Rust implementation
//! without external dependencies.
//!
//! The vocabulary is corpus-local: it is rebuilt on every call so that
//! vectors from unrelated corpora never share a stale term space.

use std::collections::{HashMap, HashSet};

use patent_types::PatentRecord;
use tracing::debug;

use crate::config::FeatureConfig;
use crate::similarity::normalize;
use crate::types::FeatureVector;

/// Corpus-local TF-IDF vectorizer.
///
/// One extraction run produces one vector per record, in input order,
/// all sharing the same dimension. Records with no usable text yield a
/// zero vector rather than an error.
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Vectorize a corpus.
    ///
    /// Builds the vocabulary from the corpus itself, weighting terms by
    /// normalized term frequency times smoothed inverse document
    /// frequency, then L2-normalizes each vector.
    ///
    /// # Returns
    /// One vector per record, same order as the input. An empty corpus
    /// yields an empty Vec.
    pub fn extract(&self, corpus: &[PatentRecord]) -> Vec<FeatureVector> {
        if corpus.is_empty() {
            return Vec::new();
        }

        let documents: Vec<Vec<String>> = corpus
            .iter()
            .map(|record| tokenize(&record.full_text(), self.config.bigrams))
            .collect();

        let mut doc_frequencies: HashMap<&str, usize> = HashMap::new();
        let mut total_frequencies: HashMap<&str, usize> = HashMap::new();
        for tokens in &documents {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_frequencies.entry(term).or_insert(0) += 1;
            }
            for term in tokens {
                *total_frequencies.entry(term).or_insert(0) += 1;
            }
        }

        let vocabulary = self.select_vocabulary(&total_frequencies);
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (*term, i))
            .collect();

        let n = corpus.len() as f32;
        let idf: Vec<f32> = vocabulary
            .iter()
            .map(|term| {
                let df = doc_frequencies.get(term).copied().unwrap_or(0) as f32;
                // Smoothed IDF avoids division by zero and extreme values
                ((n + 1.0) / (df + 1.0)).ln() + 1.0
            })
            .collect();

        debug!(
            documents = corpus.len(),
            vocabulary = vocabulary.len(),
            "Extracted TF-IDF vocabulary"
        );

        documents
            .iter()
            .map(|tokens| {
                let mut vector = vec![0.0f32; vocabulary.len()];
                if tokens.is_empty() {
                    return vector;
                }

                let total = tokens.len() as f32;
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for term in tokens {
                    *counts.entry(term).or_insert(0) += 1;
                }

                for (term, count) in counts {
                    if let Some(&i) = index.get(term) {
                        vector[i] = (count as f32 / total) * idf[i];
                    }
                }

                normalize(&mut vector);
                vector
            })
            .collect()
    }

    /// Pick the vocabulary, capped at `max_features`.
    ///
    /// When the cap applies, the most frequent terms across the corpus
    /// survive, ties going to the lexicographically smaller term. The
    /// final vocabulary is sorted by term so vector layout is stable.
    fn select_vocabulary<'a>(&self, frequencies: &HashMap<&'a str, usize>) -> Vec<&'a str> {
        let mut terms: Vec<(&str, usize)> = frequencies.iter().map(|(t, c)| (*t, *c)).collect();

        if terms.len() > self.config.max_features {
            terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            terms.truncate(self.config.max_features);
        }

        let mut vocabulary: Vec<&str> = terms.into_iter().map(|(term, _)| term).collect();
        vocabulary.sort_unstable();
        vocabulary
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}

/// Tokenize text into lowercase terms, optionally with bigrams.
///
/// Filters out:
/// - Stop words (Russian and English function words plus patent boilerplate)
/// - Single-character tokens (counted in chars, so Cyrillic is handled)
/// - All-numeric tokens
///
/// Bigrams are built from adjacent surviving tokens, joined by a space,
/// and appended after the unigrams.
fn tokenize(text: &str, bigrams: bool) -> Vec<String> {
    let mut terms: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .filter(|s| s.chars().count() > 1)
        .filter(|s| !is_stop_word(s))
        .filter(|s| !s.chars().all(|c| c.is_numeric()))
        .map(String::from)
        .collect();

    if bigrams {
        let pairs: Vec<String> = terms
            .windows(2)
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .collect();
        terms.extend(pairs);
    }

    terms
}

/// Check if a word is a stop word.
fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        // Russian function words
        "и", "в", "во", "не", "что", "он", "на", "я", "с", "со", "как", "а", "то", "все", "она",
        "так", "его", "но", "да", "ты", "к", "у", "же", "вы", "за", "бы", "по", "только", "ее",
        "мне", "было", "вот", "от", "меня", "еще", "нет", "о", "из", "ему", "теперь", "когда",
        "даже", "ну", "вдруг", "ли", "если", "уже", "или", "ни", "быть", "был", "него", "до",
        "вас", "нибудь", "опять", "уж", "вам", "ведь", "там", "потом", "себя", "ничего", "ей",
        "может", "они", "тут", "где", "есть", "надо", "ней", "для", "мы", "тебя", "их", "чем",
        "была", "сам", "чтоб", "без", "будто", "чего", "раз", "тоже", "себе", "под", "будет",
        "ж", "тогда", "кто", "этот", "того", "потому", "этого", "какой", "совсем", "ним",
        "здесь", "этом", "один", "почти", "мой", "тем", "чтобы", "нее", "сейчас", "были",
        "куда", "зачем", "всех", "никогда", "можно", "при", "наконец", "два", "об", "другой",
        "хоть", "после", "над", "больше", "тот", "через", "эти", "нас", "про", "всего", "них",
        "какая", "много", "разве", "три", "эту", "моя", "впрочем", "хорошо", "свою", "этой",
        "перед", "иногда", "лучше", "чуть", "том", "нельзя", "такой", "им", "более", "всегда",
        "конечно", "всю", "между",
        // Patent boilerplate
        "патент", "изобретение", "способ", "устройство", "метод", "система",
        // English function words
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in",
        "is", "it", "its", "of", "on", "or", "that", "the", "to", "was", "were", "will",
        "with", "this", "they", "but", "have", "had", "which", "when", "where", "who", "how",
        "all", "each", "other", "some", "such", "no", "nor", "not", "can", "may", "into",
        "through", "between", "during", "than", "then", "we", "their", "these", "those",
    ];

    STOP_WORDS.contains(&word)
}
