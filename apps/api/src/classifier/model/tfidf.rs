//! TF-IDF vectorizer over word uni/bi-grams.

use std::collections::HashMap;

use regex::Regex;

use super::ModelError;

/// Sparse row: `(feature index, value)` pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Tokens are runs of two or more word characters.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

#[derive(Debug, Clone)]
pub struct TfidfParams {
    /// Inclusive n-gram bounds.
    pub ngram_range: (usize, usize),
    /// Terms must appear in at least this many documents.
    pub min_df: usize,
    /// Keep at most this many terms, ranked by corpus frequency.
    pub max_features: usize,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            min_df: 2,
            max_features: 50_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    token_re: Regex,
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and idf weights from `docs`.
    pub fn fit(docs: &[String], params: &TfidfParams) -> Result<Self, ModelError> {
        let token_re = Regex::new(TOKEN_PATTERN).map_err(|e| ModelError::Internal(e.to_string()))?;
        let (min_n, max_n) = params.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Internal(format!(
                "invalid n-gram range ({min_n}, {max_n})"
            )));
        }

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut corpus_freq: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let counts = count_terms(&token_re, params.ngram_range, doc);
            for (term, count) in counts {
                *corpus_freq.entry(term.clone()).or_insert(0) += count;
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= params.min_df)
            .collect();

        if kept.len() > params.max_features {
            kept.sort_by(|(a, _), (b, _)| corpus_freq[b].cmp(&corpus_freq[a]).then_with(|| a.cmp(b)));
            kept.truncate(params.max_features);
        }

        if kept.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }

        // Feature indices follow lexical order of the terms.
        kept.sort_by(|(a, _), (b, _)| a.cmp(b));

        let n_docs = docs.len() as f64;
        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (index, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(Self {
            token_re,
            ngram_range: params.ngram_range,
            vocabulary,
            idf,
        })
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Term counts weighted by idf, L2-normalised. Unknown terms are ignored;
    /// a document with no known terms maps to the empty vector.
    pub fn transform(&self, doc: &str) -> SparseVector {
        let counts = count_terms(&self.token_re, self.ngram_range, doc);

        let mut row: SparseVector = counts
            .into_iter()
            .filter_map(|(term, count)| {
                self.vocabulary
                    .get(&term)
                    .map(|&index| (index, count as f64 * self.idf[index]))
            })
            .collect();
        row.sort_unstable_by_key(|(index, _)| *index);

        let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in row.iter_mut() {
                *v /= norm;
            }
        }
        row
    }
}

fn count_terms(token_re: &Regex, (min_n, max_n): (usize, usize), doc: &str) -> HashMap<String, usize> {
    let lower = doc.to_lowercase();
    let tokens: Vec<&str> = token_re.find_iter(&lower).map(|m| m.as_str()).collect();

    let mut counts = HashMap::new();
    for n in min_n..=max_n {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}
