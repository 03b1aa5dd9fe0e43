//! Statistical classifier: TF-IDF features feeding a softmax regression.

pub mod logistic;
pub mod tfidf;

use thiserror::Error;

use logistic::{FitStats, LogisticParams, LogisticRegression};
use tfidf::{TfidfParams, TfidfVectorizer};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("empty vocabulary; documents may only contain stop words or rare terms")]
    EmptyVocabulary,

    #[error("need at least two classes to fit, got {0}")]
    TooFewClasses(usize),

    #[error("no training samples")]
    EmptyDataset,

    #[error("non-finite values during fit or prediction")]
    NonFinite,

    #[error("{0}")]
    Internal(String),
}

/// A fitted vectorizer and classifier plus the sorted label list.
/// `labels[k]` is the name of class index `k`.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
    labels: Vec<String>,
}

/// Most probable label for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPrediction {
    pub label: String,
    pub probability: f64,
}

/// Counts reported after a successful fit.
#[derive(Debug, Clone, Copy)]
pub struct TrainingStats {
    pub samples: usize,
    pub labels: usize,
    pub features: usize,
    pub fit: FitStats,
}

impl TrainedModel {
    /// Fits on parallel `texts` and `labels`.
    pub fn fit(texts: &[String], labels: &[String]) -> Result<(Self, TrainingStats), ModelError> {
        if texts.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let mut label_list: Vec<String> = labels.to_vec();
        label_list.sort();
        label_list.dedup();
        if label_list.len() < 2 {
            return Err(ModelError::TooFewClasses(label_list.len()));
        }

        let vectorizer = TfidfVectorizer::fit(texts, &TfidfParams::default())?;
        let rows: Vec<_> = texts.iter().map(|t| vectorizer.transform(t)).collect();
        let targets: Vec<usize> = labels
            .iter()
            .map(|label| {
                label_list
                    .binary_search(label)
                    .map_err(|_| ModelError::Internal(format!("unknown label {label}")))
            })
            .collect::<Result<_, _>>()?;

        let (classifier, fit) = LogisticRegression::fit(
            &rows,
            &targets,
            label_list.len(),
            vectorizer.n_features(),
            &LogisticParams::default(),
        )?;

        let stats = TrainingStats {
            samples: texts.len(),
            labels: label_list.len(),
            features: vectorizer.n_features(),
            fit,
        };

        Ok((
            Self {
                vectorizer,
                classifier,
                labels: label_list,
            },
            stats,
        ))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Probability of every label for `text`, in `labels()` order.
    pub fn predict_proba(&self, text: &str) -> Result<Vec<f64>, ModelError> {
        let row = self.vectorizer.transform(text);
        let proba = self.classifier.predict_proba(&row);
        if proba.len() != self.labels.len() {
            return Err(ModelError::Internal(format!(
                "{} probabilities for {} labels",
                proba.len(),
                self.labels.len()
            )));
        }
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(ModelError::NonFinite);
        }
        Ok(proba)
    }

    /// Arg-max label; the lowest index wins a tie.
    pub fn predict(&self, text: &str) -> Result<ModelPrediction, ModelError> {
        let proba = self.predict_proba(text)?;
        let mut best = 0;
        for (i, &p) in proba.iter().enumerate() {
            if p > proba[best] {
                best = i;
            }
        }
        let probability = proba[best];

        Ok(ModelPrediction {
            label: self.labels[best].clone(),
            probability,
        })
    }
}
