//! Resume classifier: maps extracted text to a job category.
//!
//! Two modes:
//! - model: TF-IDF + softmax regression trained once at startup (`model` feature)
//! - heuristic: keyword substring counting over the category table
//!
//! The model is written once before the server starts and only read afterwards,
//! so `AppState` shares it behind a plain `Arc` with no lock.

pub mod categories;
pub mod handlers;
pub mod heuristic;
#[cfg(feature = "model")]
pub mod model;
#[cfg(feature = "model")]
pub mod trainer;

use serde::{Deserialize, Serialize};
use tracing::debug;

use heuristic::{classify_by_keywords, extract_skills};
#[cfg(feature = "model")]
use heuristic::round2;
#[cfg(feature = "model")]
use model::TrainedModel;

/// Response body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category: String,
    /// In `[0, 1]`, rounded to two decimals.
    pub confidence: f64,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierMode {
    Model,
    Heuristic,
}

#[derive(Debug, Default)]
pub struct Classifier {
    #[cfg(feature = "model")]
    model: Option<TrainedModel>,
}

impl Classifier {
    /// Keyword-only classifier.
    pub fn heuristic() -> Self {
        Self::default()
    }

    #[cfg(feature = "model")]
    pub fn with_model(model: TrainedModel) -> Self {
        Self { model: Some(model) }
    }

    pub fn mode(&self) -> ClassifierMode {
        if self.has_model() {
            ClassifierMode::Model
        } else {
            ClassifierMode::Heuristic
        }
    }

    /// Never fails: a model error falls through to the keyword heuristic.
    pub fn predict(&self, text: &str) -> Prediction {
        if let Some(prediction) = self.predict_with_model(text) {
            return prediction;
        }

        let keyword_match = classify_by_keywords(text);
        debug!(
            category = %keyword_match.category,
            matched = ?keyword_match.matched,
            "Keyword classification"
        );

        Prediction {
            category: keyword_match.category,
            confidence: keyword_match.confidence,
            skills: extract_skills(text),
        }
    }

    #[cfg(feature = "model")]
    fn has_model(&self) -> bool {
        self.model.is_some()
    }

    #[cfg(not(feature = "model"))]
    fn has_model(&self) -> bool {
        false
    }

    #[cfg(feature = "model")]
    fn predict_with_model(&self, text: &str) -> Option<Prediction> {
        let model = self.model.as_ref()?;
        match model.predict(text) {
            Ok(prediction) => Some(Prediction {
                category: prediction.label,
                confidence: round2(prediction.probability),
                skills: extract_skills(text),
            }),
            Err(e) => {
                debug!("Model prediction failed, using keyword heuristic: {e}");
                None
            }
        }
    }

    #[cfg(not(feature = "model"))]
    fn predict_with_model(&self, _text: &str) -> Option<Prediction> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_mode_prediction() {
        let classifier = Classifier::heuristic();
        assert_eq!(classifier.mode(), ClassifierMode::Heuristic);

        let prediction = classifier.predict("python, pandas, sql");
        assert_eq!(
            prediction,
            Prediction {
                category: "Data Science".to_string(),
                confidence: 0.8,
                skills: vec!["Python".to_string(), "Pandas".to_string(), "Sql".to_string()],
            }
        );
    }

    #[test]
    fn test_heuristic_mode_no_match() {
        let prediction = Classifier::heuristic().predict("");
        assert_eq!(prediction.category, "General");
        assert_eq!(prediction.confidence, 0.5);
        assert_eq!(prediction.skills, vec!["Communication", "Teamwork"]);
    }

    #[test]
    fn test_skills_span_all_categories() {
        // Winner is DevOps, but skills still list the Software Engineering hit first.
        let prediction = Classifier::heuristic().predict("react, aws, terraform, jenkins");
        assert_eq!(prediction.category, "DevOps / Cloud");
        assert_eq!(prediction.skills, vec!["React", "Aws", "Terraform", "Jenkins"]);
    }

    #[cfg(feature = "model")]
    #[test]
    fn test_model_mode_uses_max_probability() {
        let (texts, labels) = model::tests::toy_corpus();
        let (trained, _) = TrainedModel::fit(&texts, &labels).unwrap();
        let proba = trained.predict_proba("figma prototype").unwrap();
        let expected = round2(proba.iter().copied().fold(0.0, f64::max));

        let classifier = Classifier::with_model(trained);
        assert_eq!(classifier.mode(), ClassifierMode::Model);

        let prediction = classifier.predict("figma prototype");
        assert_eq!(prediction.category, "UI/UX Design");
        assert_eq!(prediction.confidence, expected);
        assert!((0.0..=1.0).contains(&prediction.confidence));
        assert_eq!(prediction.skills, vec!["Figma", "Prototype"]);
    }

    #[test]
    fn test_heuristic_detects_data_engineering() {
        let classifier = Classifier::heuristic();
        assert_eq!(classifier.mode(), ClassifierMode::Heuristic);
        assert_eq!(classifier.predict("kafka spark airflow").category, "Data Engineering");
    }
}
