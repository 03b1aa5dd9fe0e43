//! Startup-only model training from the labelled resume CSV.

use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::classifier::model::{ModelError, TrainedModel};

const CATEGORY_COLUMN: &str = "Category";
const RESUME_COLUMN: &str = "Resume";

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("model fit failed: {0}")]
    Model(#[from] ModelError),
}

/// Labelled rows kept after dropping those with an empty category or resume.
#[derive(Debug, Default)]
pub struct Dataset {
    pub texts: Vec<String>,
    pub labels: Vec<String>,
}

/// Reads `path` as CSV with a header row containing `Category` and `Resume`.
pub fn load_dataset(path: &Path) -> Result<Dataset, TrainingError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(TrainingError::MissingColumn(name))
    };
    let category_idx = column(CATEGORY_COLUMN)?;
    let resume_idx = column(RESUME_COLUMN)?;

    let mut dataset = Dataset::default();
    for record in reader.records() {
        let record = record?;
        let (Some(category), Some(resume)) = (record.get(category_idx), record.get(resume_idx)) else {
            continue;
        };
        if category.is_empty() || resume.is_empty() {
            continue;
        }
        dataset.labels.push(category.to_string());
        dataset.texts.push(resume.to_string());
    }

    Ok(dataset)
}

/// Loads the dataset and fits a model, reporting every failure.
pub fn train_from_csv(path: &Path) -> Result<TrainedModel, TrainingError> {
    let started = Instant::now();
    let dataset = load_dataset(path)?;
    let (model, stats) = TrainedModel::fit(&dataset.texts, &dataset.labels)?;

    let correct = dataset
        .texts
        .iter()
        .zip(&dataset.labels)
        .filter(|(text, label)| {
            model
                .predict(text)
                .map(|p| &p.label == *label)
                .unwrap_or(false)
        })
        .count();

    info!(
        samples = stats.samples,
        labels = stats.labels,
        features = stats.features,
        iterations = stats.fit.iterations,
        converged = stats.fit.converged,
        train_accuracy = correct as f64 / stats.samples as f64,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Resume classifier trained"
    );
    debug!(labels = ?model.labels(), "Trained categories");

    Ok(model)
}

/// Startup entry point. A missing dataset or any training failure leaves the
/// classifier without a model; failures are only visible at debug level.
pub fn train_at_startup(path: &Path) -> Option<TrainedModel> {
    if !path.exists() {
        debug!("No dataset at {}; skipping model training", path.display());
        return None;
    }

    match train_from_csv(path) {
        Ok(model) => Some(model),
        Err(e) => {
            debug!("Model training failed for {}: {e}", path.display());
            None
        }
    }
}
