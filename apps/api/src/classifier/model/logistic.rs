//! Multinomial logistic regression on sparse rows.
//!
//! Minimises mean cross-entropy plus `||W||² / (2·C·n)` with Nesterov
//! accelerated full-batch gradient descent. Intercepts are not penalised.

use super::tfidf::SparseVector;
use super::ModelError;

#[derive(Debug, Clone)]
pub struct LogisticParams {
    /// Inverse regularisation strength.
    pub c: f64,
    pub max_iter: usize,
    /// Stop once the largest gradient component falls below this.
    pub tol: f64,
    pub learning_rate: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tol: 1e-4,
            learning_rate: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// `n_classes` rows of `n_features` weights.
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

/// Iterations run and whether the tolerance was reached.
#[derive(Debug, Clone, Copy)]
pub struct FitStats {
    pub iterations: usize,
    pub converged: bool,
}

impl LogisticRegression {
    /// Fits on rows `x` with class indices `y` in `0..n_classes`.
    pub fn fit(
        x: &[SparseVector],
        y: &[usize],
        n_classes: usize,
        n_features: usize,
        params: &LogisticParams,
    ) -> Result<(Self, FitStats), ModelError> {
        if x.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(ModelError::Internal(format!(
                "{} rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if n_classes < 2 {
            return Err(ModelError::TooFewClasses(n_classes));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(ModelError::Internal(format!(
                "label index {bad} out of range for {n_classes} classes"
            )));
        }

        let n = x.len() as f64;
        let reg = 1.0 / (params.c * n);

        // Current iterate, previous iterate and look-ahead point.
        let mut model = Self::zeros(n_classes, n_features);
        let mut previous = model.clone();
        let mut stats = FitStats {
            iterations: 0,
            converged: false,
        };

        for iter in 1..=params.max_iter {
            let momentum = (iter as f64 - 1.0) / (iter as f64 + 2.0);
            let lookahead = model.extrapolate(&previous, momentum);

            let (grad_w, grad_b) = lookahead.gradient(x, y, reg);

            let max_grad = grad_w
                .iter()
                .flat_map(|row| row.iter())
                .chain(grad_b.iter())
                .fold(0.0_f64, |acc, g| acc.max(g.abs()));

            previous = model;
            model = lookahead;
            model.step(&grad_w, &grad_b, params.learning_rate);
            stats.iterations = iter;

            if !max_grad.is_finite() {
                return Err(ModelError::NonFinite);
            }
            if max_grad < params.tol {
                stats.converged = true;
                break;
            }
        }

        Ok((model, stats))
    }

    pub fn n_classes(&self) -> usize {
        self.intercepts.len()
    }

    /// Class probabilities for one row, in class-index order.
    pub fn predict_proba(&self, row: &SparseVector) -> Vec<f64> {
        let scores = self.decision(row);
        softmax(&scores)
    }

    fn zeros(n_classes: usize, n_features: usize) -> Self {
        Self {
            weights: vec![vec![0.0; n_features]; n_classes],
            intercepts: vec![0.0; n_classes],
        }
    }

    fn decision(&self, row: &SparseVector) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| b + row.iter().map(|&(j, v)| w[j] * v).sum::<f64>())
            .collect()
    }

    fn gradient(&self, x: &[SparseVector], y: &[usize], reg: f64) -> (Vec<Vec<f64>>, Vec<f64>) {
        let n = x.len() as f64;
        let mut grad_w: Vec<Vec<f64>> = self.weights.iter().map(|w| w.iter().map(|v| v * reg).collect()).collect();
        let mut grad_b = vec![0.0; self.n_classes()];

        for (row, &label) in x.iter().zip(y) {
            let proba = self.predict_proba(row);
            for (k, p) in proba.iter().enumerate() {
                let err = (p - if k == label { 1.0 } else { 0.0 }) / n;
                grad_b[k] += err;
                for &(j, v) in row {
                    grad_w[k][j] += err * v;
                }
            }
        }
        (grad_w, grad_b)
    }

    fn extrapolate(&self, previous: &Self, momentum: f64) -> Self {
        let blend = |cur: f64, prev: f64| cur + momentum * (cur - prev);
        Self {
            weights: self
                .weights
                .iter()
                .zip(&previous.weights)
                .map(|(cur, prev)| cur.iter().zip(prev).map(|(&c, &p)| blend(c, p)).collect())
                .collect(),
            intercepts: self
                .intercepts
                .iter()
                .zip(&previous.intercepts)
                .map(|(&c, &p)| blend(c, p))
                .collect(),
        }
    }

    fn step(&mut self, grad_w: &[Vec<f64>], grad_b: &[f64], lr: f64) {
        for (w, g) in self.weights.iter_mut().zip(grad_w) {
            for (wj, gj) in w.iter_mut().zip(g) {
                *wj -= lr * gj;
            }
        }
        for (b, g) in self.intercepts.iter_mut().zip(grad_b) {
            *b -= lr * g;
        }
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (Vec<SparseVector>, Vec<usize>) {
        let x = vec![
            vec![(0, 1.0)],
            vec![(0, 0.8), (2, 0.6)],
            vec![(1, 1.0)],
            vec![(1, 0.8), (2, 0.6)],
        ];
        let y = vec![0, 0, 1, 1];
        (x, y)
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_softmax_handles_large_scores() {
        let p = softmax(&[1000.0, 0.0]);
        assert!(p.iter().all(|v| v.is_finite()));
        assert!(p[0] > 0.99);
    }

    #[test]
    fn test_fit_separates_toy_data() {
        let (x, y) = toy_data();
        let (model, stats) = LogisticRegression::fit(&x, &y, 2, 3, &LogisticParams::default()).unwrap();
        assert!(stats.iterations >= 1);
        for (row, &label) in x.iter().zip(&y) {
            let proba = model.predict_proba(row);
            assert!(proba[label] > 0.5, "row {row:?} proba {proba:?}");
        }
    }

    #[test]
    fn test_fit_respects_max_iter() {
        let (x, y) = toy_data();
        let params = LogisticParams {
            max_iter: 3,
            tol: 0.0,
            ..LogisticParams::default()
        };
        let (_, stats) = LogisticRegression::fit(&x, &y, 2, 3, &params).unwrap();
        assert_eq!(stats.iterations, 3);
        assert!(!stats.converged);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let x = vec![vec![(0, 1.0)]];
        let result = LogisticRegression::fit(&x, &[0], 1, 1, &LogisticParams::default());
        assert!(matches!(result, Err(ModelError::TooFewClasses(1))));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let result = LogisticRegression::fit(&[], &[], 2, 1, &LogisticParams::default());
        assert!(matches!(result, Err(ModelError::EmptyDataset)));
    }

    #[test]
    fn test_empty_row_predicts_from_intercepts() {
        let (x, y) = toy_data();
        let (model, _) = LogisticRegression::fit(&x, &y, 2, 3, &LogisticParams::default()).unwrap();
        let proba = model.predict_proba(&Vec::new());
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
