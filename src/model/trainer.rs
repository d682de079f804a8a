//! K-fold cross-validation and final fit.
//!
//! The cross-validation score and the exported model are decoupled on
//! purpose: the score estimates generalization over held-out folds, while
//! the exported model is refit on all training rows.

use linfa::prelude::*;
use linfa::Dataset;
use ndarray::{Array1, Array2};

use super::accuracy;
use super::pipeline::{FittedPipeline, PipelineSpec};
use crate::{Error, Result};

/// Default fold count.
pub const CV_FOLDS: usize = 10;

/// Mean held-out accuracy over `k` folds.
pub fn cross_validate(
    spec: &PipelineSpec,
    x: &Array2<f64>,
    y: &Array1<bool>,
    k: usize,
) -> Result<f64> {
    if k < 2 {
        return Err(Error::Training(format!(
            "cross-validation needs at least 2 folds, got {k}"
        )));
    }
    if x.nrows() < k {
        return Err(Error::Training(format!(
            "cannot split {} rows into {k} folds",
            x.nrows()
        )));
    }

    let mut dataset = Dataset::new(x.clone(), y.clone());
    let mut scores = Vec::with_capacity(k);
    for (fitted, valid) in
        dataset.iter_fold(k, |train| spec.fit(train.records().view(), train.targets().view()))
    {
        let fitted = fitted?;
        let pred = fitted.predict(valid.records().view());
        let truth: Vec<bool> = valid.targets().iter().copied().collect();
        scores.push(accuracy(&pred.to_vec(), &truth));
    }
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Score with k-fold cross-validation, then refit on the full training set.
pub fn train(
    spec: &PipelineSpec,
    x: &Array2<f64>,
    y: &Array1<bool>,
    k: usize,
) -> Result<(FittedPipeline, f64)> {
    let score = cross_validate(spec, x, y, k)?;
    let fitted = spec.fit(x.view(), y.view())?;
    Ok((fitted, score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Kernel, SvcParams};
    use ndarray::Array2 as Matrix;

    fn separable_data(n: usize) -> (Matrix<f64>, Array1<bool>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n {
            let flip = i % 2 == 0;
            let base = if flip { 0.0 } else { 5.0 };
            let jitter = (i % 7) as f64 * 0.1;
            rows.extend([base + jitter, base - jitter]);
            labels.push(!flip);
        }
        (
            Matrix::from_shape_vec((n, 2), rows).unwrap(),
            Array1::from(labels),
        )
    }

    fn spec(kernel: Kernel) -> PipelineSpec {
        let params = SvcParams {
            kernel,
            ..SvcParams::default()
        };
        PipelineSpec::new(params, vec![0, 1])
    }

    #[test]
    fn cross_validation_scores_separable_data_highly() {
        let (x, y) = separable_data(40);
        let score = cross_validate(&spec(Kernel::Linear), &x, &y, CV_FOLDS).unwrap();
        assert!(score > 0.9, "score was {score}");
        assert!(score <= 1.0);
    }

    #[test]
    fn too_few_rows_for_folds_is_an_error() {
        let (x, y) = separable_data(6);
        let err = cross_validate(&spec(Kernel::Linear), &x, &y, CV_FOLDS).unwrap_err();
        assert!(err.to_string().contains("folds"));
    }

    #[test]
    fn fewer_than_two_folds_is_an_error() {
        let (x, y) = separable_data(20);
        assert!(cross_validate(&spec(Kernel::Linear), &x, &y, 1).is_err());
    }

    #[test]
    fn train_returns_model_fit_on_all_rows() {
        let (x, y) = separable_data(40);
        let (fitted, score) = train(&spec(Kernel::Linear), &x, &y, CV_FOLDS).unwrap();
        assert!((0.0..=1.0).contains(&score));
        // The exported model sees every training row, so it separates them.
        let pred = fitted.predict(x.view());
        assert_eq!(pred.to_vec(), y.to_vec());
    }

    #[test]
    fn train_propagates_fold_errors() {
        let (x, y) = separable_data(4);
        assert!(train(&spec(Kernel::Linear), &x, &y, CV_FOLDS).is_err());
    }
}
