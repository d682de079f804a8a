//! The two-stage pipeline: per-column standardization feeding an SVM
//! classifier. Fit once, predict many; the fitted scaling is reapplied at
//! prediction time.

use clap::ValueEnum;
use linfa::prelude::*;
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Kernel choices for the classifier.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Poly,
    Rbf,
    Sigmoid,
    Precomputed,
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kernel::Linear => "linear",
            Kernel::Poly => "poly",
            Kernel::Rbf => "rbf",
            Kernel::Sigmoid => "sigmoid",
            Kernel::Precomputed => "precomputed",
        };
        f.write_str(name)
    }
}

/// Classifier hyperparameters, supplied by the caller and echoed verbatim
/// into the training report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvcParams {
    pub kernel: Kernel,
    pub degree: u32,
    #[serde(rename = "C")]
    pub c: f64,
    pub probability: bool,
}

impl Default for SvcParams {
    fn default() -> Self {
        Self {
            kernel: Kernel::Linear,
            degree: 3,
            c: 1.0,
            probability: true,
        }
    }
}

impl SvcParams {
    /// Reject kernels the toolkit has no equivalent for, before any data is
    /// loaded.
    pub fn validate(&self) -> Result<()> {
        match self.kernel {
            Kernel::Linear | Kernel::Poly | Kernel::Rbf => Ok(()),
            Kernel::Sigmoid | Kernel::Precomputed => Err(Error::Input(format!(
                "unsupported kernel: {}",
                self.kernel
            ))),
        }
    }
}

/// Per-column standardization (zero mean, unit variance) fitted on training
/// data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    columns: Vec<usize>,
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl StandardScaler {
    /// Fit means and population standard deviations over the given columns.
    pub fn fit(x: &ArrayView2<'_, f64>, columns: &[usize]) -> Self {
        let selected = x.select(Axis(1), columns);
        let means = selected
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(columns.len()));
        let mut stds = selected.std_axis(Axis(0), 0.0);
        // Constant columns scale by 1 so they stay finite.
        stds.mapv_inplace(|s| if s == 0.0 { 1.0 } else { s });
        Self {
            columns: columns.to_vec(),
            means,
            stds,
        }
    }

    /// Project the configured columns, in order, standardized with the
    /// fitted statistics.
    pub fn transform(&self, x: &ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = x.select(Axis(1), &self.columns);
        for (j, mut col) in out.axis_iter_mut(Axis(1)).enumerate() {
            let (mean, std) = (self.means[j], self.stds[j]);
            col.mapv_inplace(|v| (v - mean) / std);
        }
        out
    }
}

/// Two-class label encoding; classes are stored sorted, and `true` encodes
/// the lexicographically larger class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: [String; 2],
}

impl LabelEncoder {
    pub fn fit(labels: &[String]) -> Result<Self> {
        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();
        <[String; 2]>::try_from(classes)
            .map(|classes| Self { classes })
            .map_err(|classes| {
                Error::Training(format!(
                    "expected exactly 2 label classes, found {}: {:?}",
                    classes.len(),
                    classes
                ))
            })
    }

    pub fn encode(&self, labels: &[String]) -> Result<Array1<bool>> {
        labels
            .iter()
            .map(|label| {
                if *label == self.classes[1] {
                    Ok(true)
                } else if *label == self.classes[0] {
                    Ok(false)
                } else {
                    Err(Error::Training(format!(
                        "unknown label {label:?}, expected one of {:?}",
                        self.classes
                    )))
                }
            })
            .collect::<Result<Vec<bool>>>()
            .map(Array1::from)
    }

    pub fn decode(&self, flag: bool) -> &str {
        &self.classes[usize::from(flag)]
    }

    pub fn classes(&self) -> &[String; 2] {
        &self.classes
    }
}

/// Unfitted pipeline: classifier hyperparameters plus the numeric column
/// indices to standardize.
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    params: SvcParams,
    numeric_columns: Vec<usize>,
}

impl PipelineSpec {
    pub fn new(params: SvcParams, numeric_columns: Vec<usize>) -> Self {
        Self {
            params,
            numeric_columns,
        }
    }

    pub fn params(&self) -> &SvcParams {
        &self.params
    }

    /// Fit the scaler on `x`, then the classifier on the scaled features.
    pub fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, bool>) -> Result<FittedPipeline> {
        let scaler = StandardScaler::fit(&x, &self.numeric_columns);
        let scaled = scaler.transform(&x);
        let svm = self.fit_classifier(scaled, y.to_owned())?;
        Ok(FittedPipeline {
            scaler,
            svm,
            params: self.params.clone(),
        })
    }

    fn fit_classifier(&self, scaled: Array2<f64>, y: Array1<bool>) -> Result<Svm<f64, bool>> {
        let base = Svm::<f64, bool>::params().pos_neg_weights(self.params.c, self.params.c);
        let configured = match self.params.kernel {
            Kernel::Linear => base.linear_kernel(),
            Kernel::Poly => base.polynomial_kernel(0.0, f64::from(self.params.degree)),
            Kernel::Rbf => base.gaussian_kernel(gaussian_eps(&scaled)),
            Kernel::Sigmoid | Kernel::Precomputed => {
                return Err(Error::Input(format!(
                    "unsupported kernel: {}",
                    self.params.kernel
                )))
            }
        };
        let dataset = Dataset::new(scaled, y);
        configured
            .fit(&dataset)
            .map_err(|e| Error::Training(e.to_string()))
    }
}

/// Gaussian kernel width from the scale heuristic 1 / (n_features * var),
/// inverted to the toolkit's eps parameterization.
fn gaussian_eps(x: &Array2<f64>) -> f64 {
    let eps = x.ncols() as f64 * x.var(0.0);
    if eps.is_finite() && eps > 0.0 {
        eps
    } else {
        1.0
    }
}

/// Fitted scaler + classifier. Created once per run, immutable after fit,
/// exported exactly once.
#[derive(Serialize, Deserialize)]
pub struct FittedPipeline {
    scaler: StandardScaler,
    svm: Svm<f64, bool>,
    params: SvcParams,
}

impl FittedPipeline {
    /// Apply the fitted scaling, then classify.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<bool> {
        let scaled = self.scaler.transform(&x);
        self.svm.predict(&scaled)
    }

    pub fn params(&self) -> &SvcParams {
        &self.params
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Portable binary blob for export.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }
}
