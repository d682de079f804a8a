//! Column roles for the training table.

use serde::{Deserialize, Serialize};

/// Names of the numeric feature columns and the label column.
///
/// Threaded explicitly through loading, cleaning, selection and reporting;
/// the defaults match the managed training job this binary replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Columns coerced to numeric and fed to the classifier, in order.
    pub numeric_features: Vec<String>,
    /// Label column name.
    pub label: String,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            numeric_features: (0..5).map(|i| format!("p{i}")).collect(),
            label: "text".to_string(),
        }
    }
}

impl FeatureSchema {
    /// Schema with explicit columns; `None` falls back to the defaults.
    pub fn resolve(numeric_features: Option<Vec<String>>, label: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            numeric_features: numeric_features.unwrap_or(defaults.numeric_features),
            label: label.unwrap_or(defaults.label),
        }
    }

    /// All columns selected for training. Every feature is numeric, so this
    /// is the numeric feature list itself.
    pub fn selected_columns(&self) -> &[String] {
        &self.numeric_features
    }

    /// Index positions of the numeric features within the selected columns.
    pub fn numeric_feature_indices(&self) -> Vec<usize> {
        (0..self.numeric_features.len()).collect()
    }
}
