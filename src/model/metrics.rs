//! Classification metrics over boolean predictions.

/// Fraction of predictions equal to the ground truth. Empty input scores 0.
pub fn accuracy(pred: &[bool], truth: &[bool]) -> f64 {
    if pred.is_empty() || pred.len() != truth.len() {
        return 0.0;
    }
    let hits = pred.iter().zip(truth).filter(|(p, t)| p == t).count();
    hits as f64 / pred.len() as f64
}

/// Precision, recall, and f1 for one class, with its support.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    /// Metrics for the class encoded as `class`. Division by zero yields 0.
    fn compute(pred: &[bool], truth: &[bool], class: bool) -> Self {
        let tp = pred
            .iter()
            .zip(truth)
            .filter(|(p, t)| **p == class && **t == class)
            .count();
        let predicted = pred.iter().filter(|p| **p == class).count();
        let support = truth.iter().filter(|t| **t == class).count();

        let precision = ratio(tp, predicted);
        let recall = ratio(tp, support);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f1,
            support,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// F1 averaged over both classes, weighted by class support.
pub fn weighted_f1(pred: &[bool], truth: &[bool]) -> f64 {
    let neg = ClassMetrics::compute(pred, truth, false);
    let pos = ClassMetrics::compute(pred, truth, true);
    let total = neg.support + pos.support;
    if total == 0 {
        return 0.0;
    }
    (neg.f1 * neg.support as f64 + pos.f1 * pos.support as f64) / total as f64
}

/// Per-class metrics table with accuracy, macro, and weighted averages.
pub fn classification_report(pred: &[bool], truth: &[bool], classes: &[String; 2]) -> String {
    let neg = ClassMetrics::compute(pred, truth, false);
    let pos = ClassMetrics::compute(pred, truth, true);
    let total = neg.support + pos.support;
    let total_f = total.max(1) as f64;

    let macro_avg = ClassMetrics {
        precision: (neg.precision + pos.precision) / 2.0,
        recall: (neg.recall + pos.recall) / 2.0,
        f1: (neg.f1 + pos.f1) / 2.0,
        support: total,
    };
    let weighted_avg = ClassMetrics {
        precision: (neg.precision * neg.support as f64 + pos.precision * pos.support as f64)
            / total_f,
        recall: (neg.recall * neg.support as f64 + pos.recall * pos.support as f64) / total_f,
        f1: (neg.f1 * neg.support as f64 + pos.f1 * pos.support as f64) / total_f,
        support: total,
    };

    let width = classes.iter().map(|c| c.len()).max().unwrap_or(0).max(12);
    let mut out = String::new();
    out.push_str(&format!(
        "{:>width$}  precision    recall  f1-score   support\n\n",
        "",
    ));
    for (name, m) in [(classes[0].as_str(), neg), (classes[1].as_str(), pos)] {
        out.push_str(&format!(
            "{name:>width$}  {:>9.2}  {:>8.2}  {:>8.2}  {:>8}\n",
            m.precision, m.recall, m.f1, m.support,
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "{:>width$}  {:>9}  {:>8}  {:>8.2}  {:>8}\n",
        "accuracy",
        "",
        "",
        accuracy(pred, truth),
        total,
    ));
    for (name, m) in [("macro avg", macro_avg), ("weighted avg", weighted_avg)] {
        out.push_str(&format!(
            "{name:>width$}  {:>9.2}  {:>8.2}  {:>8.2}  {:>8}\n",
            m.precision, m.recall, m.f1, m.support,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn classes() -> [String; 2] {
        ["no".to_string(), "yes".to_string()]
    }

    #[test]
    fn accuracy_counts_matches() {
        let pred = [true, false, true, true];
        let truth = [true, false, false, true];
        assert_relative_eq!(accuracy(&pred, &truth), 0.75);
    }

    #[test]
    fn accuracy_of_empty_input_is_zero() {
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn perfect_predictions_score_one() {
        let truth = [true, false, true, false];
        assert_relative_eq!(weighted_f1(&truth, &truth), 1.0);
        assert_relative_eq!(accuracy(&truth, &truth), 1.0);
    }

    #[test]
    fn class_metrics_handle_missing_class() {
        // Nothing predicted positive, so positive precision/recall are 0.
        let pred = [false, false, false];
        let truth = [true, false, false];
        let pos = ClassMetrics::compute(&pred, &truth, true);
        assert_eq!(pos.precision, 0.0);
        assert_eq!(pos.recall, 0.0);
        assert_eq!(pos.f1, 0.0);
        assert_eq!(pos.support, 1);
    }

    #[test]
    fn weighted_f1_weights_by_support() {
        let pred = [true, true, true, false];
        let truth = [true, true, false, false];
        let neg = ClassMetrics::compute(&pred, &truth, false);
        let pos = ClassMetrics::compute(&pred, &truth, true);
        let expected = (neg.f1 * 2.0 + pos.f1 * 2.0) / 4.0;
        assert_relative_eq!(weighted_f1(&pred, &truth), expected);
    }

    #[test]
    fn report_lists_both_classes_and_averages() {
        let pred = [true, false, true, true];
        let truth = [true, false, false, true];
        let report = classification_report(&pred, &truth, &classes());
        assert!(report.contains("precision    recall  f1-score   support"));
        assert!(report.contains("no"));
        assert!(report.contains("yes"));
        assert!(report.contains("accuracy"));
        assert!(report.contains("macro avg"));
        assert!(report.contains("weighted avg"));
    }

    #[test]
    fn report_widens_for_long_class_names() {
        let classes = ["a_rather_long_class_name".to_string(), "b".to_string()];
        let report = classification_report(&[true, false], &[true, false], &classes);
        assert!(report.contains("a_rather_long_class_name"));
    }
}
