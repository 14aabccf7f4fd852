//! Macro-averaged precision, recall and F1 over class labels.
//!
//! Every match result contributes one (true class, predicted label) pair. A
//! pair whose predicted label equals its true class is a true positive for
//! that class. Any other pair is a false negative for the true class and, when
//! the predicted label is a real class, a false positive for that class.
//! [`MatchedLabel::Unmatched`](crate::types::MatchedLabel::Unmatched) is never a class of its own.

use std::collections::HashMap;

use crate::metrics::f1_score::calculate_f1_from_pr;
use crate::metrics::precision_recall::calculate_precision_recall;
use crate::types::{ClassScore, MatchResult, ScoreReport};

/// Ordered mapping from class name to a dense index.
///
/// Indices are assigned in first-seen order and never change once assigned.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `name`, registering it if it is new.
    pub fn register(&mut self, name: &str) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.indices.insert(name.to_string(), index);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Class names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ClassRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for name in iter {
            registry.register(name.as_ref());
        }
        registry
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

/// Compute per-class scores for a sequence of match results.
///
/// Classes appear in first-seen order across the ground-truth and matched
/// labels.
///
/// # Example
///
/// ```
/// use shelf_eval::metrics::macro_average::per_class_scores;
/// use shelf_eval::types::{MatchResult, MatchedLabel};
///
/// let matches = vec![MatchResult {
///     ground_truth_class: "cat".to_string(),
///     matched: MatchedLabel::Unmatched,
///     iou: 0.0,
///     prediction_index: None,
/// }];
/// let scores = per_class_scores(&matches);
/// assert_eq!(scores.len(), 1);
/// assert_eq!(scores[0].false_negatives, 1);
/// ```
pub fn per_class_scores(matches: &[MatchResult]) -> Vec<ClassScore> {
    let mut registry = ClassRegistry::new();
    let mut counts: Vec<Counts> = Vec::new();

    for m in matches {
        let truth = registry.register(&m.ground_truth_class);
        let predicted = m.matched.class().map(|name| registry.register(name));
        counts.resize(registry.len(), Counts::default());

        match predicted {
            Some(predicted) if predicted == truth => counts[truth].tp += 1,
            Some(predicted) => {
                counts[truth].fn_ += 1;
                counts[predicted].fp += 1;
            }
            None => counts[truth].fn_ += 1,
        }
    }

    registry
        .names()
        .iter()
        .zip(counts)
        .map(|(class, c)| {
            let pr = calculate_precision_recall(c.tp, c.fp, c.fn_);
            ClassScore {
                class: class.clone(),
                precision: pr.precision,
                recall: pr.recall,
                f1: calculate_f1_from_pr(&pr),
                true_positives: pr.true_positives,
                false_positives: pr.false_positives,
                false_negatives: pr.false_negatives,
            }
        })
        .collect()
}

/// Unweighted mean of per-class precision, recall and F1.
///
/// Returns all zeros when there are no classes.
pub fn macro_average(per_class: &[ClassScore]) -> ScoreReport {
    if per_class.is_empty() {
        return ScoreReport::default();
    }

    #[allow(clippy::cast_precision_loss)]
    let n = per_class.len() as f64;
    let (precision, recall, f1) = per_class.iter().fold((0.0, 0.0, 0.0), |acc, s| {
        (acc.0 + s.precision, acc.1 + s.recall, acc.2 + s.f1)
    });

    ScoreReport {
        precision: precision / n,
        recall: recall / n,
        f1: f1 / n,
    }
}

/// Score a sequence of (true class, matched label) pairs.
pub fn score_matches(matches: &[MatchResult]) -> ScoreReport {
    macro_average(&per_class_scores(matches))
}
