//! Model scoring abstraction.

use crate::domains::ModelFamily;
use crate::error::Result;

/// A loaded, versioned scoring artifact.
///
/// Loaded once per process and shared read-only across concurrent
/// uploads; implementations own no per-request state. Exactly one
/// operation is exposed: scoring a whole dataset in one call —
/// row-by-row invocation would break the vectorized cost model the
/// underlying artifact relies on.
pub trait ScoringModel: Send + Sync {
    /// Number of features per input vector.
    fn arity(&self) -> usize;

    /// Model family resolved at load time: classifiers emit a
    /// probability in [0,1], regressors an unbounded quantity.
    fn family(&self) -> ModelFamily;

    /// Score every row of one dataset.
    ///
    /// Fails with [`crate::error::PipelineError::ArityMismatch`] when
    /// any vector's length differs from the artifact's arity; partial
    /// per-row success inside one call is not a valid outcome.
    fn score(&self, batch: &[Vec<f32>]) -> Result<Vec<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    struct FixedModel {
        arity: usize,
        value: f64,
    }

    impl ScoringModel for FixedModel {
        fn arity(&self) -> usize {
            self.arity
        }

        fn family(&self) -> ModelFamily {
            ModelFamily::Classifier
        }

        fn score(&self, batch: &[Vec<f32>]) -> Result<Vec<f64>> {
            for vector in batch {
                if vector.len() != self.arity {
                    return Err(PipelineError::ArityMismatch {
                        expected: self.arity,
                        actual: vector.len(),
                    });
                }
            }
            Ok(vec![self.value; batch.len()])
        }
    }

    #[test]
    fn trait_objects_share_across_threads() {
        let model: std::sync::Arc<dyn ScoringModel> =
            std::sync::Arc::new(FixedModel { arity: 2, value: 0.4 });
        let clone = model.clone();
        let handle = std::thread::spawn(move || clone.score(&[vec![1.0, 2.0]]).unwrap());
        assert_eq!(handle.join().unwrap(), vec![0.4]);
    }
}
