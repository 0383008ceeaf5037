//! ONNX artifact loading and batch scoring.

use crate::domains::{DomainDescriptor, ModelFamily};
use crate::error::{PipelineError, Result};
use crate::models::handle::ScoringModel;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

/// A scoring artifact backed by an ONNX Runtime session.
pub struct OnnxScorer {
    name: String,
    session: Mutex<Session>,
    input_name: String,
    arity: usize,
    family: ModelFamily,
}

impl OnnxScorer {
    /// Load the artifact once per process lifetime.
    ///
    /// Fails fast and loudly: a missing file or a feature-version tag
    /// that disagrees with the domain's contract is a startup error,
    /// never a silent stream of zero scores later.
    pub fn load<P: AsRef<Path>>(
        path: P,
        domain: &DomainDescriptor,
        intra_threads: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::ModelLoad(format!(
                "artifact not found: {}",
                path.display()
            )));
        }

        ort::init().commit();

        let session = Session::builder()
            .map_err(|e| PipelineError::ModelLoad(format!("failed to load {}: {e}", path.display())))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| PipelineError::ModelLoad(format!("failed to load {}: {e}", path.display())))?
            .with_intra_threads(intra_threads)
            .map_err(|e| PipelineError::ModelLoad(format!("failed to load {}: {e}", path.display())))?
            .commit_from_file(path)
            .map_err(|e| {
                PipelineError::ModelLoad(format!("failed to load {}: {e}", path.display()))
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "float_input".to_string());

        check_feature_version(&session, domain)?;

        info!(
            domain = domain.key,
            path = %path.display(),
            input = %input_name,
            arity = domain.arity(),
            threads = intra_threads,
            "model artifact loaded"
        );

        Ok(Self {
            name: domain.key.to_string(),
            session: Mutex::new(session),
            input_name,
            arity: domain.arity(),
            family: domain.model_family,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The feature-engineering step is shipped alongside the artifact, not
/// baked into it; a `feature_version` metadata tag catches silent drift
/// between the two at load time. Untagged artifacts only warn.
fn check_feature_version(session: &Session, domain: &DomainDescriptor) -> Result<()> {
    match session.metadata() {
        Ok(metadata) => match metadata.custom("feature_version") {
            Some(tag) if tag != domain.feature_version => Err(PipelineError::ModelLoad(
                format!(
                    "feature version mismatch: artifact declares {tag}, pipeline expects {}",
                    domain.feature_version
                ),
            )),
            Some(_) => Ok(()),
            _ => {
                warn!(
                    domain = domain.key,
                    expected = domain.feature_version,
                    "artifact carries no feature_version tag"
                );
                Ok(())
            }
        },
        Err(e) => {
            warn!(domain = domain.key, error = %e, "artifact metadata unavailable");
            Ok(())
        }
    }
}

impl ScoringModel for OnnxScorer {
    fn arity(&self) -> usize {
        self.arity
    }

    fn family(&self) -> ModelFamily {
        self.family
    }

    fn score(&self, batch: &[Vec<f32>]) -> Result<Vec<f64>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        for vector in batch {
            if vector.len() != self.arity {
                return Err(PipelineError::ArityMismatch {
                    expected: self.arity,
                    actual: vector.len(),
                });
            }
        }

        let rows = batch.len();
        let mut data = Vec::with_capacity(rows * self.arity);
        for vector in batch {
            data.extend_from_slice(vector);
        }
        let shape = vec![rows as i64, self.arity as i64];
        let input = Tensor::from_array((shape, data))
            .map_err(|e| PipelineError::Inference(format!("failed to build input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PipelineError::Inference("model session lock poisoned".to_string()))?;
        let outputs = session.run(ort::inputs![&self.input_name => input])?;

        match self.family {
            ModelFamily::Classifier => extract_probabilities(&outputs, rows),
            ModelFamily::Regressor => extract_regression(&outputs, rows),
        }
    }
}

/// Positive-class probabilities for a batch. Handles tensor outputs
/// (`[n,2]`, `[n,1]`, `[n]`) and the `seq(map(int64,float))` layout
/// some gradient-boosting exporters emit.
fn extract_probabilities(outputs: &SessionOutputs, rows: usize) -> Result<Vec<f64>> {
    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }

        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            return tensor_scores(shape, data, rows, true);
        }

        if DynSequenceValueType::can_downcast(&output.dtype()) {
            if let Ok(scores) = sequence_scores(&output, rows) {
                return Ok(scores);
            }
        }
    }

    Err(PipelineError::Inference(
        "no probability output found in model results".to_string(),
    ))
}

/// Raw regression outputs for a batch (`[n,1]` or `[n]`).
fn extract_regression(outputs: &SessionOutputs, rows: usize) -> Result<Vec<f64>> {
    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            return tensor_scores(shape, data, rows, false);
        }
    }

    Err(PipelineError::Inference(
        "no regression output found in model results".to_string(),
    ))
}

fn tensor_scores(
    shape: &ort::value::Shape,
    data: &[f32],
    rows: usize,
    positive_class: bool,
) -> Result<Vec<f64>> {
    let dims: Vec<i64> = shape.iter().copied().collect();
    let per_row = match dims.as_slice() {
        [_, cols] => *cols as usize,
        _ if rows > 0 => data.len() / rows,
        _ => 0,
    };

    if per_row == 0 || data.len() < rows * per_row {
        return Err(PipelineError::Inference(format!(
            "unexpected output shape {dims:?} for {rows} rows"
        )));
    }

    let scores = (0..rows)
        .map(|i| {
            let row = &data[i * per_row..(i + 1) * per_row];
            let value = if positive_class && per_row >= 2 {
                row[1]
            } else {
                row[0]
            };
            value as f64
        })
        .collect();
    Ok(scores)
}

fn sequence_scores(output: &ort::value::DynValue, rows: usize) -> Result<Vec<f64>> {
    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| PipelineError::Inference(format!("sequence downcast failed: {e}")))?;
    let maps = sequence.try_extract_sequence::<DynMapValueType>()?;

    if maps.len() != rows {
        return Err(PipelineError::Inference(format!(
            "sequence output has {} entries for {rows} rows",
            maps.len()
        )));
    }

    maps.iter()
        .map(|map| {
            let pairs = map.try_extract_key_values::<i64, f32>()?;
            for (class, prob) in &pairs {
                if *class == 1 {
                    return Ok(*prob as f64);
                }
            }
            for (class, prob) in &pairs {
                if *class == 0 {
                    return Ok(1.0 - *prob as f64);
                }
            }
            Err(PipelineError::Inference(
                "no class probability in map output".to_string(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_fails_fast() {
        let err = OnnxScorer::load("models/does_not_exist.onnx", &crate::domains::VESSEL, 1)
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::ModelLoad(_)));
        assert!(err.to_string().contains("does_not_exist.onnx"));
    }
}
