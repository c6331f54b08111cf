#![cfg(feature = "backend-tract")]

//! Tract-based classifier backend.
//!
//! Loads a serialized ONNX classifier from disk and runs it on preprocessed
//! NHWC tensors. The optimized plan and its buffers are built once here;
//! `infer` only copies the input and executes.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::classify::backend::ClassifierBackend;
use crate::classify::preprocess::{InputTensor, INPUT_HEIGHT, INPUT_WIDTH};

pub struct TractClassifier {
    plan: TypedRunnableModel<TypedModel>,
    class_count: Option<usize>,
}

impl TractClassifier {
    /// Load the model file and prepare an optimized, runnable plan.
    /// A missing or malformed model file is fatal to the caller.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let plan = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| {
                format!("failed to load classifier model {}", model_path.display())
            })?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, 3),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize classifier model")?
            .into_runnable()
            .context("failed to build runnable classifier model")?;

        let class_count = plan
            .model()
            .output_fact(0)
            .ok()
            .and_then(|fact| fact.shape.as_concrete())
            .and_then(|shape| shape.last().copied());

        Ok(Self { plan, class_count })
    }

    fn build_input(&self, input: &InputTensor) -> Result<Tensor> {
        let (batch, height, width, channels) = input.shape();
        let array = tract_ndarray::Array4::from_shape_vec(
            (batch, height, width, channels),
            input.values().to_vec(),
        )
        .context("input tensor has unexpected length")?;
        Ok(array.into_tensor())
    }
}

impl ClassifierBackend for TractClassifier {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn class_count(&self) -> Option<usize> {
        self.class_count
    }

    fn infer(&mut self, input: &InputTensor) -> Result<Vec<f32>> {
        let tensor = self.build_input(input)?;
        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .context("classifier inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let scores = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        Ok(scores.iter().copied().collect())
    }
}
