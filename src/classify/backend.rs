use anyhow::Result;

use crate::classify::preprocess::InputTensor;

/// Classifier backend trait.
///
/// A backend owns a loaded model plus whatever input/output buffers and
/// execution state one inference call needs. All of that is allocated once
/// at construction, never per frame: the synchronous `infer` call dominates
/// the real-time budget and must not pay allocation overhead on top.
pub trait ClassifierBackend {
    /// Backend identifier, for logs.
    fn name(&self) -> &'static str;

    /// Number of classes the model scores, when the backend knows it.
    fn class_count(&self) -> Option<usize>;

    /// Run one synchronous inference, returning the output probability
    /// vector. The input tensor is copied into the backend's pre-allocated
    /// input buffer; the call is treated as atomic and opaque.
    fn infer(&mut self, input: &InputTensor) -> Result<Vec<f32>>;
}
