//! Scripted classifier backend for tests.

use std::collections::VecDeque;

use anyhow::{anyhow, Result};

use crate::classify::backend::ClassifierBackend;
use crate::classify::preprocess::InputTensor;

/// Replays scripted probability vectors. Once the script is exhausted it
/// keeps returning the last vector, so endless loops stay deterministic.
pub struct StubClassifier {
    script: VecDeque<Vec<f32>>,
    last: Option<Vec<f32>>,
    calls: u64,
}

impl StubClassifier {
    pub fn new<I: IntoIterator<Item = Vec<f32>>>(outputs: I) -> Self {
        Self {
            script: outputs.into_iter().collect(),
            last: None,
            calls: 0,
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl ClassifierBackend for StubClassifier {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn class_count(&self) -> Option<usize> {
        self.script
            .front()
            .or(self.last.as_ref())
            .map(|v| v.len())
    }

    fn infer(&mut self, _input: &InputTensor) -> Result<Vec<f32>> {
        self.calls += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = Some(next.clone());
            return Ok(next);
        }
        self.last
            .clone()
            .ok_or_else(|| anyhow!("stub classifier has no scripted outputs"))
    }
}
