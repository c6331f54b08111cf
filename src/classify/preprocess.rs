//! Frame preprocessing for the classifier.
//!
//! The model takes a single-item NHWC batch of 224x224 RGB pixels,
//! normalized from [0, 255] to approximately [-1, 1] via `(p / 127) - 1`.
//! The transform is deterministic: identical frames produce bit-identical
//! tensors.

use anyhow::Result;
use image::imageops::{self, FilterType};

use crate::frame::Frame;

/// Model input width in pixels.
pub const INPUT_WIDTH: u32 = 224;
/// Model input height in pixels.
pub const INPUT_HEIGHT: u32 = 224;
const CHANNELS: usize = 3;

/// Single-item NHWC batch tensor, shape `1 x 224 x 224 x 3`.
#[derive(Clone, Debug, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
}

impl InputTensor {
    /// Flat tensor values in NHWC order.
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Tensor shape as `(batch, height, width, channels)`.
    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, CHANNELS)
    }
}

/// Resize a frame to the model's input dimensions and normalize it.
pub fn preprocess(frame: &Frame) -> Result<InputTensor> {
    let resized = if frame.width == INPUT_WIDTH && frame.height == INPUT_HEIGHT {
        frame.to_image()
    } else {
        imageops::resize(
            &frame.to_image(),
            INPUT_WIDTH,
            INPUT_HEIGHT,
            FilterType::Triangle,
        )
    };

    let data = resized
        .as_raw()
        .iter()
        .map(|&p| (p as f32 / 127.0) - 1.0)
        .collect();

    Ok(InputTensor { data })
}
