//! Classification pipeline: label table, preprocessing, inference backends,
//! and prediction selection.

pub mod backend;
pub mod backends;
pub mod labels;
pub mod predict;
pub mod preprocess;

pub use backend::ClassifierBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractClassifier;
pub use backends::StubClassifier;
pub use labels::LabelTable;
pub use predict::{argmax, FpsMeter, Prediction};
pub use preprocess::{preprocess, InputTensor, INPUT_HEIGHT, INPUT_WIDTH};
