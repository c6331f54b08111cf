//! maskcam
//!
//! Capture-and-classify vision demo for a camera-equipped edge device.
//!
//! Two independent workflows, shipped as separate binaries:
//!
//! - `collect_images`: pick a class label, preview the live camera stream,
//!   and save sequentially numbered JPEG photos under `dataset/<label>/`
//!   on each capture keypress.
//! - `classify`: load a label table and a pre-built classifier model, run
//!   per-frame inference on the live stream, and overlay the predicted
//!   label, its confidence, and the instantaneous FPS on the video window.
//!
//! # Module Structure
//!
//! - `frame`: owned RGB frame type + JPEG persistence
//! - `source`: frame sources (GStreamer camera, synthetic)
//! - `display`: display sinks (OpenCV highgui, headless)
//! - `classify`: label table, preprocessing, backends, prediction
//! - `workflow`: the two loops, generic over the collaborator traits
//!
//! Hardware-facing collaborators are cargo-feature gated; the synthetic
//! source and headless sink are always available so the workflows are fully
//! testable on a machine with no camera, window system, or model file.

pub mod classify;
pub mod config;
pub mod display;
pub mod frame;
pub mod prompt;
pub mod source;
pub mod workflow;

#[cfg(feature = "backend-tract")]
pub use classify::TractClassifier;
pub use classify::{
    argmax, preprocess, ClassifierBackend, FpsMeter, InputTensor, LabelTable, Prediction,
    StubClassifier, INPUT_HEIGHT, INPUT_WIDTH,
};
pub use config::{AppConfig, CameraSettings, CaptureSettings, ClassifySettings};
#[cfg(feature = "display-opencv")]
pub use display::OpencvDisplay;
pub use display::{DisplaySink, HeadlessDisplay, KEY_CANCEL, KEY_CAPTURE, KEY_QUIT};
pub use frame::Frame;
#[cfg(feature = "camera-gstreamer")]
pub use source::GstCameraSource;
pub use source::{FrameSource, SyntheticSource};
pub use workflow::{
    run_capture, run_classify, CaptureExit, CaptureReport, ClassifyExit, ClassifyReport,
};
