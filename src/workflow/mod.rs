//! The two demo loops, generic over the collaborator traits so they run
//! identically against real hardware and the synthetic/headless test
//! implementations.

pub mod capture;
pub mod classify;

pub use capture::{run_capture, CaptureExit, CaptureReport};
pub use classify::{run_classify, ClassifyExit, ClassifyReport};
