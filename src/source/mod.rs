//! Frame sources.
//!
//! A frame source yields sequential images from a camera stream. The real
//! device backend (GStreamer, feature `camera-gstreamer`) is optional; the
//! synthetic source is always available for tests and headless runs.
//!
//! `read` returns `Ok(Some(frame))` for a good frame, `Ok(None)` when the
//! stream has ended or a frame grab failed (both workflows treat that as
//! end-of-session), and `Err` for hard source errors.

#[cfg(feature = "camera-gstreamer")]
pub mod gst;
pub mod synthetic;

use anyhow::Result;

use crate::frame::Frame;

#[cfg(feature = "camera-gstreamer")]
pub use gst::GstCameraSource;
pub use synthetic::SyntheticSource;

/// Camera stream abstraction.
pub trait FrameSource {
    /// Source identifier, for logs.
    fn name(&self) -> &'static str;

    /// Read the next frame. `Ok(None)` means the stream ended or the grab
    /// failed; callers stop reading after that.
    fn read(&mut self) -> Result<Option<Frame>>;

    /// Release the underlying stream. Called exactly once, on every
    /// loop-exit path. Further `read` calls after release return `Ok(None)`.
    fn release(&mut self);
}
