//! Display sinks.
//!
//! A display sink renders frames into a named window and polls for key
//! presses. The real backend (OpenCV highgui, feature `display-opencv`) is
//! optional; the headless sink is always available for tests.

pub mod headless;
#[cfg(feature = "display-opencv")]
pub mod opencv;

use std::time::Duration;

use anyhow::Result;

use crate::frame::Frame;

pub use headless::HeadlessDisplay;
#[cfg(feature = "display-opencv")]
pub use opencv::OpencvDisplay;

/// ESC: cancels the capture session.
pub const KEY_CANCEL: u8 = 27;
/// SPACE: saves the current frame.
pub const KEY_CAPTURE: u8 = 32;
/// `q`: quits the classification session.
pub const KEY_QUIT: u8 = b'q';

/// Windowing abstraction: render frames, poll the keyboard.
pub trait DisplaySink {
    /// Create a named resizable window with an initial size.
    fn create_window(&mut self, name: &str, width: u32, height: u32) -> Result<()>;

    /// Show a frame in the named window, optionally with an overlay text
    /// line drawn at a fixed position.
    fn show(&mut self, name: &str, frame: &Frame, overlay: Option<&str>) -> Result<()>;

    /// Poll for a key press, waiting at most `timeout`. Returns the low
    /// byte of the pressed key, or `None` when no key was pressed.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<u8>>;

    /// Close every window this sink created.
    fn destroy_all(&mut self) -> Result<()>;
}
