//! Headless display sink for tests.
//!
//! Renders nothing; records every window, shown frame, and overlay string,
//! and replays a scripted key sequence from `poll_key`.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;

use crate::display::DisplaySink;
use crate::frame::Frame;

#[derive(Default)]
pub struct HeadlessDisplay {
    keys: VecDeque<Option<u8>>,
    windows: Vec<String>,
    shown: u64,
    overlays: Vec<String>,
    destroyed: bool,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the key sequence returned by successive `poll_key` calls.
    /// `None` entries model polls where no key was pressed. Once the script
    /// is exhausted, `poll_key` keeps returning `None`.
    pub fn with_keys<I: IntoIterator<Item = Option<u8>>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn windows(&self) -> &[String] {
        &self.windows
    }

    pub fn frames_shown(&self) -> u64 {
        self.shown
    }

    /// Overlay strings in the order they were rendered.
    pub fn overlays(&self) -> &[String] {
        &self.overlays
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl DisplaySink for HeadlessDisplay {
    fn create_window(&mut self, name: &str, _width: u32, _height: u32) -> Result<()> {
        self.windows.push(name.to_string());
        Ok(())
    }

    fn show(&mut self, _name: &str, _frame: &Frame, overlay: Option<&str>) -> Result<()> {
        self.shown += 1;
        if let Some(text) = overlay {
            self.overlays.push(text.to_string());
        }
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<u8>> {
        Ok(self.keys.pop_front().flatten())
    }

    fn destroy_all(&mut self) -> Result<()> {
        self.destroyed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{KEY_CANCEL, KEY_CAPTURE};

    #[test]
    fn replays_scripted_keys_then_none() -> Result<()> {
        let mut display = HeadlessDisplay::with_keys([None, Some(KEY_CAPTURE), Some(KEY_CANCEL)]);
        let timeout = Duration::from_millis(1);
        assert_eq!(display.poll_key(timeout)?, None);
        assert_eq!(display.poll_key(timeout)?, Some(KEY_CAPTURE));
        assert_eq!(display.poll_key(timeout)?, Some(KEY_CANCEL));
        assert_eq!(display.poll_key(timeout)?, None);
        Ok(())
    }

    #[test]
    fn records_windows_and_overlays() -> Result<()> {
        let mut display = HeadlessDisplay::new();
        display.create_window("demo", 500, 300)?;
        let frame = Frame::test_pattern(8, 8, 0);
        display.show("demo", &frame, Some("mask : 0.850 , FPS -1"))?;
        display.show("demo", &frame, None)?;
        assert_eq!(display.windows(), ["demo"]);
        assert_eq!(display.frames_shown(), 2);
        assert_eq!(display.overlays(), ["mask : 0.850 , FPS -1"]);
        Ok(())
    }
}
