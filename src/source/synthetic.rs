//! Synthetic frame source for tests and headless runs.
//!
//! Produces deterministic test-pattern frames, then reports end-of-stream
//! after a configurable frame budget, mimicking a camera whose grab starts
//! failing mid-session.

use anyhow::Result;

use crate::frame::Frame;
use crate::source::FrameSource;

pub struct SyntheticSource {
    width: u32,
    height: u32,
    /// Frames still to be produced before the stream "ends". `None` means
    /// the stream never ends on its own.
    remaining: Option<u64>,
    frame_count: u64,
    released: bool,
}

impl SyntheticSource {
    /// Endless synthetic stream.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            remaining: None,
            frame_count: 0,
            released: false,
        }
    }

    /// Stream that yields exactly `frames` frames, then end-of-stream.
    pub fn with_frame_budget(width: u32, height: u32, frames: u64) -> Self {
        Self {
            remaining: Some(frames),
            ..Self::new(width, height)
        }
    }

    /// Total frames handed out so far.
    pub fn frames_produced(&self) -> u64 {
        self.frame_count
    }

    /// Whether `release` has been called.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        if self.released {
            return Ok(None);
        }
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return Ok(None);
            }
            *remaining -= 1;
        }
        self.frame_count += 1;
        Ok(Some(Frame::test_pattern(
            self.width,
            self.height,
            self.frame_count,
        )))
    }

    fn release(&mut self) {
        if !self.released {
            log::debug!("synthetic source released after {} frames", self.frame_count);
        }
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_distinct_frames() -> Result<()> {
        let mut source = SyntheticSource::new(16, 16);
        assert_eq!(source.name(), "synthetic");
        let a = source.read()?.expect("frame");
        let b = source.read()?.expect("frame");
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn frame_budget_ends_the_stream() -> Result<()> {
        let mut source = SyntheticSource::with_frame_budget(16, 16, 2);
        assert!(source.read()?.is_some());
        assert!(source.read()?.is_some());
        assert!(source.read()?.is_none());
        assert!(source.read()?.is_none());
        assert_eq!(source.frames_produced(), 2);
        Ok(())
    }

    #[test]
    fn release_stops_reads() -> Result<()> {
        let mut source = SyntheticSource::new(16, 16);
        source.release();
        assert!(source.is_released());
        assert!(source.read()?.is_none());
        Ok(())
    }
}
