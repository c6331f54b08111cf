#![cfg(feature = "display-opencv")]

//! OpenCV highgui display sink.
//!
//! Renders frames into resizable highgui windows, draws the overlay text
//! with `putText`, and polls the keyboard through `waitKey`.

use std::time::Duration;

use anyhow::{Context, Result};
use opencv::core::{Point, Scalar};
use opencv::prelude::*;
use opencv::{highgui, imgproc};

use crate::display::DisplaySink;
use crate::frame::Frame;

/// Overlay anchor, in pixels from the top-left corner.
const OVERLAY_ORIGIN: (i32, i32) = (10, 40);
const OVERLAY_SCALE: f64 = 1.0;
const OVERLAY_THICKNESS: i32 = 4;

#[derive(Default)]
pub struct OpencvDisplay {
    windows: Vec<String>,
}

impl OpencvDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert an RGB frame into a BGR `Mat` ready for highgui.
    fn frame_to_mat(frame: &Frame) -> Result<Mat> {
        let rgb = Mat::from_slice(frame.pixels())
            .context("wrap frame pixels as Mat")?
            .reshape(3, frame.height as i32)
            .context("reshape frame Mat")?
            .try_clone()
            .context("clone frame Mat")?;
        let mut bgr = Mat::default();
        imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)
            .context("convert frame to BGR")?;
        Ok(bgr)
    }
}

impl DisplaySink for OpencvDisplay {
    fn create_window(&mut self, name: &str, width: u32, height: u32) -> Result<()> {
        highgui::named_window(name, highgui::WINDOW_NORMAL)
            .with_context(|| format!("create window {:?}", name))?;
        highgui::resize_window(name, width as i32, height as i32)
            .with_context(|| format!("resize window {:?}", name))?;
        self.windows.push(name.to_string());
        Ok(())
    }

    fn show(&mut self, name: &str, frame: &Frame, overlay: Option<&str>) -> Result<()> {
        let mut mat = Self::frame_to_mat(frame)?;
        if let Some(text) = overlay {
            imgproc::put_text(
                &mut mat,
                text,
                Point::new(OVERLAY_ORIGIN.0, OVERLAY_ORIGIN.1),
                imgproc::FONT_HERSHEY_SIMPLEX,
                OVERLAY_SCALE,
                Scalar::new(0.0, 0.0, 255.0, 0.0),
                OVERLAY_THICKNESS,
                imgproc::LINE_8,
                false,
            )
            .context("draw overlay text")?;
        }
        highgui::imshow(name, &mat).with_context(|| format!("show frame in {:?}", name))
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<u8>> {
        let wait_ms = (timeout.as_millis() as i32).max(1);
        let key = highgui::wait_key(wait_ms).context("poll keyboard")?;
        if key < 0 {
            Ok(None)
        } else {
            Ok(Some((key % 256) as u8))
        }
    }

    fn destroy_all(&mut self) -> Result<()> {
        self.windows.clear();
        highgui::destroy_all_windows().context("destroy windows")
    }
}
