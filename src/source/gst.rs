#![cfg(feature = "camera-gstreamer")]

//! GStreamer camera source.
//!
//! Drives the on-board CSI camera through an `nvarguscamerasrc` pipeline
//! terminated by an `appsink` that delivers tightly packed RGB frames. The
//! pipeline description is rendered from structured `CameraSettings`; no
//! other part of the crate ever sees or parses the pipeline string.

use anyhow::{anyhow, Context, Result};
use gstreamer::prelude::*;

use crate::config::CameraSettings;
use crate::frame::Frame;
use crate::source::FrameSource;

pub struct GstCameraSource {
    settings: CameraSettings,
    pipeline: gstreamer::Pipeline,
    appsink: gstreamer_app::AppSink,
    frame_count: u64,
    stream_over: bool,
    released: bool,
}

impl GstCameraSource {
    /// Build and start the camera pipeline. Failure to construct or start
    /// the pipeline is fatal to the caller; there is no retry.
    pub fn open(settings: CameraSettings) -> Result<Self> {
        gstreamer::init().context("initialize gstreamer")?;

        let description = pipeline_description(&settings);
        let pipeline = gstreamer::parse_launch(&description)
            .context("build camera pipeline")?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| anyhow!("camera pipeline is not a Pipeline"))?;

        let appsink = pipeline
            .by_name("appsink")
            .context("appsink element missing from pipeline")?
            .downcast::<gstreamer_app::AppSink>()
            .map_err(|_| anyhow!("appsink element has unexpected type"))?;

        let caps = gstreamer::Caps::builder("video/x-raw")
            .field("format", "RGB")
            .build();
        appsink.set_caps(Some(&caps));
        appsink.set_max_buffers(1);
        appsink.set_drop(true);
        appsink.set_sync(false);

        pipeline
            .set_state(gstreamer::State::Playing)
            .context("set camera pipeline to Playing")?;
        log::info!(
            "camera stream open: {}x{}@{} -> {}x{}",
            settings.capture_width,
            settings.capture_height,
            settings.framerate,
            settings.output_width,
            settings.output_height
        );

        Ok(Self {
            settings,
            pipeline,
            appsink,
            frame_count: 0,
            stream_over: false,
            released: false,
        })
    }

    /// Drain pending bus messages; a posted error or EOS ends the stream.
    fn poll_bus(&mut self) {
        let Some(bus) = self.pipeline.bus() else {
            return;
        };
        while let Some(message) = bus.timed_pop(gstreamer::ClockTime::ZERO) {
            use gstreamer::MessageView;
            match message.view() {
                MessageView::Error(err) => {
                    log::error!(
                        "gstreamer error from {:?}: {}",
                        err.src().map(|s| s.path_string()),
                        err.error()
                    );
                    self.stream_over = true;
                }
                MessageView::Eos(..) => {
                    log::warn!("camera stream reached EOS");
                    self.stream_over = true;
                }
                _ => {}
            }
        }
    }

    fn grab_timeout(&self) -> gstreamer::ClockTime {
        // Four frame intervals, floored at half a second.
        let interval_ms = if self.settings.framerate == 0 {
            500
        } else {
            (1000 / self.settings.framerate).saturating_mul(4)
        };
        gstreamer::ClockTime::from_mseconds(interval_ms.max(500) as u64)
    }
}

impl FrameSource for GstCameraSource {
    fn name(&self) -> &'static str {
        "gstreamer"
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        if self.released || self.stream_over {
            return Ok(None);
        }
        self.poll_bus();
        if self.stream_over {
            return Ok(None);
        }

        let Some(sample) = self.appsink.try_pull_sample(self.grab_timeout()) else {
            // A stalled or ended stream is end-of-session, not an error.
            log::warn!("camera stream stalled, treating as end-of-stream");
            self.stream_over = true;
            return Ok(None);
        };

        let (pixels, width, height) = sample_to_pixels(&sample)?;
        self.frame_count += 1;
        Ok(Some(Frame::from_rgb8(pixels, width, height)?))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = self.pipeline.set_state(gstreamer::State::Null) {
            log::warn!("failed to stop camera pipeline: {}", err);
        }
        log::info!("camera released after {} frames", self.frame_count);
    }
}

impl Drop for GstCameraSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Render the `nvarguscamerasrc` pipeline description from settings.
fn pipeline_description(settings: &CameraSettings) -> String {
    format!(
        "nvarguscamerasrc ! video/x-raw(memory:NVMM), width={cw}, height={ch}, \
         format=NV12, framerate={fps}/1 ! nvvidconv flip-method={flip} ! \
         video/x-raw, width={ow}, height={oh}, format=BGRx ! videoconvert ! \
         video/x-raw, format=RGB ! \
         appsink name=appsink sync=false max-buffers=1 drop=true",
        cw = settings.capture_width,
        ch = settings.capture_height,
        fps = settings.framerate,
        flip = settings.flip_method,
        ow = settings.output_width,
        oh = settings.output_height,
    )
}

/// Copy an appsink sample into a tightly packed RGB buffer, collapsing any
/// row padding the video stride introduces.
fn sample_to_pixels(sample: &gstreamer::Sample) -> Result<(Vec<u8>, u32, u32)> {
    let buffer = sample.buffer().context("camera sample missing buffer")?;
    let caps = sample.caps().context("camera sample missing caps")?;
    let info =
        gstreamer_video::VideoInfo::from_caps(caps).context("parse camera caps as video info")?;

    let width = info.width();
    let height = info.height();
    let row_bytes = (width as usize) * 3;
    let stride = info.stride(0) as usize;

    let map = buffer.map_readable().context("map camera buffer")?;
    let data = map.as_slice();

    if stride == row_bytes {
        return Ok((data.to_vec(), width, height));
    }

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        let end = start + row_bytes;
        pixels.extend_from_slice(
            data.get(start..end)
                .context("camera buffer row is out of bounds")?,
        );
    }

    Ok((pixels, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_description_renders_all_fields() {
        let desc = pipeline_description(&CameraSettings {
            capture_width: 1920,
            capture_height: 1080,
            framerate: 60,
            flip_method: 2,
            output_width: 640,
            output_height: 480,
        });
        assert!(desc.starts_with("nvarguscamerasrc"));
        assert!(desc.contains("width=1920, height=1080"));
        assert!(desc.contains("framerate=60/1"));
        assert!(desc.contains("flip-method=2"));
        assert!(desc.contains("width=640, height=480"));
        assert!(desc.contains("appsink name=appsink"));
    }
}
