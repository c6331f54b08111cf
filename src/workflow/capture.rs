//! Capture workflow: preview the camera stream, save labeled photos.
//!
//! One blocking loop: read a frame, show it, poll the keyboard. SPACE saves
//! the current frame as `dataset/<label>/image_<n>.jpg`, ESC ends the
//! session, a failed read counts as end-of-stream. The source is released
//! and the windows destroyed on every exit path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::config::CaptureSettings;
use crate::display::{DisplaySink, KEY_CANCEL, KEY_CAPTURE};
use crate::source::FrameSource;

const KEY_POLL: Duration = Duration::from_millis(1);

/// Why the capture loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureExit {
    /// The operator pressed the cancel key.
    Cancelled,
    /// A frame read failed; treated as graceful end-of-stream.
    StreamEnded,
}

#[derive(Debug)]
pub struct CaptureReport {
    /// Paths written, in capture order.
    pub saved: Vec<PathBuf>,
    pub exit: CaptureExit,
}

/// Run the capture session for one chosen label.
///
/// The target directory `dataset/<label>/` must already exist; the loop
/// writes into it but never creates it.
pub fn run_capture<S, D>(
    source: &mut S,
    display: &mut D,
    settings: &CaptureSettings,
    label: &str,
) -> Result<CaptureReport>
where
    S: FrameSource,
    D: DisplaySink,
{
    let result = capture_loop(source, display, settings, label);

    // Release on every exit path, including loop errors.
    source.release();
    let destroyed = display.destroy_all();

    let report = result?;
    destroyed?;
    Ok(report)
}

fn capture_loop<S, D>(
    source: &mut S,
    display: &mut D,
    settings: &CaptureSettings,
    label: &str,
) -> Result<CaptureReport>
where
    S: FrameSource,
    D: DisplaySink,
{
    let target_dir = Path::new(&settings.dataset_dir).join(label);
    let mut counter = next_image_index(&target_dir);
    log::info!(
        "capturing label {:?} from {} stream into {} starting at index {}",
        label,
        source.name(),
        target_dir.display(),
        counter
    );

    display.create_window(
        &settings.window_title,
        settings.window_width,
        settings.window_height,
    )?;

    let mut saved = Vec::new();
    let exit = loop {
        let frame = match source.read()? {
            Some(frame) => frame,
            None => {
                log::warn!("failed to grab frame");
                break CaptureExit::StreamEnded;
            }
        };

        display.show(&settings.window_title, &frame, None)?;

        match display.poll_key(KEY_POLL)? {
            Some(KEY_CANCEL) => {
                log::info!("escape hit, closing");
                break CaptureExit::Cancelled;
            }
            Some(KEY_CAPTURE) => {
                let path = target_dir.join(format!("image_{}.jpg", counter));
                frame.save_jpeg(&path)?;
                log::info!("{} written", path.display());
                saved.push(path);
                counter += 1;
            }
            _ => {}
        }
    };

    Ok(CaptureReport { saved, exit })
}

/// First free image index in `dir`: one past the highest existing
/// `image_<n>.jpg`, so a restarted session never overwrites prior captures.
/// An unreadable or missing directory starts at 0.
fn next_image_index(dir: &Path) -> u64 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .filter_map(|entry| parse_image_index(&entry.file_name().to_string_lossy()))
        .max()
        .map(|max| max + 1)
        .unwrap_or(0)
}

fn parse_image_index(file_name: &str) -> Option<u64> {
    file_name
        .strip_prefix("image_")?
        .strip_suffix(".jpg")?
        .parse()
        .ok()
}
