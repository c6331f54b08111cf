//! Classification workflow: per-frame inference with a diagnostics overlay.
//!
//! One blocking loop: read a frame, preprocess, run the classifier, pick
//! the top class, show the frame with the overlay line, poll the quit key.
//! Each iteration is timed; the overlay reports the previous iteration's
//! FPS, with the sentinel -1 on the first frame. A failed read ends the
//! session cleanly, identical to the capture workflow.

use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::classify::{preprocess, ClassifierBackend, FpsMeter, LabelTable, Prediction};
use crate::display::{DisplaySink, KEY_QUIT};
use crate::source::FrameSource;

const KEY_POLL: Duration = Duration::from_millis(1);
const WINDOW_WIDTH: u32 = 640;
const WINDOW_HEIGHT: u32 = 480;

/// Why the classification loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassifyExit {
    /// The operator pressed the quit key.
    Quit,
    /// A frame read failed; treated as graceful end-of-stream.
    StreamEnded,
}

#[derive(Debug)]
pub struct ClassifyReport {
    /// Frames classified and displayed.
    pub frames: u64,
    pub exit: ClassifyExit,
}

/// Run the classification session.
pub fn run_classify<S, D, B>(
    source: &mut S,
    display: &mut D,
    backend: &mut B,
    labels: &LabelTable,
    window_title: &str,
) -> Result<ClassifyReport>
where
    S: FrameSource,
    D: DisplaySink,
    B: ClassifierBackend,
{
    let result = classify_loop(source, display, backend, labels, window_title);

    // Release on every exit path, including loop errors.
    source.release();
    let destroyed = display.destroy_all();

    let report = result?;
    destroyed?;
    log::info!("quit after {} frames", report.frames);
    Ok(report)
}

fn classify_loop<S, D, B>(
    source: &mut S,
    display: &mut D,
    backend: &mut B,
    labels: &LabelTable,
    window_title: &str,
) -> Result<ClassifyReport>
where
    S: FrameSource,
    D: DisplaySink,
    B: ClassifierBackend,
{
    log::info!(
        "classifying {} stream with backend {:?}, {} labels",
        source.name(),
        backend.name(),
        labels.len()
    );

    // When the model declares its class count, a label table of a different
    // arity can only misattribute predictions; refuse to start.
    if let Some(count) = backend.class_count() {
        if count != labels.len() {
            return Err(anyhow!(
                "model scores {} classes but the label table has {} entries",
                count,
                labels.len()
            ));
        }
    }

    display.create_window(window_title, WINDOW_WIDTH, WINDOW_HEIGHT)?;

    let mut meter = FpsMeter::new();
    let mut frames = 0u64;
    let exit = loop {
        meter.begin_iteration();

        let frame = match source.read()? {
            Some(frame) => frame,
            None => {
                log::warn!("failed to grab frame");
                break ClassifyExit::StreamEnded;
            }
        };

        let input = preprocess(&frame)?;
        let scores = backend.infer(&input)?;
        let prediction = Prediction::select(&scores, labels)?;

        let overlay = prediction.overlay_text(meter.fps());
        display.show(window_title, &frame, Some(&overlay))?;
        frames += 1;

        if display.poll_key(KEY_POLL)? == Some(KEY_QUIT) {
            break ClassifyExit::Quit;
        }

        meter.end_iteration();
    };

    Ok(ClassifyReport { frames, exit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::StubClassifier;
    use crate::display::HeadlessDisplay;
    use crate::source::SyntheticSource;

    fn three_class_labels() -> LabelTable {
        LabelTable::parse("0 no_mask\n1 mask\n2 incorrect\n").expect("label table")
    }

    #[test]
    fn overlay_shows_top_class_and_sentinel_fps() -> Result<()> {
        let labels = three_class_labels();
        let mut source = SyntheticSource::new(64, 48);
        let mut display = HeadlessDisplay::with_keys([Some(KEY_QUIT)]);
        let mut backend = StubClassifier::new([vec![0.1, 0.85, 0.05]]);

        let report = run_classify(&mut source, &mut display, &mut backend, &labels, "demo")?;

        assert_eq!(report.exit, ClassifyExit::Quit);
        assert_eq!(report.frames, 1);
        assert_eq!(display.overlays(), ["mask : 0.850 , FPS -1"]);
        assert!(source.is_released());
        assert!(display.is_destroyed());
        Ok(())
    }

    #[test]
    fn read_failure_ends_the_session_cleanly() -> Result<()> {
        let labels = three_class_labels();
        let mut source = SyntheticSource::with_frame_budget(64, 48, 3);
        let mut display = HeadlessDisplay::new();
        let mut backend = StubClassifier::new([vec![0.7, 0.2, 0.1]]);

        let report = run_classify(&mut source, &mut display, &mut backend, &labels, "demo")?;

        assert_eq!(report.exit, ClassifyExit::StreamEnded);
        assert_eq!(report.frames, 3);
        assert_eq!(backend.calls(), 3);
        assert!(source.is_released());
        assert!(display.is_destroyed());

        // every frame was annotated, the first with the sentinel
        assert_eq!(display.overlays().len(), 3);
        assert!(display.overlays()[0].ends_with("FPS -1"));
        for overlay in display.overlays() {
            assert!(overlay.starts_with("no_mask : 0.700"));
        }
        Ok(())
    }

    #[test]
    fn backend_error_still_releases_resources() {
        let labels = three_class_labels();
        let mut source = SyntheticSource::new(64, 48);
        let mut display = HeadlessDisplay::new();
        let mut backend = StubClassifier::new([]); // errors on first call

        let result = run_classify(&mut source, &mut display, &mut backend, &labels, "demo");

        assert!(result.is_err());
        assert!(source.is_released());
        assert!(display.is_destroyed());
    }

    #[test]
    fn label_table_arity_mismatch_fails_before_reading_frames() {
        let labels = LabelTable::parse("0 no_mask\n1 mask\n").expect("label table");
        let mut source = SyntheticSource::new(64, 48);
        let mut display = HeadlessDisplay::new();
        let mut backend = StubClassifier::new([vec![0.1, 0.85, 0.05]]);

        let result = run_classify(&mut source, &mut display, &mut backend, &labels, "demo");

        assert!(result.is_err());
        // the mismatch is caught at session start, not mid-stream
        assert_eq!(source.frames_produced(), 0);
        assert_eq!(backend.calls(), 0);
        assert!(source.is_released());
        assert!(display.is_destroyed());
    }
}
