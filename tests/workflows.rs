//! End-to-end workflow scenarios against the synthetic collaborators.

use anyhow::Result;

use maskcam::workflow::{CaptureExit, ClassifyExit};
use maskcam::{
    run_capture, run_classify, CaptureSettings, HeadlessDisplay, LabelTable, StubClassifier,
    SyntheticSource, KEY_CANCEL, KEY_CAPTURE, KEY_QUIT,
};

fn capture_settings(dir: &std::path::Path) -> CaptureSettings {
    CaptureSettings {
        dataset_dir: dir.to_string_lossy().into_owned(),
        ..CaptureSettings::default()
    }
}

#[test]
fn capture_session_writes_three_sequential_photos() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let label_dir = dir.path().join("with_mask");
    std::fs::create_dir_all(&label_dir)?;

    let mut source = SyntheticSource::new(640, 480);
    let mut display = HeadlessDisplay::with_keys([
        None,
        Some(KEY_CAPTURE),
        Some(b'x'), // unrelated key, no side effect
        Some(KEY_CAPTURE),
        Some(KEY_CAPTURE),
        Some(KEY_CANCEL),
    ]);

    let report = run_capture(
        &mut source,
        &mut display,
        &capture_settings(dir.path()),
        "with_mask",
    )?;

    assert_eq!(report.exit, CaptureExit::Cancelled);
    assert_eq!(
        report.saved,
        vec![
            label_dir.join("image_0.jpg"),
            label_dir.join("image_1.jpg"),
            label_dir.join("image_2.jpg"),
        ]
    );
    for path in &report.saved {
        assert!(path.exists());
    }
    assert!(source.is_released());
    assert!(display.is_destroyed());
    Ok(())
}

#[test]
fn restarted_capture_session_resumes_the_counter() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("without_mask"))?;
    let settings = capture_settings(dir.path());

    // first session: two photos
    let mut source = SyntheticSource::new(64, 48);
    let mut display = HeadlessDisplay::with_keys([
        Some(KEY_CAPTURE),
        Some(KEY_CAPTURE),
        Some(KEY_CANCEL),
    ]);
    run_capture(&mut source, &mut display, &settings, "without_mask")?;

    // second session must not overwrite them
    let mut source = SyntheticSource::new(64, 48);
    let mut display = HeadlessDisplay::with_keys([Some(KEY_CAPTURE), Some(KEY_CANCEL)]);
    let report = run_capture(&mut source, &mut display, &settings, "without_mask")?;

    assert_eq!(
        report.saved,
        vec![dir.path().join("without_mask").join("image_2.jpg")]
    );
    Ok(())
}

#[test]
fn classify_session_overlays_prediction_and_fps() -> Result<()> {
    let labels = LabelTable::parse("0 no_mask\n1 mask\n2 incorrect\n")?;
    let mut source = SyntheticSource::new(640, 480);
    let mut display = HeadlessDisplay::with_keys([None, None, Some(KEY_QUIT)]);
    let mut backend = StubClassifier::new([
        vec![0.1, 0.85, 0.05],
        vec![0.6, 0.3, 0.1],
        vec![0.2, 0.1, 0.7],
    ]);

    let report = run_classify(&mut source, &mut display, &mut backend, &labels, "demo")?;

    assert_eq!(report.exit, ClassifyExit::Quit);
    assert_eq!(report.frames, 3);
    assert_eq!(backend.calls(), 3);

    let overlays = display.overlays();
    assert_eq!(overlays.len(), 3);
    // first iteration reports the FPS sentinel, later ones a measured value
    assert_eq!(overlays[0], "mask : 0.850 , FPS -1");
    assert!(overlays[1].starts_with("no_mask : 0.600 , FPS "));
    assert!(!overlays[1].ends_with("FPS -1"));
    assert!(overlays[2].starts_with("incorrect : 0.700 , FPS "));

    assert!(source.is_released());
    assert!(display.is_destroyed());
    Ok(())
}

#[test]
fn classify_session_ends_when_the_stream_does() -> Result<()> {
    let labels = LabelTable::parse("0 no_mask\n1 mask\n")?;
    let mut source = SyntheticSource::with_frame_budget(64, 48, 1);
    let mut display = HeadlessDisplay::new();
    let mut backend = StubClassifier::new([vec![0.9, 0.1]]);

    let report = run_classify(&mut source, &mut display, &mut backend, &labels, "demo")?;

    assert_eq!(report.exit, ClassifyExit::StreamEnded);
    assert_eq!(report.frames, 1);
    assert!(source.is_released());
    assert!(display.is_destroyed());
    Ok(())
}
