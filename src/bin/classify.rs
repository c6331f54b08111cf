//! classify - real-time classification of camera frames with an overlay

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use maskcam::workflow::ClassifyReport;
#[cfg(feature = "display-opencv")]
use maskcam::DisplaySink;
use maskcam::{run_classify, AppConfig, FrameSource, LabelTable, SyntheticSource};

#[derive(Parser, Debug)]
#[command(
    name = "classify",
    about = "Classify live camera frames and overlay the prediction"
)]
struct Args {
    /// Optional TOML config file.
    #[arg(long, env = "MASKCAM_CONFIG")]
    config: Option<PathBuf>,
    /// Use the synthetic frame source instead of the camera.
    #[arg(long)]
    synthetic: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let cfg = AppConfig::load(args.config.as_deref())?;

    log::info!("load classifier model");
    let mut backend = open_backend(&cfg)?;

    log::info!("load labels");
    let labels = LabelTable::load(&cfg.classify.labels_path)?;

    log::info!("start stream");
    let report = if args.synthetic {
        let mut source = SyntheticSource::new(
            cfg.classify.camera.output_width,
            cfg.classify.camera.output_height,
        );
        run_with_display(&mut source, &mut backend, &labels, &cfg)?
    } else {
        #[cfg(feature = "camera-gstreamer")]
        {
            let mut source = maskcam::GstCameraSource::open(cfg.classify.camera.clone())?;
            run_with_display(&mut source, &mut backend, &labels, &cfg)?
        }
        #[cfg(not(feature = "camera-gstreamer"))]
        {
            anyhow::bail!(
                "built without the camera-gstreamer feature; rebuild with it or pass --synthetic"
            )
        }
    };

    log::info!("quit ({:?}, {} frames)", report.exit, report.frames);
    Ok(())
}

fn run_with_display<S: FrameSource, B: maskcam::ClassifierBackend>(
    source: &mut S,
    backend: &mut B,
    labels: &LabelTable,
    cfg: &AppConfig,
) -> Result<ClassifyReport> {
    let mut display = open_display()?;
    run_classify(
        source,
        &mut display,
        backend,
        labels,
        &cfg.classify.window_title,
    )
}

#[cfg(feature = "backend-tract")]
fn open_backend(cfg: &AppConfig) -> Result<maskcam::TractClassifier> {
    maskcam::TractClassifier::load(&cfg.classify.model_path)
}

#[cfg(not(feature = "backend-tract"))]
fn open_backend(_cfg: &AppConfig) -> Result<maskcam::StubClassifier> {
    anyhow::bail!("built without the backend-tract feature; no classifier to run")
}

#[cfg(feature = "display-opencv")]
fn open_display() -> Result<impl DisplaySink> {
    Ok(maskcam::OpencvDisplay::new())
}

#[cfg(not(feature = "display-opencv"))]
fn open_display() -> Result<maskcam::HeadlessDisplay> {
    anyhow::bail!("built without the display-opencv feature; no window to render the overlay")
}
