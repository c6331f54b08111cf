//! collect_images - capture labeled training photos from the live camera feed

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use maskcam::workflow::CaptureReport;
#[cfg(feature = "display-opencv")]
use maskcam::DisplaySink;
use maskcam::{prompt, run_capture, AppConfig, FrameSource, SyntheticSource};

#[derive(Parser, Debug)]
#[command(
    name = "collect_images",
    about = "Capture labeled training photos into dataset/<label>/"
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

    let label = prompt::choose_label(&cfg.capture.classes)?;

    // The workflow writes into dataset/<label>/ but never creates it; that
    // is this binary's job.
    std::fs::create_dir_all(Path::new(&cfg.capture.dataset_dir).join(&label))?;

    let report = if args.synthetic {
        let mut source = SyntheticSource::new(
            cfg.capture.camera.output_width,
            cfg.capture.camera.output_height,
        );
        run_with_display(&mut source, &cfg, &label)?
    } else {
        #[cfg(feature = "camera-gstreamer")]
        {
            let mut source = maskcam::GstCameraSource::open(cfg.capture.camera.clone())?;
            run_with_display(&mut source, &cfg, &label)?
        }
        #[cfg(not(feature = "camera-gstreamer"))]
        {
            anyhow::bail!(
                "built without the camera-gstreamer feature; rebuild with it or pass --synthetic"
            )
        }
    };

    log::info!(
        "session over: {} photo(s) of {:?} written ({:?})",
        report.saved.len(),
        label,
        report.exit
    );
    Ok(())
}

fn run_with_display<S: FrameSource>(
    source: &mut S,
    cfg: &AppConfig,
    label: &str,
) -> Result<CaptureReport> {
    let mut display = open_display()?;
    run_capture(source, &mut display, &cfg.capture, label)
}

#[cfg(feature = "display-opencv")]
fn open_display() -> Result<impl DisplaySink> {
    Ok(maskcam::OpencvDisplay::new())
}

#[cfg(not(feature = "display-opencv"))]
fn open_display() -> Result<maskcam::HeadlessDisplay> {
    anyhow::bail!("built without the display-opencv feature; no window to preview or poll keys")
}
