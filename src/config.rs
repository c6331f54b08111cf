use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CAPTURE_WIDTH: u32 = 1280;
const DEFAULT_CAPTURE_HEIGHT: u32 = 720;
const DEFAULT_CAPTURE_FRAMERATE: u32 = 30;
const DEFAULT_CLASSIFY_WIDTH: u32 = 1920;
const DEFAULT_CLASSIFY_HEIGHT: u32 = 1080;
const DEFAULT_CLASSIFY_FRAMERATE: u32 = 60;
const DEFAULT_FLIP_METHOD: u32 = 0;
const DEFAULT_OUTPUT_WIDTH: u32 = 640;
const DEFAULT_OUTPUT_HEIGHT: u32 = 480;
const DEFAULT_DATASET_DIR: &str = "dataset";
const DEFAULT_CAPTURE_WINDOW: &str = "press space to take a photo";
const DEFAULT_CAPTURE_WINDOW_WIDTH: u32 = 500;
const DEFAULT_CAPTURE_WINDOW_HEIGHT: u32 = 300;
const DEFAULT_MODEL_PATH: &str = "model.onnx";
const DEFAULT_LABELS_PATH: &str = "labels.txt";

fn default_classes() -> Vec<String> {
    vec!["with_mask".to_string(), "without_mask".to_string()]
}

#[derive(Debug, Deserialize, Default)]
struct AppConfigFile {
    capture: Option<CaptureConfigFile>,
    classify: Option<ClassifyConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    capture_width: Option<u32>,
    capture_height: Option<u32>,
    framerate: Option<u32>,
    flip_method: Option<u32>,
    output_width: Option<u32>,
    output_height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct CaptureConfigFile {
    camera: Option<CameraConfigFile>,
    dataset_dir: Option<String>,
    classes: Option<Vec<String>>,
    window_title: Option<String>,
    window_width: Option<u32>,
    window_height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct ClassifyConfigFile {
    camera: Option<CameraConfigFile>,
    model_path: Option<String>,
    labels_path: Option<String>,
    window_title: Option<String>,
}

/// Camera stream configuration.
///
/// These are named fields describing the source, never a literal pipeline
/// string: only the GStreamer source backend renders them into a pipeline,
/// the rest of the code passes them through opaquely.
///
/// Each workflow carries its own profile: capture previews the sensor at
/// 1280x720@30, classification runs it at 1920x1080@60. Both deliver
/// 640x480 frames to the application.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Sensor capture width in pixels.
    pub capture_width: u32,
    /// Sensor capture height in pixels.
    pub capture_height: u32,
    /// Sensor frame rate (frames per second).
    pub framerate: u32,
    /// Flip/rotation mode applied by the video converter.
    pub flip_method: u32,
    /// Width of the frames delivered to the application.
    pub output_width: u32,
    /// Height of the frames delivered to the application.
    pub output_height: u32,
}

impl CameraSettings {
    /// Sensor profile for the capture workflow.
    pub fn capture_profile() -> Self {
        Self {
            capture_width: DEFAULT_CAPTURE_WIDTH,
            capture_height: DEFAULT_CAPTURE_HEIGHT,
            framerate: DEFAULT_CAPTURE_FRAMERATE,
            flip_method: DEFAULT_FLIP_METHOD,
            output_width: DEFAULT_OUTPUT_WIDTH,
            output_height: DEFAULT_OUTPUT_HEIGHT,
        }
    }

    /// Sensor profile for the classification workflow.
    pub fn classify_profile() -> Self {
        Self {
            capture_width: DEFAULT_CLASSIFY_WIDTH,
            capture_height: DEFAULT_CLASSIFY_HEIGHT,
            framerate: DEFAULT_CLASSIFY_FRAMERATE,
            ..Self::capture_profile()
        }
    }
}

/// Settings for the capture workflow.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub camera: CameraSettings,
    /// Root directory holding one subdirectory per class label.
    pub dataset_dir: String,
    /// Enumerated label set offered by the interactive prompt.
    pub classes: Vec<String>,
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::capture_profile(),
            dataset_dir: DEFAULT_DATASET_DIR.to_string(),
            classes: default_classes(),
            window_title: DEFAULT_CAPTURE_WINDOW.to_string(),
            window_width: DEFAULT_CAPTURE_WINDOW_WIDTH,
            window_height: DEFAULT_CAPTURE_WINDOW_HEIGHT,
        }
    }
}

/// Settings for the classification workflow.
#[derive(Debug, Clone)]
pub struct ClassifySettings {
    pub camera: CameraSettings,
    /// Serialized classifier model, opaque outside the inference backend.
    pub model_path: String,
    /// Label table: one `"<index> <name>"` entry per line.
    pub labels_path: String,
    pub window_title: String,
}

impl Default for ClassifySettings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::classify_profile(),
            model_path: DEFAULT_MODEL_PATH.to_string(),
            labels_path: DEFAULT_LABELS_PATH.to_string(),
            window_title: default_classify_window_title(),
        }
    }
}

fn default_classify_window_title() -> String {
    format!("{} - maskcam", std::env::consts::OS)
}

/// Top-level configuration shared by both binaries.
///
/// Loaded from an optional TOML file (`--config` flag, which also reads the
/// `MASKCAM_CONFIG` env var), with per-field env overrides applied on top
/// and defaults that reproduce the stock demo behavior when no file exists.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub capture: CaptureSettings,
    pub classify: ClassifySettings,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => AppConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AppConfigFile) -> Self {
        let defaults = Self::default();
        let capture = file.capture.unwrap_or_default();
        let classify = file.classify.unwrap_or_default();
        Self {
            capture: CaptureSettings {
                camera: merge_camera(capture.camera, CameraSettings::capture_profile()),
                dataset_dir: capture.dataset_dir.unwrap_or(defaults.capture.dataset_dir),
                classes: capture.classes.unwrap_or(defaults.capture.classes),
                window_title: capture
                    .window_title
                    .unwrap_or(defaults.capture.window_title),
                window_width: capture
                    .window_width
                    .unwrap_or(DEFAULT_CAPTURE_WINDOW_WIDTH),
                window_height: capture
                    .window_height
                    .unwrap_or(DEFAULT_CAPTURE_WINDOW_HEIGHT),
            },
            classify: ClassifySettings {
                camera: merge_camera(classify.camera, CameraSettings::classify_profile()),
                model_path: classify.model_path.unwrap_or(defaults.classify.model_path),
                labels_path: classify
                    .labels_path
                    .unwrap_or(defaults.classify.labels_path),
                window_title: classify
                    .window_title
                    .unwrap_or(defaults.classify.window_title),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var("MASKCAM_DATASET_DIR") {
            self.capture.dataset_dir = dir;
        }
        if let Ok(path) = std::env::var("MASKCAM_MODEL_PATH") {
            self.classify.model_path = path;
        }
        if let Ok(path) = std::env::var("MASKCAM_LABELS_PATH") {
            self.classify.labels_path = path;
        }
        if let Ok(fps) = std::env::var("MASKCAM_FRAMERATE") {
            let fps: u32 = fps
                .parse()
                .map_err(|e| anyhow!("MASKCAM_FRAMERATE is not an integer: {}", e))?;
            self.capture.camera.framerate = fps;
            self.classify.camera.framerate = fps;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        validate_camera(&self.capture.camera, "capture")?;
        validate_camera(&self.classify.camera, "classify")?;
        if self.capture.classes.is_empty() {
            return Err(anyhow!("capture.classes must list at least one label"));
        }
        if self.capture.dataset_dir.is_empty() {
            return Err(anyhow!("capture.dataset_dir must not be empty"));
        }
        Ok(())
    }
}

fn merge_camera(file: Option<CameraConfigFile>, profile: CameraSettings) -> CameraSettings {
    let file = file.unwrap_or_default();
    CameraSettings {
        capture_width: file.capture_width.unwrap_or(profile.capture_width),
        capture_height: file.capture_height.unwrap_or(profile.capture_height),
        framerate: file.framerate.unwrap_or(profile.framerate),
        flip_method: file.flip_method.unwrap_or(profile.flip_method),
        output_width: file.output_width.unwrap_or(profile.output_width),
        output_height: file.output_height.unwrap_or(profile.output_height),
    }
}

fn validate_camera(camera: &CameraSettings, section: &str) -> Result<()> {
    if camera.framerate == 0 {
        return Err(anyhow!("{}.camera.framerate must be >= 1", section));
    }
    if camera.output_width == 0 || camera.output_height == 0 {
        return Err(anyhow!("{}.camera output dimensions must be >= 1", section));
    }
    Ok(())
}

fn read_config_file(path: &Path) -> Result<AppConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
}
