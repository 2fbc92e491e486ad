use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Deterministic quasi-Monte Carlo path tracer")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Frames in the camera orbit loop; 0 renders a single static frame
    #[arg(long, short = 'f', default_value_t = 0, allow_negative_numbers = true)]
    pub frames: i32,

    /// Passes (samples) accumulated per pixel
    #[arg(long, short = 'p', default_value_t = 64)]
    pub passes: u32,

    /// Bucket size in pixels
    #[arg(long, default_value_t = lumen_renderer::DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Worker threads (defaults to one per core)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// JSON render config overriding the reference camera, light and sky
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Output PNG path; animations get a frame number suffix
    #[arg(long, short = 'o', default_value = "output.png")]
    pub output: PathBuf,

    /// Logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Args {
    /// Number of frames to render; a static camera renders one.
    pub fn frame_count(&self) -> u32 {
        self.frames.max(1) as u32
    }

    /// Output path for `frame`.
    pub fn output_path(&self, frame: u32) -> PathBuf {
        if self.frames <= 0 {
            return self.output.clone();
        }
        frame_path(&self.output, frame)
    }
}

/// `dir/name.png` becomes `dir/name_0003.png`.
fn frame_path(output: &Path, frame: u32) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");
    let ext = output.extension().and_then(|s| s.to_str()).unwrap_or("png");
    output.with_file_name(format!("{stem}_{frame:04}.{ext}"))
}
