use std::sync::atomic::AtomicBool;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use lumen_renderer::{reference_shapes, render_frame, ImageInfo, RenderConfig, Scene};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure render thread pool")?;
    }

    let config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let shapes = reference_shapes();
    let scene = Scene::from_shapes(&shapes);
    let image = ImageInfo::new(args.width, args.height, args.frames);
    let cancel = AtomicBool::new(false);

    info!(
        "Rendering {}x{}, {} frame(s) @ {} passes on {} threads",
        image.width,
        image.height,
        args.frame_count(),
        args.passes,
        rayon::current_num_threads()
    );

    let start = Instant::now();
    for frame in 0..args.frame_count() {
        let frame_start = Instant::now();
        let accumulator = render_frame(
            frame,
            args.passes,
            image,
            &scene,
            &config,
            args.bucket_size,
            &cancel,
        )
        .with_context(|| format!("Failed to render frame {frame}"))?;

        let path = args.output_path(frame);
        accumulator
            .save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Frame {} rendered in {:?}", frame, frame_start.elapsed());
    }
    info!("Done in {:?}", start.elapsed());

    Ok(())
}
