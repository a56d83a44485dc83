use std::{
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use log::{LevelFilter, info};
use sphere_pyramid::{RenderConfig, render};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
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

/// Renders a recursive pyramid of spheres into an image file
#[derive(Parser)]
#[command(name = "sphere-pyramid")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Recursion depth of the pyramid, 1 is a single sphere
    #[arg(long, default_value_t = 8)]
    level: u32,

    /// Sub-samples along each pixel axis, 4 means 16 rays per pixel
    #[arg(long, short = 's', default_value_t = 1)]
    samples_per_pixel: u32,

    /// Number of worker threads, one per CPU if not given
    #[arg(long, short = 'j', env = "RTRACEMAXPROCS")]
    workers: Option<usize>,

    /// Edge length of the square tiles handed to the workers
    #[arg(long, default_value_t = 16)]
    tile_size: u32,

    /// Pin worker threads to CPU cores
    #[arg(long)]
    pin_workers: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Print the whole sphere tree to stdout before rendering
    #[arg(long)]
    print_tree: bool,

    /// Output image, format is chosen by the extension (png, tga, ppm, ...).
    /// `-` writes a binary PPM to stdout
    output: PathBuf,
}

/// Log level from the command line, RUST_LOG takes precedence
fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let config = RenderConfig::builder()
        .width(args.width)
        .height(args.height)
        .level(args.level)
        .samples_per_axis(args.samples_per_pixel)
        .tile_width(args.tile_size)
        .tile_height(args.tile_size)
        .maybe_workers(args.workers)
        .pin_workers(args.pin_workers)
        .build()?;

    let scene = config.build_scene();
    scene.object.print_statistics();
    let to_stdout = args.output == Path::new("-");
    if args.print_tree {
        let mut tree = String::new();
        scene.object.write_tree(&mut tree)?;
        if to_stdout {
            eprint!("{tree}");
        } else {
            print!("{tree}");
        }
    }

    let bar = ProgressBar::no_length();
    let render_progress = render(scene, config.camera(), config.render, |_| {}, {
        let bar = bar.clone();
        move |_, progress| {
            bar.update(|ps| {
                ps.set_len(progress.total as u64);
                ps.set_pos(progress.finished as u64)
            })
        }
    })?;
    bar.set_length(render_progress.progress().total as u64);

    let framebuffer = render_progress.wait()?;
    bar.finish();

    if to_stdout {
        let mut stdout = io::stdout().lock();
        framebuffer
            .write_ppm(&mut stdout)
            .context("Failed to write the image to stdout")?;
        stdout.flush()?;
    } else {
        framebuffer
            .to_rgb_image()
            .save(&args.output)
            .with_context(|| format!("Failed to write {}", args.output.display()))?;
        info!("Image written to {}", args.output.display());
    }

    Ok(())
}
