use clap::{Parser, Subcommand, ValueEnum};
use laser_enhance::tools::{
    bench_limit_from_env, buffer_stats, dataset_iter, dataset_root_from_env, load_frame,
    save_buffer,
};
use laser_enhance::utils::grayscale::grayscale;
use laser_enhance::{
    BarcodeRegionDetector, Frame, Mode, Pipeline, PipelineConfig, PixelBuffer, ScanLineExtractor,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "laserscan", version, about = "Laser-style frame enhancement tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Full,
    Fast,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Full => Mode::Full,
            ModeArg::Fast => Mode::Fast,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Enhance one image and optionally write the result
    Enhance {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, value_enum, default_value = "full")]
        mode: ModeArg,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Estimate the barcode column band of an image
    Region {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print the laser scan lines cut from an image
    ScanLines {
        #[arg(long)]
        image: PathBuf,
    },
    /// Enhance every image of a dataset and report timings
    Bench {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, value_enum, default_value = "full")]
        mode: ModeArg,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Enhance { image, mode, out } => enhance_cmd(&image, mode.into(), out.as_deref()),
        Command::Region { image } => region_cmd(&image),
        Command::ScanLines { image } => scan_lines_cmd(&image),
        Command::Bench { root, limit, mode } => {
            bench_cmd(root, limit, mode.into());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("laserscan: {err}");
            ExitCode::FAILURE
        }
    }
}

fn enhance_cmd(image: &Path, mode: Mode, out: Option<&Path>) -> laser_enhance::Result<()> {
    let frame = load_frame(image)?;
    println!("Image: {} ({}x{})", image.display(), frame.width(), frame.height());

    let mut pipeline = Pipeline::with_config(PipelineConfig::from_env());
    let enhanced = pipeline.try_run(&frame, mode)?;

    println!(
        "Mode: {} rows {}..{} in {:.2}ms",
        enhanced.mode,
        enhanced.offset_y,
        enhanced.offset_y + enhanced.buffer.height(),
        enhanced.elapsed.as_secs_f64() * 1000.0
    );
    for &stage in mode.stages() {
        if let Some(elapsed) = enhanced.timings.get(stage) {
            println!("  {:<12} {:>8.3}ms", stage.name(), elapsed.as_secs_f64() * 1000.0);
        }
    }
    if let Some(threshold) = enhanced.threshold {
        match threshold.dark_class_max() {
            Some(dark) => println!("Threshold: {} (black <= {dark})", threshold.threshold),
            None => println!("Threshold: 0 (no black)"),
        }
    }
    let stats = buffer_stats(&enhanced.buffer);
    println!("Black ratio: {:.2}%", stats.black_ratio * 100.0);
    if let Some(region) = enhanced.region {
        println!(
            "Region: center_x={} confidence={:.3} has_barcode={}",
            region.center_x, region.confidence, region.has_barcode
        );
    }

    if let Some(out) = out {
        save_buffer(out, &enhanced.buffer)?;
        println!("Wrote {}", out.display());
    }
    Ok(())
}

fn region_cmd(image: &Path) -> laser_enhance::Result<()> {
    let frame = load_frame(image)?;
    let mut pipeline = Pipeline::with_config(PipelineConfig::from_env());

    // Estimate on the grayscaled input next to the estimate on the enhanced frame
    let detector = BarcodeRegionDetector::new(pipeline.config().region);
    let mut gray = PixelBuffer::from_frame(&frame);
    grayscale(&mut gray);
    let gray_estimate = detector.detect(&gray);
    println!("Image: {} ({}x{})", image.display(), frame.width(), frame.height());
    println!(
        "Gray:     center_x={} confidence={:.3} has_barcode={}",
        gray_estimate.center_x, gray_estimate.confidence, gray_estimate.has_barcode
    );

    let enhanced = pipeline.try_run(&frame, Mode::Full)?;
    let region = pipeline.detect_region(&enhanced.buffer);
    println!(
        "Enhanced: center_x={} confidence={:.3} has_barcode={}",
        region.center_x, region.confidence, region.has_barcode
    );
    Ok(())
}

fn scan_lines_cmd(image: &Path) -> laser_enhance::Result<()> {
    let frame = load_frame(image)?;
    let lines = ScanLineExtractor::default().extract_lines(&frame);
    println!("Image: {} ({}x{})", image.display(), frame.width(), frame.height());
    println!("Extracted {} scan lines", lines.len());
    for (i, line) in lines.iter().enumerate() {
        let stats = buffer_stats(&line.data);
        println!(
            "  Line {}: y={} height={} range={}-{} avg={}",
            i, line.offset_y, line.height, stats.min, stats.max, stats.avg
        );
    }
    Ok(())
}

struct BenchSample {
    elapsed: Duration,
    has_barcode: bool,
}

fn bench_cmd(root: Option<PathBuf>, limit: Option<usize>, mode: Mode) {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let images: Vec<PathBuf> = dataset_iter(&root, limit).collect();

    if images.is_empty() {
        println!("No images found under {}", root.display());
        return;
    }

    let config = PipelineConfig::from_env();
    let start = Instant::now();
    let samples: Vec<BenchSample> = images
        .par_iter()
        .map_init(
            || Pipeline::with_config(config.clone()),
            |pipeline, path| bench_one(pipeline, path, mode),
        )
        .flatten()
        .collect();
    let wall = start.elapsed();

    let processed = samples.len();
    let with_barcode = samples.iter().filter(|s| s.has_barcode).count();
    let total: Duration = samples.iter().map(|s| s.elapsed).sum();
    let mean_ms = if processed == 0 {
        0.0
    } else {
        total.as_secs_f64() * 1000.0 / processed as f64
    };

    println!("Dataset: {}", root.display());
    println!("Mode: {mode}");
    println!("Images: {} processed / {} found", processed, images.len());
    println!("Mean pipeline time: {mean_ms:.2}ms");
    println!(
        "Barcode-like region: {}/{} ({:.1}%)",
        with_barcode,
        processed,
        if processed == 0 {
            0.0
        } else {
            with_barcode as f64 * 100.0 / processed as f64
        }
    );
    println!("Wall time: {:.2}s", wall.as_secs_f64());
}

fn bench_one(pipeline: &mut Pipeline, path: &Path, mode: Mode) -> Option<BenchSample> {
    let frame: Frame = match load_frame(path) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(path = %path.display(), %err, "skipping unreadable image");
            return None;
        }
    };
    let enhanced = pipeline.run(&frame, mode)?;
    let sample = BenchSample {
        elapsed: enhanced.elapsed,
        has_barcode: enhanced
            .region
            .unwrap_or_else(|| pipeline.detect_region(&enhanced.buffer))
            .has_barcode,
    };
    pipeline.recycle(enhanced);
    Some(sample)
}
