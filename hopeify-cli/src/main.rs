use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use hopeify_core::pipeline::{process_file, PosterJob};
use hopeify_core::posterize::ChannelPolicy;
use image::ImageFormat;
use rayon::prelude::*;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "hopeify",
    about = "Posterize photos into four campaign-poster tones"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single image, save it and open it in the default viewer
    Single {
        /// Input image path
        input: PathBuf,

        /// Output image path (default: input_hope.<ext>, ext from --format, jpg otherwise)
        output: Option<PathBuf>,

        /// Encoder format (default: from output extension, jpeg if unknown)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Sum every decoded channel, alpha included, when computing intensity
        #[arg(long)]
        all_channels: bool,

        /// Save only, don't open the result
        #[arg(long)]
        no_show: bool,
    },

    /// Process all images in a directory
    Batch {
        /// Input directory
        input_dir: PathBuf,

        /// Output directory (default: input_dir/hope)
        output_dir: Option<PathBuf>,

        /// Number of parallel jobs (default: num_cpus)
        #[arg(long, short)]
        jobs: Option<usize>,

        /// Reprocess even if output is up-to-date
        #[arg(long)]
        force: bool,

        /// Sum every decoded channel, alpha included, when computing intensity
        #[arg(long)]
        all_channels: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Jpeg,
    Png,
    Bmp,
    Webp,
}

impl From<OutputFormat> for ImageFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Webp => ImageFormat::WebP,
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];
const OUTPUT_SUFFIX: &str = "_hope";

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_generated_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| stem.ends_with(OUTPUT_SUFFIX))
        .unwrap_or(false)
}

fn output_name(input: &Path, format: ImageFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = format.extensions_str().first().copied().unwrap_or("jpg");
    PathBuf::from(format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext))
}

fn default_output_path(input: &Path, format: ImageFormat) -> PathBuf {
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(output_name(input, format))
}

fn default_batch_dir(input_dir: &Path) -> PathBuf {
    input_dir.join("hope")
}

/// One job per image. Inputs sharing a stem keep their extension in the
/// output name (`cat_png_hope.jpg`) so no two jobs write the same file.
fn batch_jobs(images: &[PathBuf], output_dir: &Path, policy: ChannelPolicy) -> Vec<PosterJob> {
    let mut stems: HashMap<&OsStr, usize> = HashMap::new();
    for image in images {
        *stems.entry(image.file_stem().unwrap_or_default()).or_default() += 1;
    }

    images
        .iter()
        .map(|input| {
            let stem = input.file_stem().unwrap_or_default();
            let name = if stems.get(stem).copied().unwrap_or(0) > 1 {
                let ext = input
                    .extension()
                    .map(|e| e.to_string_lossy())
                    .unwrap_or_default();
                PathBuf::from(format!(
                    "{}_{}{}.jpg",
                    stem.to_string_lossy(),
                    ext,
                    OUTPUT_SUFFIX
                ))
            } else {
                output_name(input, ImageFormat::Jpeg)
            };
            PosterJob::new(input, output_dir.join(name)).with_policy(policy)
        })
        .collect()
}

fn channel_policy(all_channels: bool) -> ChannelPolicy {
    if all_channels {
        ChannelPolicy::AllChannels
    } else {
        ChannelPolicy::ColorOnly
    }
}

/// True when `output` exists and was written after `input` last changed.
fn is_up_to_date(input: &Path, output: &Path) -> bool {
    let modified = |p: &Path| p.metadata().and_then(|m| m.modified()).ok();
    match (modified(input), modified(output)) {
        (Some(in_time), Some(out_time)) => out_time > in_time,
        _ => false,
    }
}

fn cmd_single(job: PosterJob, show: bool) -> anyhow::Result<()> {
    log::info!(
        "Processing: {} -> {}",
        job.input.display(),
        job.output.display()
    );

    let poster = process_file(&job)
        .with_context(|| format!("failed to posterize {}", job.input.display()))?;
    log::info!(
        "Done: {} ({}x{})",
        job.output.display(),
        poster.width(),
        poster.height()
    );

    if show {
        open::that_detached(&job.output)
            .with_context(|| format!("failed to open {}", job.output.display()))?;
    }
    Ok(())
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    jobs: Option<usize>,
    force: bool,
    policy: ChannelPolicy,
) -> anyhow::Result<()> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_image_file(p) && !is_generated_file(p))
        .collect();
    images.sort();

    if images.is_empty() {
        log::warn!("No source images found in {}", input_dir.display());
        return Ok(());
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok();
    }

    let (pending, skipped): (Vec<PosterJob>, Vec<PosterJob>) =
        batch_jobs(&images, output_dir, policy)
            .into_iter()
            .partition(|job| force || !is_up_to_date(&job.input, &job.output));

    for job in &skipped {
        log::debug!("Up to date: {}", job.output.display());
    }
    log::info!(
        "Found {} source images, processing {}, skipping {} up-to-date",
        images.len(),
        pending.len(),
        skipped.len()
    );

    let errors: Vec<String> = pending
        .par_iter()
        .filter_map(|job| match process_file(job) {
            Ok(_) => {
                log::info!("  Done: {}", job.output.display());
                None
            }
            Err(e) => {
                let msg = format!("{}: {}", job.input.display(), e);
                log::error!("  {}", msg);
                Some(msg)
            }
        })
        .collect();

    log::info!(
        "Processed: {}, Skipped: {}, Errors: {}",
        pending.len() - errors.len(),
        skipped.len(),
        errors.len()
    );
    if !errors.is_empty() {
        bail!("{} of {} images failed", errors.len(), pending.len());
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Single {
            input,
            output,
            format,
            all_channels,
            no_show,
        } => {
            let format = format.map(ImageFormat::from);
            let output = output.unwrap_or_else(|| {
                default_output_path(&input, format.unwrap_or(ImageFormat::Jpeg))
            });
            let mut job = PosterJob::new(input, output).with_policy(channel_policy(all_channels));
            if let Some(format) = format {
                job = job.with_format(format);
            }
            cmd_single(job, !no_show)?;
        }

        Commands::Batch {
            input_dir,
            output_dir,
            jobs,
            force,
            all_channels,
        } => {
            let output = output_dir.unwrap_or_else(|| default_batch_dir(&input_dir));
            cmd_batch(&input_dir, &output, jobs, force, channel_policy(all_channels))?;
        }
    }

    Ok(())
}
