//! Distance field baker.
//!
//! Bakes the meshes listed in a TOML config into adaptive sparse distance
//! fields, one `<name>.asdf.json` per job, with optional PNG slice previews.

mod config;
mod preview;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use asdf::{CancelToken, DistanceFieldAsset};
use clap::Parser;

use config::{Config, JobConfig};

/// Adaptive sparse distance field baker.
#[derive(Parser, Debug)]
#[command(name = "asdf_bake")]
#[command(about = "Bakes triangle meshes into adaptive sparse distance fields")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: PathBuf,

	/// Output directory (default: `output_dir` from the config, relative to it).
	#[arg(short, long)]
	output_dir: Option<PathBuf>,

	/// Write PNG slice atlases even if the config sets no preview resolution.
	#[arg(short, long)]
	preview: bool,

	/// Worker threads for rasterization (default: all cores).
	#[arg(short, long)]
	threads: Option<usize>,

	/// Stop a job after this many milliseconds and keep the partial field.
	#[arg(long)]
	budget_ms: Option<u64>,
}

const DEFAULT_PREVIEW_RESOLUTION: usize = 32;

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	if let Some(threads) = args.threads {
		rayon::ThreadPoolBuilder::new()
			.num_threads(threads)
			.build_global()
			.context("Failed to configure thread pool")?;
	}

	let config_dir = args
		.config
		.parent()
		.unwrap_or(Path::new("."))
		.to_path_buf();

	println!("Loading config from: {}", args.config.display());
	let config = Config::load(&args.config)?;

	let output_dir = args
		.output_dir
		.clone()
		.unwrap_or_else(|| config_dir.join(&config.output_dir));
	std::fs::create_dir_all(&output_dir)
		.with_context(|| format!("Failed to create output dir: {}", output_dir.display()))?;

	let preview_resolution = match (config.preview_resolution, args.preview) {
		(Some(res), _) => Some(res),
		(None, true) => Some(DEFAULT_PREVIEW_RESOLUTION),
		(None, false) => None,
	};

	println!("Baking {} fields", config.jobs.len());

	for job in &config.jobs {
		bake_job(
			&config,
			job,
			&config_dir,
			&output_dir,
			preview_resolution,
			args.budget_ms.map(Duration::from_millis),
		)
		.with_context(|| format!("Baking '{}'", job.name))?;
	}

	println!("\nDone! Output written to: {}", output_dir.display());

	Ok(())
}

/// Build, save and optionally preview one job.
fn bake_job(
	config: &Config,
	job: &JobConfig,
	config_dir: &Path,
	output_dir: &Path,
	preview_resolution: Option<usize>,
	budget: Option<Duration>,
) -> Result<()> {
	let mesh = job.source.load(config_dir)?;
	println!(
		"\n{}: {} vertices, {} triangles",
		job.name,
		mesh.vertices.len(),
		mesh.triangle_count()
	);

	let mut asset =
		DistanceFieldAsset::with_mesh(mesh).with_config(config.job_build_config(job));

	let cancel = CancelToken::new();
	let start = Instant::now();
	let complete = asset.generate_with(&cancel, |tick| {
		log::debug!("{}: {} ({:.0}%)", job.name, tick.message, tick.progress * 100.0);
		if budget.is_some_and(|b| start.elapsed() >= b) && !cancel.is_cancelled() {
			log::warn!("{}: time budget exhausted, keeping partial field", job.name);
			cancel.cancel();
		}
	});
	let elapsed = start.elapsed();

	let field = asset
		.field()
		.context("No field was produced")?;
	if field.is_empty() {
		anyhow::bail!("Field is empty; check the mesh and max_depth");
	}

	let field_path = output_dir.join(format!("{}.asdf.json", job.name));
	field
		.save(&field_path)
		.with_context(|| format!("Failed to write: {}", field_path.display()))?;
	println!("  ✓ {}", field_path.display());

	if let Some(resolution) = preview_resolution {
		let volume = asset
			.volume_texture(resolution)
			.context("Failed to rasterize preview volume")?;
		let preview_path = output_dir.join(format!("{}.slices.png", job.name));
		preview::save_slice_atlas(&volume, &preview_path)?;
		println!("  ✓ {}", preview_path.display());
	}

	let stats = field.stats();
	println!(
		"  {} nodes ({} leaves, depth {}), {} KiB, {:.1}x smaller than a {}^3 grid, {:.1} ms{}",
		stats.node_count,
		stats.leaf_count,
		stats.max_depth,
		stats.memory_bytes / 1024,
		stats.compression_ratio,
		stats.uniform_resolution,
		elapsed.as_secs_f64() * 1000.0,
		if complete { "" } else { " (partial)" }
	);

	Ok(())
}
