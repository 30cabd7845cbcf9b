//! Configuration parsing for distance field baking.

use std::path::Path;

use anyhow::{Context, Result};
use asdf::{shapes, BuildConfig, TriangleMesh};
use serde::Deserialize;

/// Root configuration for a bake run.
#[derive(Debug, Deserialize)]
pub struct Config {
	/// Output directory, relative to the config file.
	pub output_dir: String,
	/// Edge length of preview slice images. No previews when absent.
	pub preview_resolution: Option<usize>,
	/// Build settings shared by every job unless overridden.
	#[serde(default)]
	pub build: BuildConfig,
	/// Meshes to bake.
	pub jobs: Vec<JobConfig>,
}

/// One mesh to bake into a field.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
	/// Output file stem.
	pub name: String,
	/// Where the triangles come from.
	pub source: MeshSource,
	/// Overrides `build.max_error`.
	pub max_error: Option<f32>,
	/// Overrides `build.max_depth`.
	pub max_depth: Option<i32>,
}

/// Mesh input of a job.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshSource {
	/// Axis-aligned cube centered at the origin.
	Cube {
		#[serde(default = "default_half_extent")]
		half_extent: f32,
	},
	/// UV sphere centered at the origin.
	Sphere {
		#[serde(default = "default_radius")]
		radius: f32,
		#[serde(default = "default_segments")]
		segments: u32,
		#[serde(default = "default_rings")]
		rings: u32,
	},
	/// JSON file with `vertices` ([x, y, z] arrays) and `indices`.
	File { path: String },
}

fn default_half_extent() -> f32 {
	1.0
}

fn default_radius() -> f32 {
	1.0
}

fn default_segments() -> u32 {
	32
}

fn default_rings() -> u32 {
	16
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		if config.jobs.is_empty() {
			anyhow::bail!("Config must have at least one job");
		}
		if config.preview_resolution == Some(0) {
			anyhow::bail!("preview_resolution must be positive");
		}
		for job in &config.jobs {
			if job.name.is_empty() {
				anyhow::bail!("Job names must not be empty");
			}
			config
				.job_build_config(job)
				.validate()
				.with_context(|| format!("Invalid build settings for job '{}'", job.name))?;
		}
		let mut names: Vec<&str> = config.jobs.iter().map(|j| j.name.as_str()).collect();
		names.sort_unstable();
		if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
			anyhow::bail!("Duplicate job name '{}'", pair[0]);
		}

		Ok(config)
	}

	/// Shared build settings with the job's overrides applied.
	pub fn job_build_config(&self, job: &JobConfig) -> BuildConfig {
		let mut config = self.build.clone();
		if let Some(max_error) = job.max_error {
			config.max_error = max_error;
		}
		if let Some(max_depth) = job.max_depth {
			config.max_depth = max_depth;
		}
		config
	}
}

impl MeshSource {
	/// Produce the triangles. File paths resolve against `base_dir`.
	pub fn load(&self, base_dir: &Path) -> Result<TriangleMesh> {
		match self {
			MeshSource::Cube { half_extent } => Ok(shapes::cube(*half_extent)),
			MeshSource::Sphere {
				radius,
				segments,
				rings,
			} => Ok(shapes::uv_sphere(*radius, *segments, *rings)),
			MeshSource::File { path } => {
				let full = base_dir.join(path);
				let content = std::fs::read_to_string(&full)
					.with_context(|| format!("Failed to read mesh file: {}", full.display()))?;
				let mesh: TriangleMesh = serde_json::from_str(&content)
					.with_context(|| format!("Failed to parse mesh JSON: {}", full.display()))?;
				mesh.validate()
					.with_context(|| format!("Invalid mesh: {}", full.display()))?;
				Ok(mesh)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"
output_dir = "baked"
preview_resolution = 32

[build]
max_error = 0.005
max_depth = 4

[[jobs]]
name = "crate"
source = { kind = "cube", half_extent = 0.5 }

[[jobs]]
name = "ball"
max_depth = 6
source = { kind = "sphere", radius = 2.0 }
"#;

	#[test]
	fn parses_jobs_and_overrides() {
		let config = Config::parse(SAMPLE).unwrap();
		assert_eq!(config.output_dir, "baked");
		assert_eq!(config.preview_resolution, Some(32));
		assert_eq!(config.jobs.len(), 2);

		let crate_job = config.job_build_config(&config.jobs[0]);
		assert_eq!(crate_job.max_depth, 4);
		assert!((crate_job.max_error - 0.005).abs() < 1e-9);

		let ball = config.job_build_config(&config.jobs[1]);
		assert_eq!(ball.max_depth, 6);
		assert_eq!(ball.bounds_padding, BuildConfig::default().bounds_padding);

		match &config.jobs[1].source {
			MeshSource::Sphere {
				radius,
				segments,
				rings,
			} => {
				assert_eq!(*radius, 2.0);
				assert_eq!(*segments, 32);
				assert_eq!(*rings, 16);
			}
			other => panic!("expected sphere, got {:?}", other),
		}
	}

	#[test]
	fn build_section_is_optional() {
		let config = Config::parse(
			r#"
output_dir = "out"
[[jobs]]
name = "a"
source = { kind = "cube" }
"#,
		)
		.unwrap();
		assert_eq!(config.build, BuildConfig::default());
		assert!(config.preview_resolution.is_none());
	}

	#[test]
	fn rejects_bad_configs() {
		let no_jobs = r#"
output_dir = "out"
jobs = []
"#;
		assert!(Config::parse(no_jobs).is_err());

		let duplicate = r#"
output_dir = "out"
[[jobs]]
name = "a"
source = { kind = "cube" }
[[jobs]]
name = "a"
source = { kind = "cube" }
"#;
		assert!(Config::parse(duplicate).is_err());

		let bad_error = r#"
output_dir = "out"
[[jobs]]
name = "a"
max_error = -1.0
source = { kind = "cube" }
"#;
		assert!(Config::parse(bad_error).is_err());
	}

	#[test]
	fn loads_builtin_meshes() {
		let cube = MeshSource::Cube { half_extent: 1.0 }.load(Path::new(".")).unwrap();
		assert_eq!(cube.triangle_count(), 12);

		let missing = MeshSource::File {
			path: "does_not_exist.json".into(),
		};
		assert!(missing.load(&std::env::temp_dir()).is_err());
	}

	#[test]
	fn loads_mesh_file() {
		let dir = std::env::temp_dir();
		let name = format!("asdf_bake_mesh_{}.json", std::process::id());
		let json = r#"{ "vertices": [[0,0,0],[1,0,0],[0,1,0]], "indices": [0,1,2] }"#;
		std::fs::write(dir.join(&name), json).unwrap();

		let mesh = MeshSource::File { path: name.clone() }.load(&dir).unwrap();
		let _ = std::fs::remove_file(dir.join(&name));
		assert_eq!(mesh.triangle_count(), 1);
	}
}
