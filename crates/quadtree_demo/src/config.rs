//! Configuration parsing for the viewer walk.

use anyhow::{Context, Result};
use glam::DVec3;
use quadtree_plugin::QuadTreeConfig;
use serde::Deserialize;
use std::path::Path;

/// Root configuration for a demo run.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
	/// Quadtree construction parameters.
	pub tree: QuadTreeConfig,
	/// Straight-line path the simulated viewer follows.
	pub path: PathConfig,
}

/// Straight-line viewer path, sampled at evenly spaced steps.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathConfig {
	/// World position of the first step.
	pub start: [f64; 3],
	/// World position of the last step.
	pub end: [f64; 3],
	/// Number of updates along the path.
	pub steps: usize,
}

impl Default for PathConfig {
	fn default() -> Self {
		Self {
			start: [0.0, 0.0, 0.0],
			end: [150_000.0, 40_000.0, 0.0],
			steps: 120,
		}
	}
}

impl PathConfig {
	/// Viewer location at `step`.
	pub fn location(&self, step: usize) -> DVec3 {
		let start = DVec3::from_array(self.start);
		let end = DVec3::from_array(self.end);
		if self.steps <= 1 {
			return start;
		}

		let t = step as f64 / (self.steps - 1) as f64;
		start.lerp(end, t)
	}

	/// Facing along the path.
	pub fn direction(&self) -> DVec3 {
		(DVec3::from_array(self.end) - DVec3::from_array(self.start)).normalize_or_zero()
	}
}

impl DemoConfig {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		let config: DemoConfig =
			toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;

		config.validate()?;
		Ok(config)
	}

	/// Reject configurations the walk cannot run.
	pub fn validate(&self) -> Result<()> {
		self.tree.validate().context("Invalid [tree] table")?;

		if self.path.steps == 0 {
			anyhow::bail!("path.steps must be at least 1");
		}
		if self
			.path
			.start
			.iter()
			.chain(&self.path.end)
			.any(|v| !v.is_finite())
		{
			anyhow::bail!("path.start and path.end must be finite");
		}

		Ok(())
	}
}
