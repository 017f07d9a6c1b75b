//! Quadtree LOD walk.
//!
//! Moves a simulated viewer along a straight line, updates the quadtree at
//! every step and logs how the selection changes. Useful to eyeball level
//! ladders and floating-origin settings before wiring them into an engine.
//!
//! Verbosity follows `RUST_LOG` (e.g. `RUST_LOG=quadtree_plugin=debug`).

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use quadtree_plugin::{FnVisualizer, NodeSelectionEvent, QuadTree, Selection};
use std::path::PathBuf;

use config::DemoConfig;

/// Quadtree LOD walk driver.
#[derive(Parser, Debug)]
#[command(name = "quadtree_demo")]
#[command(about = "Walks a viewer across a quadtree and reports LOD selections")]
struct Args {
	/// Path to configuration TOML file (default: built-in walk).
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Override the number of steps along the path.
	#[arg(short, long)]
	steps: Option<usize>,

	/// Collect per-node selection events instead of plain selections.
	#[arg(short, long)]
	events: bool,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();

	let mut config = match &args.config {
		Some(path) => {
			info!("Loading config from: {}", path.display());
			DemoConfig::load(path)?
		}
		None => DemoConfig::default(),
	};
	if let Some(steps) = args.steps {
		config.path.steps = steps;
		config.validate()?;
	}

	let mut tree = QuadTree::build(config.tree.clone()).context("Building quadtree")?;

	info!(
		"Quadtree: {} levels, {} nodes, quads {}..{} units, floating origin {}",
		tree.level_count(),
		tree.nodes().len(),
		config.tree.minimum_quad_size,
		config.tree.maximum_quad_size,
		if config.tree.floating_origin { "on" } else { "off" }
	);

	let direction = config.path.direction();
	let mut previous = Selection::new();
	let mut events: Vec<NodeSelectionEvent> = Vec::new();
	let mut total_added = 0;
	let mut total_removed = 0;
	let mut total_events = 0;

	for step in 0..config.path.steps {
		let location = config.path.location(step);
		let passes = tree.passes();

		if args.events {
			events.clear();
			tree.update_with_events(location, direction, &mut events);
			total_events += events.len();
		} else {
			tree.update(location, direction);
		}

		if tree.passes() == passes {
			debug!("step {step}: viewer idle, selection reused");
			continue;
		}

		let selection = tree.selection();
		let delta = selection.diff(&previous);
		total_added += delta.added.len();
		total_removed += delta.removed.len();

		let stats = tree.stats();
		info!(
			"step {:>4} at ({:>10.1}, {:>10.1}): {:>3} quads (+{} / -{}), visited {}, culled {}{}",
			step,
			location.x,
			location.y,
			selection.len(),
			delta.added.len(),
			delta.removed.len(),
			stats.nodes_visited,
			stats.nodes_culled,
			if args.events {
				format!(", {} events", events.len())
			} else {
				String::new()
			}
		);

		previous = selection.clone();
	}

	let mut per_level = vec![0usize; tree.level_count() as usize];
	tree.draw(&mut FnVisualizer::new(|_, _, level| {
		per_level[level as usize] += 1;
	}));

	info!(
		"Done: {} passes, {} quads added, {} removed{}",
		tree.passes(),
		total_added,
		total_removed,
		if args.events {
			format!(", {total_events} events")
		} else {
			String::new()
		}
	);
	info!(
		"Final origin ({:.1}, {:.1}), quads per level (fine to coarse): {:?}",
		tree.target_origin().x,
		tree.target_origin().y,
		per_level
	);

	Ok(())
}
