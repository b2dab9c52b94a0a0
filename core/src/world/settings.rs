use crate::{utility::DataFile, world::generator};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The persistent settings of a world, saved as `settings.json` in the world's directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	#[serde(default = "Settings::default_seed")]
	seed: u32,
	#[serde(default)]
	generator: generator::Kind,
	/// Chunks within this many chunks of the origin (on both axes) stay loaded
	/// for as long as the world is open.
	#[serde(default)]
	spawn_radius: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self::new(Self::default_seed(), generator::Kind::default(), 0)
	}
}

impl DataFile for Settings {
	fn file_name() -> &'static str {
		"settings.json"
	}
}

impl Settings {
	pub fn new(seed: u32, generator: generator::Kind, spawn_radius: usize) -> Self {
		Self {
			seed,
			generator,
			spawn_radius,
		}
	}

	fn default_seed() -> u32 {
		let timestamp = chrono::prelude::Utc::now().timestamp();
		(timestamp & i64::from(u32::MAX)) as u32
	}

	pub fn seed(&self) -> u32 {
		self.seed
	}

	pub fn generator(&self) -> &generator::Kind {
		&self.generator
	}

	pub fn spawn_radius(&self) -> usize {
		self.spawn_radius
	}
}

impl Settings {
	/// Loads settings from the world directory, creating the directory and defaults if needed.
	/// Settings are saved back to disk after loading so any defaults which were filled in are kept.
	pub fn load_or_create(world_root_dir: &Path) -> Result<Self> {
		// Ensure the world directory exists
		if !world_root_dir.exists() {
			std::fs::create_dir_all(&world_root_dir)?;
		}

		let settings = <Self as DataFile>::load(world_root_dir)?.unwrap_or_default();

		// Auto-save loaded settings to file
		settings.save(world_root_dir)?;

		Ok(settings)
	}
}
