use anyhow::{Context, Result};
use std::{path::PathBuf, str::FromStr, time::Duration};
use voxel_world::network;

/// Everything the server binary can be told on the command line.
/// Each argument is optional and written as `-name=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub network: network::Config,
	pub world_dir: PathBuf,
	pub log_file: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			network: network::Config::default(),
			world_dir: PathBuf::from("./world"),
			log_file: None,
		}
	}
}

fn get_named_arg<T>(args: &[String], name: &str) -> Result<Option<T>>
where
	T: FromStr,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	let prefix = format!("-{}=", name);
	match args.iter().find_map(|arg| arg.strip_prefix(&prefix)) {
		Some(value) => value
			.parse::<T>()
			.map(Some)
			.with_context(|| format!("invalid value {:?} for -{}", value, name)),
		None => Ok(None),
	}
}

impl Config {
	pub fn from_args<I: Iterator<Item = String>>(args: I) -> Result<Self> {
		let args = args.collect::<Vec<_>>();
		let mut config = Self::default();
		if let Some(address) = get_named_arg(&args, "addr")? {
			config.network.address = address;
		}
		if let Some(millis) = get_named_arg::<u64>(&args, "timeout-ms")? {
			config.network.request_timeout = Duration::from_millis(millis);
		}
		if let Some(world_dir) = get_named_arg(&args, "world")? {
			config.world_dir = world_dir;
		}
		config.log_file = get_named_arg(&args, "log")?;
		Ok(config)
	}
}
