use anyhow::{Context, Result};
use std::sync::Arc;
use voxel_world::{network, storage, world::Database};

mod config;
mod logging;

static LOG: &'static str = "main";

#[tokio::main]
async fn main() -> Result<()> {
	let config = config::Config::from_args(std::env::args().skip(1))?;
	logging::init(config.log_file.as_deref())?;

	let options = storage::Options {
		busy_timeout: config.network.request_timeout,
	};
	let mut database = Database::open(&config.world_dir, &options)
		.with_context(|| format!("failed to open world at {}", config.world_dir.display()))?;
	let _ = database.load_spawn()?;

	let server = network::Server::bind(config.network, Arc::new(database)).await?;
	server.serve(tokio::signal::ctrl_c()).await?;
	log::info!(target: LOG, "Server stopped");
	Ok(())
}
