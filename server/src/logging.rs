use anyhow::{Context, Result};
use std::path::Path;

/// Routes the log facade to stdout, or to `log_file` if one is given.
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init(log_file: Option<&Path>) -> Result<()> {
	let mut builder = env_logger::Builder::new();
	builder.filter_level(log::LevelFilter::Info);
	builder.parse_env("RUST_LOG");
	match log_file {
		Some(path) => {
			if let Some(parent) = path.parent() {
				std::fs::create_dir_all(parent)?;
			}
			let file = std::fs::File::create(path)
				.with_context(|| format!("failed to create log file {}", path.display()))?;
			builder.target(env_logger::Target::Pipe(Box::new(file)));
		}
		None => {
			builder.target(env_logger::Target::Stdout);
		}
	}
	builder.try_init()?;
	Ok(())
}
