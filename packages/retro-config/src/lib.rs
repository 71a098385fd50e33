mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Conditions, Config, Fabric, ResourceConfig, Resources, Retro, Service};

use std::{fs, path::Path};

pub const PRIORITIZERS: [&str; 2] = ["popularity", "none"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.fabric.queue_capacity == 0 {
		return Err(Error::Validation {
			message: "fabric.queue_capacity must be greater than zero.".to_string(),
		});
	}
	if cfg.fabric.result_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "fabric.result_timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, resource) in [
		("resources.context_recommender", &cfg.resources.context_recommender),
		("resources.retro_transformer", &cfg.resources.retro_transformer),
	] {
		if resource.queue.is_empty() {
			return Err(Error::Validation { message: format!("{label}.queue must be non-empty.") });
		}
		if resource.model_path.as_os_str().is_empty() {
			return Err(Error::Validation {
				message: format!("{label}.model_path must be non-empty."),
			});
		}
		if resource.info_path.as_os_str().is_empty() {
			return Err(Error::Validation {
				message: format!("{label}.info_path must be non-empty."),
			});
		}
	}

	if cfg.resources.context_recommender.queue == cfg.resources.retro_transformer.queue {
		return Err(Error::Validation {
			message: "resources.context_recommender.queue and resources.retro_transformer.queue must differ."
				.to_string(),
		});
	}
	if cfg.conditions.default_count == 0 {
		return Err(Error::Validation {
			message: "conditions.default_count must be greater than zero.".to_string(),
		});
	}
	if cfg.conditions.default_count > cfg.conditions.max_count {
		return Err(Error::Validation {
			message: "conditions.default_count must not exceed conditions.max_count.".to_string(),
		});
	}
	if cfg.retro.default_top_n == 0 {
		return Err(Error::Validation {
			message: "retro.default_top_n must be greater than zero.".to_string(),
		});
	}
	if cfg.retro.default_top_n > cfg.retro.max_top_n {
		return Err(Error::Validation {
			message: "retro.default_top_n must not exceed retro.max_top_n.".to_string(),
		});
	}
	if !PRIORITIZERS.contains(&cfg.retro.prioritizer.as_str()) {
		return Err(Error::Validation {
			message: "retro.prioritizer must be one of popularity or none.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for resource in
		[&mut cfg.resources.context_recommender, &mut cfg.resources.retro_transformer]
	{
		resource.queue = resource.queue.trim().to_string();

		let model_path = resource.model_path.to_string_lossy().trim().to_string();
		let info_path = resource.info_path.to_string_lossy().trim().to_string();

		resource.model_path = model_path.into();
		resource.info_path = info_path.into();
	}

	cfg.retro.prioritizer = cfg.retro.prioritizer.trim().to_ascii_lowercase();
}
