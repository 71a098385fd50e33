use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub fabric: Fabric,
	pub resources: Resources,
	#[serde(default)]
	pub conditions: Conditions,
	#[serde(default)]
	pub retro: Retro,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Fabric {
	/// Bounded buffer per queue. Submitters wait once a queue is full.
	pub queue_capacity: usize,
	/// How long a caller waits on a submission before giving up on it.
	pub result_timeout_ms: u64,
}
impl Default for Fabric {
	fn default() -> Self {
		Self { queue_capacity: 64, result_timeout_ms: 30_000 }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Resources {
	pub context_recommender: ResourceConfig,
	pub retro_transformer: ResourceConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ResourceConfig {
	/// Queue a worker must be launched with for this resource to be loaded.
	pub queue: String,
	pub model_path: PathBuf,
	pub info_path: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Conditions {
	pub default_count: u32,
	pub max_count: u32,
	pub single_solvent: bool,
	pub with_smiles: bool,
}
impl Default for Conditions {
	fn default() -> Self {
		Self { default_count: 10, max_count: 100, single_solvent: true, with_smiles: true }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Retro {
	pub default_top_n: u32,
	pub max_top_n: u32,
	pub prioritizer: String,
}
impl Default for Retro {
	fn default() -> Self {
		Self { default_top_n: 50, max_top_n: 1_000, prioritizer: default_prioritizer() }
	}
}

fn default_prioritizer() -> String {
	"popularity".to_string()
}
