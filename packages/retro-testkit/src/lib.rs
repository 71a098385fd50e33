mod error;

pub use error::{Error, Result};

use std::{
	collections::HashMap,
	env, fs,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, AtomicUsize, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use serde_json::{Value, json};

use retro_domain::{Error as DomainError, Prioritizer, Result as DomainResult, ScoredCandidate};

pub const CONTEXT_QUEUE: &str = "cr_nn_worker";
pub const RETRO_QUEUE: &str = "tb_c_worker";
/// Product with three distinct precursor sets in [`library_records`], one of them listed twice.
pub const ESTER_TARGET: &str = "CCOC(C)=O";
pub const AMIDE_TARGET: &str = "CC(=O)Nc1ccccc1";

/// Scratch directory removed on drop.
pub struct FixtureDir {
	path: PathBuf,
}
impl FixtureDir {
	pub fn new(prefix: &str) -> Result<Self> {
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|err| Error::Message(format!("System time is before the epoch: {err}.")))?
			.as_nanos();
		let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
		let pid = std::process::id();
		let mut path = env::temp_dir();

		path.push(format!("{prefix}_{nanos}_{pid}_{ordinal}"));

		fs::create_dir_all(&path)?;

		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn join(&self, name: &str) -> PathBuf {
		self.path.join(name)
	}

	pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
		let path = self.join(name);

		fs::write(&path, contents)?;

		Ok(path)
	}

	pub fn write_json(&self, name: &str, value: &Value) -> Result<PathBuf> {
		let raw = serde_json::to_string_pretty(value)
			.map_err(|err| Error::Message(format!("Failed to encode fixture {name}: {err}.")))?;

		self.write(name, &raw)
	}

	/// Writes both resources, their info files and a config pointing at them.
	pub fn write_sample_setup(&self) -> Result<PathBuf> {
		self.write_json("reactions.json", &context_references())?;
		self.write_json("context_info.json", &context_info(3))?;
		self.write_json("templates.json", &library_records())?;
		self.write_json("library_info.json", &library_info(5))?;

		self.write("config.toml", &sample_config_toml(self.path()))
	}
}
impl Drop for FixtureDir {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.path);
	}
}

pub fn sample_config_toml(dir: &Path) -> String {
	let path = |name: &str| dir.join(name).to_string_lossy().replace('\\', "/");

	format!(
		r#"[service]
log_level = "warn"

[fabric]
queue_capacity = 16
result_timeout_ms = 5000

[resources.context_recommender]
queue = "{CONTEXT_QUEUE}"
model_path = "{}"
info_path = "{}"

[resources.retro_transformer]
queue = "{RETRO_QUEUE}"
model_path = "{}"
info_path = "{}"

[conditions]
default_count = 10
max_count = 20
single_solvent = true
with_smiles = true

[retro]
default_top_n = 50
max_top_n = 100
prioritizer = "popularity"
"#,
		path("reactions.json"),
		path("context_info.json"),
		path("templates.json"),
		path("library_info.json"),
	)
}

/// Loads the config written by [`FixtureDir::write_sample_setup`].
pub fn sample_config(dir: &FixtureDir) -> Result<retro_config::Config> {
	let path = dir.write_sample_setup()?;

	Ok(retro_config::load(&path)?)
}

pub fn context_references() -> Value {
	json!([
		{
			"reactants": ["CCO", "CC(=O)O"],
			"products": [ESTER_TARGET],
			"context": {
				"temperature": 80.0,
				"solvent": [{ "name": "toluene", "smiles": "Cc1ccccc1" }],
				"reagent": [{ "name": "sulfuric acid", "smiles": "O=S(=O)(O)O" }],
				"catalyst": []
			}
		},
		{
			"reactants": ["CC(=O)Cl", "CCO"],
			"products": [ESTER_TARGET],
			"context": {
				"temperature": 0.0,
				"solvent": [{ "name": "dichloromethane", "smiles": "ClCCl" }],
				"reagent": [{ "name": "triethylamine", "smiles": "CCN(CC)CC" }],
				"catalyst": []
			}
		},
		{
			"reactants": ["CC(=O)Cl", "Nc1ccccc1"],
			"products": [AMIDE_TARGET],
			"context": {
				"temperature": 25.0,
				"solvent": [
					{ "name": "water", "smiles": "O" },
					{ "name": "tetrahydrofuran", "smiles": "C1CCOC1" }
				],
				"reagent": [],
				"catalyst": []
			}
		}
	])
}

pub fn context_info(reaction_count: usize) -> Value {
	json!({ "name": "nn-context", "version": "1", "reaction_count": reaction_count })
}

pub fn library_records() -> Value {
	json!([
		{ "template_id": 1, "product": ESTER_TARGET, "precursors": ["CCO", "CC(=O)O"], "num_examples": 10 },
		{ "template_id": 2, "product": ESTER_TARGET, "precursors": ["CC(=O)Cl", "CCO"], "num_examples": 5, "necessary_reagent": "" },
		{ "template_id": 3, "product": ESTER_TARGET, "precursors": ["CCO", "CC(=O)O"], "num_examples": 4 },
		{ "template_id": 4, "product": ESTER_TARGET, "precursors": ["CC(=O)OC(C)=O", "CCO"], "num_examples": 2, "necessary_reagent": "N" },
		{ "template_id": 5, "product": AMIDE_TARGET, "precursors": ["CC(=O)Cl", "Nc1ccccc1"], "num_examples": 7 }
	])
}

pub fn library_info(template_count: usize) -> Value {
	json!({ "name": "one-step", "version": "1", "template_count": template_count })
}

/// Scores by joined components; unknown keys score `fallback`.
pub struct FixedPrioritizer {
	scores: HashMap<String, f64>,
	fallback: f64,
	calls: AtomicUsize,
}
impl FixedPrioritizer {
	pub fn new(entries: &[(&str, f64)], fallback: f64) -> Self {
		Self {
			scores: entries.iter().map(|(key, score)| (key.to_string(), *score)).collect(),
			fallback,
			calls: AtomicUsize::new(0),
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl Prioritizer for FixedPrioritizer {
	fn name(&self) -> &str {
		"fixed"
	}

	fn score(&self, candidate: &ScoredCandidate) -> DomainResult<f64> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Ok(self.scores.get(&candidate.joined()).copied().unwrap_or(self.fallback))
	}
}

pub struct FailingPrioritizer;
impl Prioritizer for FailingPrioritizer {
	fn name(&self) -> &str {
		"failing"
	}

	fn score(&self, _candidate: &ScoredCandidate) -> DomainResult<f64> {
		Err(DomainError::ScoringUnavailable { message: "Scoring model is offline.".to_string() })
	}
}
