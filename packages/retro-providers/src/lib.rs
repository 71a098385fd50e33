pub mod context;
pub mod library;
pub mod prioritizer;

mod error;

pub use context::{ContextModel, Reaction, Recommendation};
pub use error::{Error, Result};
pub use library::PrecursorLibrary;
pub use prioritizer::{NoPrioritizer, PopularityPrioritizer, prioritizer_by_name};

use std::{fs, path::Path};

use serde::de::DeserializeOwned;

fn read_json<T>(path: &Path) -> Result<T>
where
	T: DeserializeOwned,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	serde_json::from_str(&raw).map_err(|err| Error::Decode { path: path.to_path_buf(), source: err })
}
