use std::path::Path;

use ahash::{AHashMap, AHashSet};
use serde::Deserialize;

use retro_domain::{ScoredCandidate, Target};

use crate::{Error, Result};

#[derive(Clone, Debug, Deserialize)]
pub struct TransformRecord {
	pub template_id: i64,
	pub product: String,
	pub precursors: Vec<String>,
	#[serde(default)]
	pub num_examples: u64,
	#[serde(default)]
	pub necessary_reagent: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LibraryInfo {
	pub name: String,
	pub version: String,
	pub template_count: usize,
}

/// Precomputed one-step disconnections, keyed by product.
#[derive(Debug)]
pub struct PrecursorLibrary {
	info: LibraryInfo,
	records: Vec<TransformRecord>,
	by_product: AHashMap<String, Vec<usize>>,
}
impl PrecursorLibrary {
	pub fn load(model_path: &Path, info_path: &Path) -> Result<Self> {
		let info: LibraryInfo = crate::read_json(info_path)?;
		let records: Vec<TransformRecord> = crate::read_json(model_path)?;
		let library = Self::new(info, records)?;

		tracing::info!(
			name = %library.info.name,
			version = %library.info.version,
			records = library.len(),
			products = library.by_product.len(),
			"Precursor library loaded."
		);

		Ok(library)
	}

	pub fn new(info: LibraryInfo, records: Vec<TransformRecord>) -> Result<Self> {
		let templates: AHashSet<i64> = records.iter().map(|record| record.template_id).collect();

		if templates.len() != info.template_count {
			return Err(Error::InvalidModel {
				message: format!(
					"Precursor library {} declares {} templates but holds {}.",
					info.name,
					info.template_count,
					templates.len()
				),
			});
		}

		let mut by_product: AHashMap<String, Vec<usize>> = AHashMap::new();

		for (pos, record) in records.iter().enumerate() {
			by_product.entry(record.product.clone()).or_default().push(pos);
		}

		Ok(Self { info, records, by_product })
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Raw proposals for `target`, in library order. Unknown targets yield nothing.
	pub fn enumerate<'a>(&'a self, target: &Target) -> impl Iterator<Item = ScoredCandidate> + 'a {
		let positions: &'a [usize] =
			self.by_product.get(target.as_str()).map(Vec::as_slice).unwrap_or(&[]);

		positions.iter().map(move |&pos| {
			let record = &self.records[pos];
			let candidate = ScoredCandidate::new(
				record.precursors.clone(),
				record.template_id,
				record.num_examples,
			);

			match record.necessary_reagent.as_deref() {
				Some(reagent) => candidate.with_required_auxiliary(reagent),
				None => candidate,
			}
		})
	}
}
