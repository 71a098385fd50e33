//! Nearest-neighbour reaction condition recommender.
//!
//! The model is a library of reference reactions with the conditions they were run under.
//! A query reaction is compared against every reference by identifier-set overlap and the
//! conditions of the closest references are returned.

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
	pub reactants: Vec<String>,
	pub products: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Species {
	pub name: String,
	pub smiles: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReactionContext {
	pub temperature: f64,
	#[serde(default)]
	pub solvent: Vec<Species>,
	#[serde(default)]
	pub reagent: Vec<Species>,
	#[serde(default)]
	pub catalyst: Vec<Species>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReferenceReaction {
	pub reactants: Vec<String>,
	pub products: Vec<String>,
	pub context: ReactionContext,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ContextModelInfo {
	pub name: String,
	pub version: String,
	pub reaction_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
	pub temperature: f64,
	pub solvent: String,
	pub reagent: String,
	pub catalyst: String,
	pub similarity: f64,
}

#[derive(Debug)]
pub struct ContextModel {
	info: ContextModelInfo,
	references: Vec<ReferenceReaction>,
}
impl ContextModel {
	pub fn load(model_path: &Path, info_path: &Path) -> Result<Self> {
		let info: ContextModelInfo = crate::read_json(info_path)?;
		let references: Vec<ReferenceReaction> = crate::read_json(model_path)?;
		let model = Self::new(info, references)?;

		tracing::info!(
			name = %model.info.name,
			version = %model.info.version,
			reactions = model.len(),
			"Context model loaded."
		);

		Ok(model)
	}

	pub fn new(info: ContextModelInfo, references: Vec<ReferenceReaction>) -> Result<Self> {
		if references.len() != info.reaction_count {
			return Err(Error::InvalidModel {
				message: format!(
					"Context model {} declares {} reactions but holds {}.",
					info.name,
					info.reaction_count,
					references.len()
				),
			});
		}

		Ok(Self { info, references })
	}

	pub fn len(&self) -> usize {
		self.references.len()
	}

	pub fn is_empty(&self) -> bool {
		self.references.is_empty()
	}

	/// Up to `n` distinct condition sets, closest references first.
	pub fn recommend(
		&self,
		reaction: &Reaction,
		n: usize,
		single_solvent: bool,
		with_smiles: bool,
	) -> Vec<Recommendation> {
		let reactants = to_set(&reaction.reactants);
		let products = to_set(&reaction.products);
		let mut scored: Vec<(f64, &ReferenceReaction)> = self
			.references
			.iter()
			.map(|reference| {
				let similarity = 0.5 * jaccard(&reactants, &to_set(&reference.reactants))
					+ 0.5 * jaccard(&products, &to_set(&reference.products));

				(similarity, reference)
			})
			.collect();

		// Stable, so equally similar references keep file order.
		scored.sort_by(|lhs, rhs| rhs.0.total_cmp(&lhs.0));

		let mut out: Vec<Recommendation> = Vec::new();

		for (similarity, reference) in scored {
			if out.len() >= n {
				break;
			}

			let context = &reference.context;

			if single_solvent && context.solvent.len() > 1 {
				continue;
			}

			let candidate = Recommendation {
				temperature: context.temperature,
				solvent: render(&context.solvent, with_smiles),
				reagent: render(&context.reagent, with_smiles),
				catalyst: render(&context.catalyst, with_smiles),
				similarity,
			};

			if out.iter().any(|existing| same_conditions(existing, &candidate)) {
				continue;
			}

			out.push(candidate);
		}

		out
	}
}

fn to_set(items: &[String]) -> HashSet<&str> {
	items.iter().map(String::as_str).collect()
}

fn jaccard(lhs: &HashSet<&str>, rhs: &HashSet<&str>) -> f64 {
	let union = lhs.union(rhs).count();

	if union == 0 {
		return 0.0;
	}

	lhs.intersection(rhs).count() as f64 / union as f64
}

fn render(species: &[Species], with_smiles: bool) -> String {
	species
		.iter()
		.map(|item| if with_smiles { item.smiles.as_str() } else { item.name.as_str() })
		.collect::<Vec<_>>()
		.join(".")
}

fn same_conditions(lhs: &Recommendation, rhs: &Recommendation) -> bool {
	lhs.temperature.to_bits() == rhs.temperature.to_bits()
		&& lhs.solvent == rhs.solvent
		&& lhs.reagent == rhs.reagent
		&& lhs.catalyst == rhs.catalyst
}
