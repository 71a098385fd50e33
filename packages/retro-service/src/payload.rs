use serde::{Deserialize, Serialize};

use retro_providers::Reaction;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionsRequest {
	pub reaction: Reaction,
	/// Falls back to `conditions.default_count`; capped at `conditions.max_count`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub count: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub single_solvent: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub with_smiles: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrecursorsRequest {
	pub target: String,
	/// Falls back to `retro.default_top_n`; capped at `retro.max_top_n`. Zero or less yields an
	/// empty list.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub requested_count: Option<i64>,
}

/// Any request a caller can route through [`crate::RetroClient::dispatch`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Request {
	GetConditions(ConditionsRequest),
	EnumeratePrecursors(PrecursorsRequest),
}
