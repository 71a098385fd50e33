use serde_json::json;

use retro_domain::{CandidateAggregator, Target};
use retro_providers::{ContextModel, Error, PopularityPrioritizer, PrecursorLibrary, Reaction};
use retro_testkit::{
	AMIDE_TARGET, ESTER_TARGET, FixtureDir, context_info, context_references, library_info,
	library_records,
};

fn ester_reaction() -> Reaction {
	Reaction {
		reactants: vec!["CCO".to_string(), "CC(=O)O".to_string()],
		products: vec![ESTER_TARGET.to_string()],
	}
}

fn load_context(dir: &FixtureDir, declared: usize) -> retro_providers::Result<ContextModel> {
	let model = dir.write_json("reactions.json", &context_references()).expect("Fixture write failed.");
	let info = dir.write_json("info.json", &context_info(declared)).expect("Fixture write failed.");

	ContextModel::load(&model, &info)
}

fn load_library(dir: &FixtureDir, declared: usize) -> retro_providers::Result<PrecursorLibrary> {
	let model = dir.write_json("templates.json", &library_records()).expect("Fixture write failed.");
	let info = dir.write_json("info.json", &library_info(declared)).expect("Fixture write failed.");

	PrecursorLibrary::load(&model, &info)
}

#[test]
fn context_model_ranks_closest_reference_first() {
	let dir = FixtureDir::new("retro_providers").expect("Fixture dir failed.");
	let model = load_context(&dir, 3).expect("Model load failed.");
	let recs = model.recommend(&ester_reaction(), 10, true, true);

	assert_eq!(recs.len(), 2);
	assert_eq!(recs[0].solvent, "Cc1ccccc1");
	assert_eq!(recs[0].reagent, "O=S(=O)(O)O");
	assert_eq!(recs[0].similarity, 1.0);
	assert_eq!(recs[1].solvent, "ClCCl");
	assert!(recs[1].similarity < recs[0].similarity);
}

#[test]
fn context_model_respects_flags_and_count() {
	let dir = FixtureDir::new("retro_providers").expect("Fixture dir failed.");
	let model = load_context(&dir, 3).expect("Model load failed.");
	let mixed = model.recommend(&ester_reaction(), 10, false, false);

	assert_eq!(mixed.len(), 3);
	assert_eq!(mixed[0].solvent, "toluene");
	assert_eq!(mixed[2].solvent, "water.tetrahydrofuran");
	assert_eq!(mixed[2].catalyst, "");
	assert_eq!(model.recommend(&ester_reaction(), 1, false, true).len(), 1);
	assert!(model.recommend(&ester_reaction(), 0, false, true).is_empty());
}

#[test]
fn context_model_rejects_count_mismatch() {
	let dir = FixtureDir::new("retro_providers").expect("Fixture dir failed.");
	let err = load_context(&dir, 4).expect_err("Expected count mismatch.");

	assert!(matches!(err, Error::InvalidModel { .. }), "Unexpected error: {err}");
}

#[test]
fn missing_model_file_is_a_read_error() {
	let dir = FixtureDir::new("retro_providers").expect("Fixture dir failed.");
	let info = dir.write_json("info.json", &context_info(0)).expect("Fixture write failed.");
	let err = ContextModel::load(&dir.join("absent.json"), &info).expect_err("Expected read error.");

	let Error::Read { source, .. } = &err else {
		panic!("Unexpected error: {err}");
	};

	assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
	assert!(err.to_string().ends_with(&source.to_string()), "Unexpected error: {err}");
}

#[test]
fn malformed_info_is_a_decode_error() {
	let dir = FixtureDir::new("retro_providers").expect("Fixture dir failed.");
	let model = dir.write_json("templates.json", &library_records()).expect("Fixture write failed.");
	let info = dir.write_json("info.json", &json!({ "name": "x" })).expect("Fixture write failed.");
	let err = PrecursorLibrary::load(&model, &info).expect_err("Expected decode error.");

	assert!(matches!(err, Error::Decode { .. }), "Unexpected error: {err}");
}

#[test]
fn library_enumerates_target_records_in_order() {
	let dir = FixtureDir::new("retro_providers").expect("Fixture dir failed.");
	let library = load_library(&dir, 5).expect("Library load failed.");
	let proposals: Vec<_> = library.enumerate(&Target::new(ESTER_TARGET)).collect();

	assert_eq!(library.len(), 5);
	assert_eq!(proposals.len(), 4);
	assert_eq!(proposals[0].joined(), "CCO.CC(=O)O");
	assert_eq!(proposals[1].required_auxiliary, None);
	assert_eq!(proposals[3].required_auxiliary.as_deref(), Some("N"));
	assert_eq!(library.enumerate(&Target::new(AMIDE_TARGET)).count(), 1);
	assert_eq!(library.enumerate(&Target::new("C")).count(), 0);
}

#[test]
fn library_rejects_template_count_mismatch() {
	let dir = FixtureDir::new("retro_providers").expect("Fixture dir failed.");
	let err = load_library(&dir, 2).expect_err("Expected count mismatch.");

	assert!(err.to_string().contains("declares 2 templates but holds 5"), "Unexpected error: {err}");
}

#[test]
fn library_feeds_aggregator_end_to_end() {
	let dir = FixtureDir::new("retro_providers").expect("Fixture dir failed.");
	let library = load_library(&dir, 5).expect("Library load failed.");
	let target = Target::new(ESTER_TARGET);
	let prioritizer = PopularityPrioritizer::default();
	let mut agg = CandidateAggregator::new(target.clone());

	for candidate in library.enumerate(&target) {
		agg.add_candidate(candidate, &prioritizer).expect("Aggregation failed.");
	}

	let top = agg.top_n(10);
	let names: Vec<&str> = top.iter().map(|entry| entry.joined.as_str()).collect();

	assert_eq!(names, vec!["CCO.CC(=O)O", "CC(=O)Cl.CCO", "CC(=O)OC(C)=O.CCO"]);
	assert_eq!(top[0].occurrence_count, 14);
	assert_eq!(top[0].source_ids, vec![1, 3]);
	assert!((top[0].score - 11.0_f64.ln()).abs() < 1e-12);
}
