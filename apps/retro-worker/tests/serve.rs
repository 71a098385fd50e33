use serde_json::{Value, json};

use retro_fabric::{Fabric, QueueSet};
use retro_service::{RetroClient, WorkerRuntime};
use retro_testkit::{CONTEXT_QUEUE, ESTER_TARGET, FixtureDir, RETRO_QUEUE, sample_config};

fn replies(raw: &[u8]) -> Vec<Value> {
	String::from_utf8_lossy(raw)
		.lines()
		.map(|line| serde_json::from_str(line).expect("Reply is not JSON."))
		.collect()
}

fn by_id<'a>(replies: &'a [Value], id: &str) -> &'a Value {
	replies.iter().find(|reply| reply["id"] == id).expect("Missing reply.")
}

#[tokio::test]
async fn every_request_line_gets_one_reply() {
	let dir = FixtureDir::new("retro_worker").expect("Fixture dir failed.");
	let cfg = sample_config(&dir).expect("Sample config failed.");
	let fabric = Fabric::new(cfg.fabric.queue_capacity);
	let worker = WorkerRuntime::bootstrap("w0", &cfg, retro_worker::announced_queues(&cfg, None))
		.expect("Bootstrap failed.")
		.into_worker()
		.spawn(&fabric)
		.expect("Spawn failed.");
	let client = RetroClient::new(fabric.clone(), &cfg);
	let lines = [
		json!({
			"id": "a",
			"task": "enumerate_precursors",
			"target": ESTER_TARGET,
			"requested_count": 2
		})
		.to_string(),
		String::new(),
		json!({
			"id": "b",
			"task": "get_conditions",
			"reaction": { "reactants": ["CCO", "CC(=O)O"], "products": [ESTER_TARGET] },
			"count": 1
		})
		.to_string(),
		json!({ "id": "c", "task": "enumerate_precursors", "target": "" }).to_string(),
		"not json".to_string(),
	];
	let input = lines.join("\n") + "\n";
	let mut output = Vec::new();

	retro_worker::serve::serve(client, input.as_bytes(), &mut output).await.expect("Serve failed.");

	let replies = replies(&output);

	assert_eq!(replies.len(), 4);
	assert_eq!(by_id(&replies, "a")["ok"].as_array().map(Vec::len), Some(2));
	assert_eq!(by_id(&replies, "a")["ok"][0]["joined"], "CCO.CC(=O)O");
	assert_eq!(by_id(&replies, "b")["ok"][0]["solvent"], "Cc1ccccc1");
	assert_eq!(by_id(&replies, "c")["error"]["kind"], "INVALID_REQUEST");
	assert!(
		replies
			.iter()
			.any(|reply| reply.get("id").is_none() && reply["error"]["kind"] == "INVALID_REQUEST")
	);

	fabric.shutdown();
	worker.join().await;
}

#[test]
fn announced_queues_default_to_configured_resources() {
	let dir = FixtureDir::new("retro_worker").expect("Fixture dir failed.");
	let cfg = sample_config(&dir).expect("Sample config failed.");

	assert_eq!(
		retro_worker::announced_queues(&cfg, None),
		QueueSet::parse(&format!("{RETRO_QUEUE},{CONTEXT_QUEUE}"))
	);
	assert_eq!(
		retro_worker::announced_queues(&cfg, Some(" cr_nn_worker ,")),
		QueueSet::parse(CONTEXT_QUEUE)
	);
}
