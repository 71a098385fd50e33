use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	thread,
	time::Duration,
};

use serde_json::{Value, json};

use retro_fabric::{Error, Fabric, QueueName, TaskFailure, TaskHandler, Worker};

struct Echo;
impl TaskHandler for Echo {
	fn handle(&self, payload: Value) -> Result<Value, TaskFailure> {
		Ok(json!({ "echo": payload }))
	}
}

struct Refuse;
impl TaskHandler for Refuse {
	fn handle(&self, _payload: Value) -> Result<Value, TaskFailure> {
		Err(TaskFailure::new("INVALID_REQUEST", "no thanks"))
	}
}

/// Records the peak number of concurrently running calls.
#[derive(Default)]
struct Tracker {
	running: AtomicUsize,
	peak: AtomicUsize,
	done: AtomicUsize,
}
impl TaskHandler for Tracker {
	fn handle(&self, payload: Value) -> Result<Value, TaskFailure> {
		let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;

		self.peak.fetch_max(now, Ordering::SeqCst);
		thread::sleep(Duration::from_millis(5));
		self.running.fetch_sub(1, Ordering::SeqCst);
		self.done.fetch_add(1, Ordering::SeqCst);

		Ok(payload)
	}
}

struct Shared(Arc<Tracker>);
impl TaskHandler for Shared {
	fn handle(&self, payload: Value) -> Result<Value, TaskFailure> {
		self.0.handle(payload)
	}
}

#[tokio::test]
async fn submission_before_bind_is_delivered() {
	let fabric = Fabric::new(8);
	let queue = QueueName::from("q");
	let handle = fabric.submit(&queue, json!(1)).await.expect("Submit failed.");
	let worker = Worker::new("w0").bind(queue, Arc::new(Echo)).spawn(&fabric).expect("Spawn failed.");

	assert_eq!(handle.await.expect("Task failed."), json!({ "echo": 1 }));

	fabric.shutdown();
	worker.join().await;
}

#[tokio::test]
async fn handler_failure_reaches_the_caller() {
	let fabric = Fabric::new(8);
	let queue = QueueName::from("q");
	let worker = Worker::new("w0").bind(queue.clone(), Arc::new(Refuse)).spawn(&fabric).expect("Spawn failed.");
	let err = fabric
		.submit(&queue, json!({}))
		.await
		.expect("Submit failed.")
		.await
		.expect_err("Expected handler failure.");

	match err {
		Error::Task(failure) => {
			assert_eq!(failure.kind, "INVALID_REQUEST");
			assert_eq!(failure.message, "no thanks");
		},
		other => panic!("Unexpected error: {other}"),
	}

	fabric.shutdown();
	worker.join().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn competing_workers_each_task_runs_once() {
	let fabric = Fabric::new(4);
	let queue = QueueName::from("q");
	let tracker = Arc::new(Tracker::default());
	let workers: Vec<_> = (0..3)
		.map(|idx| {
			Worker::new(format!("w{idx}"))
				.bind(queue.clone(), Arc::new(Shared(tracker.clone())))
				.spawn(&fabric)
				.expect("Spawn failed.")
		})
		.collect();
	let mut handles = Vec::new();

	for idx in 0..20 {
		handles.push(fabric.submit(&queue, json!(idx)).await.expect("Submit failed."));
	}

	let mut results = Vec::new();

	for handle in handles {
		results.push(handle.await.expect("Task failed."));
	}

	assert_eq!(results, (0..20).map(|idx| json!(idx)).collect::<Vec<_>>());
	assert_eq!(tracker.done.load(Ordering::SeqCst), 20);

	fabric.shutdown();

	for worker in workers {
		worker.join().await;
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_worker_runs_tasks_sequentially_across_queues() {
	let fabric = Fabric::new(8);
	let tracker = Arc::new(Tracker::default());
	let a = QueueName::from("a");
	let b = QueueName::from("b");
	let worker = Worker::new("w0")
		.bind(a.clone(), Arc::new(Shared(tracker.clone())))
		.bind(b.clone(), Arc::new(Shared(tracker.clone())))
		.spawn(&fabric)
		.expect("Spawn failed.");
	let mut handles = Vec::new();

	for idx in 0..6 {
		let queue = if idx % 2 == 0 { &a } else { &b };

		handles.push(fabric.submit(queue, json!(idx)).await.expect("Submit failed."));
	}
	for handle in handles {
		handle.await.expect("Task failed.");
	}

	assert_eq!(tracker.peak.load(Ordering::SeqCst), 1);

	fabric.shutdown();
	worker.join().await;
}

#[tokio::test]
async fn abandoned_submission_still_runs() {
	let fabric = Fabric::new(8);
	let queue = QueueName::from("q");
	let tracker = Arc::new(Tracker::default());
	let worker = Worker::new("w0")
		.bind(queue.clone(), Arc::new(Shared(tracker.clone())))
		.spawn(&fabric)
		.expect("Spawn failed.");

	drop(fabric.submit(&queue, json!("dropped")).await.expect("Submit failed."));

	let kept = fabric.submit(&queue, json!("kept")).await.expect("Submit failed.");

	assert_eq!(kept.await.expect("Task failed."), json!("kept"));

	fabric.shutdown();
	worker.join().await;

	assert_eq!(tracker.done.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn shutdown_refuses_new_work() {
	let fabric = Fabric::new(8);
	let queue = QueueName::from("q");

	fabric.shutdown();

	assert!(fabric.is_closed());

	let err = fabric.submit(&queue, json!(null)).await.expect_err("Expected transport failure.");

	assert!(matches!(err, Error::TransportFailure { .. }), "Unexpected error: {err}");
	assert!(fabric.bind(&queue).is_err());
}

#[tokio::test]
async fn unserved_work_fails_on_shutdown() {
	let fabric = Fabric::new(8);
	let handle = fabric.submit(&QueueName::from("nobody"), json!(1)).await.expect("Submit failed.");

	fabric.shutdown();

	let err = handle.await.expect_err("Expected transport failure.");

	assert!(matches!(err, Error::TransportFailure { .. }), "Unexpected error: {err}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn buffered_work_drains_after_shutdown() {
	let fabric = Fabric::new(8);
	let queue = QueueName::from("q");
	let tracker = Arc::new(Tracker::default());
	let worker = Worker::new("w0")
		.bind(queue.clone(), Arc::new(Shared(tracker.clone())))
		.spawn(&fabric)
		.expect("Spawn failed.");
	let mut handles = Vec::new();

	for idx in 0..6 {
		handles.push(fabric.submit(&queue, json!(idx)).await.expect("Submit failed."));
	}

	fabric.shutdown();

	for (idx, handle) in handles.into_iter().enumerate() {
		assert_eq!(handle.await.expect("Buffered task must still run."), json!(idx));
	}

	worker.join().await;

	assert_eq!(tracker.done.load(Ordering::SeqCst), 6);
}
