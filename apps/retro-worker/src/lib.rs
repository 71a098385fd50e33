pub mod serve;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use retro_fabric::{Fabric, QueueName, QueueSet};
use retro_service::{RetroClient, WorkerRuntime};

#[derive(Debug, Parser)]
#[command(
	version = retro_cli::VERSION,
	rename_all = "kebab",
	styles = retro_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Comma-separated queues this process serves. Defaults to every configured resource queue.
	#[arg(long, short = 'Q', value_name = "CSV")]
	pub queues: Option<String>,
	#[arg(long, short = 'w', value_name = "N", default_value_t = 1)]
	pub workers: usize,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = retro_config::load(&args.config)?;
	init_tracing(&config)?;
	let announced = announced_queues(&config, args.queues.as_deref());
	if announced.is_empty() {
		return Err(eyre::eyre!("--queues must name at least one queue."));
	}
	if args.workers == 0 {
		return Err(eyre::eyre!("--workers must be greater than zero."));
	}

	let fabric = Fabric::new(config.fabric.queue_capacity);
	let mut workers = Vec::with_capacity(args.workers);

	for ordinal in 0..args.workers {
		let runtime =
			WorkerRuntime::bootstrap(format!("worker-{ordinal}"), &config, announced.clone())?;

		workers.push(runtime.into_worker().spawn(&fabric)?);
	}

	tracing::info!(queues = %announced, workers = args.workers, "Serving requests on stdin.");

	let client = RetroClient::new(fabric.clone(), &config);

	serve::serve(client, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

	fabric.shutdown();

	for worker in workers {
		worker.join().await;
	}

	Ok(())
}

pub fn announced_queues(config: &retro_config::Config, raw: Option<&str>) -> QueueSet {
	match raw {
		Some(raw) => QueueSet::parse(raw),
		None => [
			&config.resources.context_recommender.queue,
			&config.resources.retro_transformer.queue,
		]
		.into_iter()
		.map(|queue| QueueName::new(queue.as_str()))
		.collect(),
	}
}

fn init_tracing(config: &retro_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	// Stdout carries replies.
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
	Ok(())
}
