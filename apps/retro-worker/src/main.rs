use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = retro_worker::Args::parse();
	retro_worker::run(args).await
}
