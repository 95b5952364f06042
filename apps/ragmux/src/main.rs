use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = ragmux::Args::parse();

	ragmux::run(args).await
}
