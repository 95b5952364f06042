use std::{
	io::{self, Write},
	path::PathBuf,
};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use ragmux_config::Config;
use ragmux_service::{AskResponse, INVALID_STRATEGY_MESSAGE, RagService, Strategy};

#[derive(Debug, Parser)]
#[command(
	version = ragmux_cli::VERSION,
	rename_all = "kebab",
	styles = ragmux_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// One of multi_query, fusion, or decomposition. Falls back to `strategies.default`.
	#[arg(long, short = 's', value_name = "NAME")]
	pub strategy: Option<String>,
	/// Read from stdin when omitted.
	#[arg(long, short = 'q', value_name = "TEXT")]
	pub question: Option<String>,
	/// Print the whole response as JSON instead of a labelled answer.
	#[arg(long)]
	pub json: bool,
}

/// Pipeline failures are reported on stdout and end the run normally. Only setup failures
/// propagate.
pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = ragmux_config::load(&args.config)?;

	init_tracing(&config)?;

	let Ok(strategy) = resolve_strategy(args.strategy.as_deref(), &config) else {
		println!("{INVALID_STRATEGY_MESSAGE}");

		return Ok(());
	};
	let question = match args.question {
		Some(question) => question,
		None => read_question().await?,
	};
	let service = match RagService::from_config(&config) {
		Ok(service) => service,
		Err(err) => {
			println!("Error: {err}");

			return Ok(());
		},
	};

	println!("{}", respond(&service, strategy, &question, args.json).await?);

	Ok(())
}

pub fn resolve_strategy(
	requested: Option<&str>,
	config: &Config,
) -> ragmux_service::Result<Strategy> {
	requested.unwrap_or(&config.strategies.default).parse()
}

/// Runs one question and renders the outcome as the line the CLI prints.
pub async fn respond(
	service: &RagService,
	strategy: Strategy,
	question: &str,
	json: bool,
) -> color_eyre::Result<String> {
	match service.ask(strategy, question).await {
		Ok(response) => render(&response, json),
		Err(err) => {
			tracing::error!(error = %err, "Question could not be answered.");

			Ok(format!("Error: {err}"))
		},
	}
}

pub fn render(response: &AskResponse, json: bool) -> color_eyre::Result<String> {
	if json {
		return Ok(serde_json::to_string_pretty(response)?);
	}

	Ok(format!("{} {}", response.strategy.answer_label(), response.answer))
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.try_init()
		.map_err(|err| color_eyre::eyre::eyre!("Failed to install tracing subscriber: {err}"))
}

async fn read_question() -> color_eyre::Result<String> {
	print!("Please enter your question: ");
	io::stdout().flush()?;

	let mut line = String::new();

	BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

	Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn second_tracing_install_is_reported() {
		let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../ragmux.example.toml");
		let config = ragmux_config::load(&path).expect("Failed to load example config.");

		// The first install may already have happened elsewhere in this process.
		let _ = init_tracing(&config);
		let err = init_tracing(&config).expect_err("Expected a duplicate install error.");

		assert!(err.to_string().contains("Failed to install tracing subscriber"), "{err}");
	}
}
