use std::{path::Path, sync::Arc};

use clap::Parser;

use ragmux::{Args, render, resolve_strategy, respond};
use ragmux_service::{
	AskResponse, BoxFuture, Document, Error, LanguageModel, RagService, Retriever, Strategy,
};

struct StaticRetriever;
impl Retriever for StaticRetriever {
	fn retrieve<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>> {
		Box::pin(async move { Ok(vec![Document::new("RAG pairs retrieval with generation.")]) })
	}
}

struct EmptyRetriever;
impl Retriever for EmptyRetriever {
	fn retrieve<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}
}

struct FixedModel;
impl LanguageModel for FixedModel {
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, color_eyre::Result<String>> {
		let reply = if prompt.contains("Output (") || prompt.contains("different versions") {
			"what is rag\nhow does rag work"
		} else {
			"It grounds answers in retrieved text."
		};

		Box::pin(async move { Ok(reply.to_string()) })
	}
}

fn example_config() -> ragmux_config::Config {
	let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../ragmux.example.toml");

	ragmux_config::load(&path).expect("Failed to load example config.")
}

fn service(retriever: Arc<dyn Retriever>) -> RagService {
	RagService::builder()
		.retriever(retriever)
		.language_model(Arc::new(FixedModel))
		.build()
		.expect("Failed to build service.")
}

#[test]
fn args_accept_short_and_long_flags() {
	let args = Args::try_parse_from([
		"ragmux",
		"-c",
		"ragmux.toml",
		"-s",
		"Fusion",
		"--question",
		"What is RAG?",
		"--json",
	])
	.expect("Failed to parse args.");

	assert_eq!(args.config, Path::new("ragmux.toml"));
	assert_eq!(args.strategy.as_deref(), Some("Fusion"));
	assert_eq!(args.question.as_deref(), Some("What is RAG?"));
	assert!(args.json);
}

#[test]
fn config_flag_is_required() {
	assert!(Args::try_parse_from(["ragmux", "-s", "fusion"]).is_err());
}

#[test]
fn strategy_falls_back_to_configured_default() {
	let config = example_config();

	assert_eq!(resolve_strategy(None, &config).expect("Expected default."), Strategy::MultiQuery);
	assert_eq!(
		resolve_strategy(Some("DECOMPOSITION"), &config).expect("Expected decomposition."),
		Strategy::Decomposition
	);

	let err = resolve_strategy(Some("hyde"), &config).expect_err("Expected invalid strategy.");

	assert!(matches!(err, Error::InvalidInput { .. }), "Unexpected error: {err:?}");
}

#[test]
fn render_prefixes_label_per_strategy() {
	let mut response = AskResponse {
		run_id: Default::default(),
		strategy: Strategy::Fusion,
		queries: vec!["q".to_string()],
		answer: "42".to_string(),
	};

	assert_eq!(render(&response, false).expect("Render failed."), "Answer: 42");

	response.strategy = Strategy::Decomposition;

	assert_eq!(render(&response, false).expect("Render failed."), "Final Answer: 42");

	let json: serde_json::Value =
		serde_json::from_str(&render(&response, true).expect("Render failed."))
			.expect("Rendered JSON is invalid.");

	assert_eq!(json["strategy"], "decomposition");
	assert_eq!(json["answer"], "42");
}

#[tokio::test]
async fn respond_prints_answer_on_success() {
	let service = service(Arc::new(StaticRetriever));
	let line = respond(&service, Strategy::Fusion, "What is RAG?", false)
		.await
		.expect("Respond failed.");

	assert_eq!(line, "Answer: It grounds answers in retrieved text.");
}

#[tokio::test]
async fn respond_reports_failures_as_text() {
	let service = service(Arc::new(EmptyRetriever));
	let line = respond(&service, Strategy::Fusion, "What is RAG?", false)
		.await
		.expect("Respond failed.");

	assert_eq!(line, "Error: No documents retrieved for the given question.");

	let line = respond(&service, Strategy::MultiQuery, "   ", false).await.expect("Respond failed.");

	assert!(line.starts_with("Error: Invalid input: Question cannot be empty."), "{line}");
}
