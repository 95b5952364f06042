pub mod document;
pub mod error;
pub mod expand;
pub mod http;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod rank_fusion;
pub mod strategy;

pub use document::Document;
pub use error::{Error, Result};
pub use expand::{ExpansionVariant, QueryExpander};
pub use parse::QueryParse;
pub use pipeline::{
	Answer, DecompositionPipeline, FusionPipeline, MultiQueryPipeline, QaPair, format_qa_pairs,
};
pub use rank_fusion::{DEFAULT_RRF_K, FusedEntry, FusedResult, RankFuser};
pub use strategy::{INVALID_STRATEGY_MESSAGE, Strategy};

use std::{future::Future, pin::Pin, sync::Arc};

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use ragmux_config::{Config, Strategies};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of ranked documents. Position in the returned list is the rank.
pub trait Retriever
where
	Self: Send + Sync,
{
	fn retrieve<'a>(&'a self, query: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>>;
}

/// Text generation with settings fixed at construction.
pub trait LanguageModel
where
	Self: Send + Sync,
{
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
	pub run_id: Uuid,
	pub strategy: Strategy,
	pub queries: Vec<String>,
	pub answer: String,
}

/// Owns the collaborators and the strategy settings, and routes each question to one pipeline.
///
/// Every call builds its pipeline state fresh; nothing carries over between calls.
pub struct RagService {
	strategies: Strategies,
	parse: QueryParse,
	default_strategy: Strategy,
	retriever: Arc<dyn Retriever>,
	model: Arc<dyn LanguageModel>,
}
impl RagService {
	pub fn builder() -> RagServiceBuilder {
		RagServiceBuilder::default()
	}

	/// Wires the HTTP collaborators described by `cfg`.
	pub fn from_config(cfg: &Config) -> Result<Self> {
		let retriever = http::HttpRetriever::new(&cfg.providers.retriever).map_err(|err| {
			Error::invalid_input(format!("Failed to build retriever client: {err}"))
		})?;
		let model = http::HttpLanguageModel::new(&cfg.providers.llm).map_err(|err| {
			Error::invalid_input(format!("Failed to build language model client: {err}"))
		})?;

		Self::builder()
			.strategies(cfg.strategies.clone())
			.retriever(Arc::new(retriever))
			.language_model(Arc::new(model))
			.build()
	}

	pub fn default_strategy(&self) -> Strategy {
		self.default_strategy
	}

	pub async fn ask(&self, strategy: Strategy, question: &str) -> Result<AskResponse> {
		let run_id = Uuid::new_v4();
		let span = tracing::info_span!("rag_run", %run_id, strategy = strategy.as_str());

		async move {
			tracing::info!("Run started.");

			let result = self.dispatch(strategy, question).await;

			match &result {
				Ok(answer) => tracing::info!(query_count = answer.queries.len(), "Run finished."),
				Err(err) => tracing::warn!(error = %err, "Run failed."),
			}

			result.map(|answer| AskResponse {
				run_id,
				strategy,
				queries: answer.queries,
				answer: answer.text,
			})
		}
		.instrument(span)
		.await
	}

	async fn dispatch(&self, strategy: Strategy, question: &str) -> Result<Answer> {
		let retriever = Arc::clone(&self.retriever);
		let model = Arc::clone(&self.model);

		match strategy {
			Strategy::MultiQuery =>
				MultiQueryPipeline::new(retriever, model, &self.strategies.multi_query, self.parse)
					.answer(question)
					.await,
			Strategy::Fusion =>
				FusionPipeline::new(retriever, model, &self.strategies.fusion, self.parse)?
					.answer(question)
					.await,
			Strategy::Decomposition => DecompositionPipeline::new(
				retriever,
				model,
				&self.strategies.decomposition,
				self.parse,
			)
			.answer(question)
			.await,
		}
	}
}

#[derive(Default)]
pub struct RagServiceBuilder {
	strategies: Option<Strategies>,
	retriever: Option<Arc<dyn Retriever>>,
	model: Option<Arc<dyn LanguageModel>>,
}
impl RagServiceBuilder {
	pub fn strategies(mut self, strategies: Strategies) -> Self {
		self.strategies = Some(strategies);

		self
	}

	pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
		self.retriever = Some(retriever);

		self
	}

	pub fn language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
		self.model = Some(model);

		self
	}

	pub fn build(self) -> Result<RagService> {
		let retriever =
			self.retriever.ok_or_else(|| Error::invalid_input("Retriever cannot be None."))?;
		let model =
			self.model.ok_or_else(|| Error::invalid_input("Language model cannot be None."))?;
		let strategies = self.strategies.unwrap_or_default();
		let parse = strategies.query_parse.parse::<QueryParse>()?;
		let default_strategy = strategies.default.parse::<Strategy>()?;

		// Zero k is rejected here, not on the first fusion run.
		RankFuser::new(strategies.fusion.rrf_k)?;

		Ok(RagService { strategies, parse, default_strategy, retriever, model })
	}
}

pub(crate) fn ensure_question(question: &str) -> Result<()> {
	if question.trim().is_empty() {
		return Err(Error::invalid_input("Question cannot be empty."));
	}

	Ok(())
}
