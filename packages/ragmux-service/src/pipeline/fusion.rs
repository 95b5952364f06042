use std::sync::Arc;

use crate::{
	Document, Error, LanguageModel, Result, Retriever, document, ensure_question,
	expand::{ExpansionVariant, QueryExpander},
	parse::QueryParse,
	pipeline::{self, Answer},
	prompt,
	rank_fusion::{FusedResult, RankFuser},
};

/// Expand, retrieve per query, fuse with RRF, then answer from the fused context.
pub struct FusionPipeline {
	retriever: Arc<dyn Retriever>,
	model: Arc<dyn LanguageModel>,
	expander: QueryExpander,
	fuser: RankFuser,
	query_count: u32,
	retrieval_concurrency: usize,
	max_context_documents: usize,
}
impl FusionPipeline {
	pub fn new(
		retriever: Arc<dyn Retriever>,
		model: Arc<dyn LanguageModel>,
		cfg: &ragmux_config::Fusion,
		parse: QueryParse,
	) -> Result<Self> {
		let expander = QueryExpander::new(Arc::clone(&model), ExpansionVariant::Fusion, parse);

		Ok(Self {
			retriever,
			model,
			expander,
			fuser: RankFuser::new(cfg.rrf_k)?,
			query_count: cfg.query_count,
			retrieval_concurrency: cfg.retrieval_concurrency as usize,
			max_context_documents: cfg.max_context_documents as usize,
		})
	}

	pub async fn answer(&self, question: &str) -> Result<Answer> {
		let (queries, fused) = self.retrieve_documents(question).await?;
		let text = self.answer_question(question, &fused).await?;

		Ok(Answer { text, queries })
	}

	/// Everything up to and including fusion. Fails with `EmptyRetrieval` when nothing came back.
	pub async fn retrieve_documents(&self, question: &str) -> Result<(Vec<String>, FusedResult)> {
		ensure_question(question)?;

		let queries = self.expander.expand(question, self.query_count).await?;
		let lists =
			pipeline::retrieve_all(&self.retriever, &queries, self.retrieval_concurrency).await?;
		let fused = self.fuser.fuse(&lists)?;
		let top_fingerprint =
			fused.documents().next().map(Document::fingerprint).unwrap_or_default();

		tracing::info!(
			query_count = queries.len(),
			retrieved_count = lists.iter().map(Vec::len).sum::<usize>(),
			fused_count = fused.len(),
			top_fingerprint = top_fingerprint.as_str(),
			"Fused retrieval results."
		);

		if fused.is_empty() {
			return Err(Error::EmptyRetrieval);
		}

		Ok((queries, fused))
	}

	pub async fn answer_question(&self, question: &str, fused: &FusedResult) -> Result<String> {
		if fused.is_empty() {
			return Err(Error::EmptyRetrieval);
		}

		let limit =
			if self.max_context_documents == 0 { fused.len() } else { self.max_context_documents };
		let context = document::format_context(fused.documents().take(limit));
		let prompt = prompt::answer_prompt(&context, question);

		self.model
			.generate(&prompt)
			.await
			.map_err(|err| Error::generation("Answer synthesis failed", &err))
	}
}
