use std::{collections::HashSet, sync::Arc};

use crate::{
	Document, Error, LanguageModel, Result, Retriever, document, ensure_question,
	expand::{ExpansionVariant, QueryExpander},
	parse::QueryParse,
	pipeline::{self, Answer},
	prompt,
};

/// Rephrase the question several ways, retrieve for each, and answer from the unique union.
pub struct MultiQueryPipeline {
	retriever: Arc<dyn Retriever>,
	model: Arc<dyn LanguageModel>,
	expander: QueryExpander,
	query_count: u32,
	retrieval_concurrency: usize,
}
impl MultiQueryPipeline {
	pub fn new(
		retriever: Arc<dyn Retriever>,
		model: Arc<dyn LanguageModel>,
		cfg: &ragmux_config::MultiQuery,
		parse: QueryParse,
	) -> Self {
		let expander = QueryExpander::new(Arc::clone(&model), ExpansionVariant::MultiQuery, parse);

		Self {
			retriever,
			model,
			expander,
			query_count: cfg.query_count,
			retrieval_concurrency: cfg.retrieval_concurrency as usize,
		}
	}

	pub async fn answer(&self, question: &str) -> Result<Answer> {
		ensure_question(question)?;

		let queries = self.expander.expand(question, self.query_count).await?;
		let lists =
			pipeline::retrieve_all(&self.retriever, &queries, self.retrieval_concurrency).await?;
		let docs = unique_union(&lists);

		tracing::info!(query_count = queries.len(), unique_count = docs.len(), "Merged retrievals.");

		if docs.is_empty() {
			return Err(Error::EmptyRetrieval);
		}

		let context = document::format_context(&docs);
		let prompt = prompt::answer_prompt(&context, question);
		let text = self
			.model
			.generate(&prompt)
			.await
			.map_err(|err| Error::generation("Answer synthesis failed", &err))?;

		Ok(Answer { text, queries })
	}
}

/// Every distinct document across `lists`, in first-seen order.
pub fn unique_union(lists: &[Vec<Document>]) -> Vec<Document> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for doc in lists.iter().flatten() {
		if seen.insert(doc.canonical_key()) {
			out.push(doc.clone());
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn union_keeps_first_seen_order_without_repeats() {
		let lists = vec![
			vec![Document::new("a"), Document::new("b")],
			vec![Document::new("b"), Document::new("c")],
			Vec::new(),
			vec![Document::new("a")],
		];
		let union = unique_union(&lists);
		let contents: Vec<_> = union.iter().map(|doc| doc.content.as_str()).collect();

		assert_eq!(contents, vec!["a", "b", "c"]);
	}
}
