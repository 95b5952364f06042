use std::sync::Arc;

use crate::{
	Error, LanguageModel, Result, ensure_question,
	parse::{self, QueryParse},
	prompt,
};

/// Which instruction set the expansion prompt uses. Mechanics are identical across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionVariant {
	/// Alternative phrasings of the same question.
	MultiQuery,
	/// Broad related search queries.
	Fusion,
	/// A breakdown into sub-questions answerable in isolation.
	Decomposition,
}
impl ExpansionVariant {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::MultiQuery => "multi_query",
			Self::Fusion => "fusion",
			Self::Decomposition => "decomposition",
		}
	}
}

/// Asks the language model for related queries and splits the reply into a list.
#[derive(Clone)]
pub struct QueryExpander {
	model: Arc<dyn LanguageModel>,
	variant: ExpansionVariant,
	parse: QueryParse,
}
impl QueryExpander {
	pub fn new(model: Arc<dyn LanguageModel>, variant: ExpansionVariant, parse: QueryParse) -> Self {
		Self { model, variant, parse }
	}

	/// One model call. `count_hint` is only written into the prompt; the reply is not cut to it.
	pub async fn expand(&self, question: &str, count_hint: u32) -> Result<Vec<String>> {
		ensure_question(question)?;

		let prompt = prompt::expansion_prompt(self.variant, question, count_hint);
		let raw = self
			.model
			.generate(&prompt)
			.await
			.map_err(|err| Error::generation("Query expansion failed", &err))?;
		let mut queries = parse::parse_queries(&raw, self.parse);

		if queries.is_empty() {
			tracing::warn!(
				variant = self.variant.as_str(),
				"Query expansion produced no queries; falling back to the original question."
			);

			queries.push(question.to_string());
		}

		tracing::debug!(
			variant = self.variant.as_str(),
			parse = self.parse.as_str(),
			query_count = queries.len(),
			"Expanded queries."
		);

		Ok(queries)
	}
}
