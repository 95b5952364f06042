use std::sync::Arc;

use serde::Serialize;

use crate::{
	Document, Error, LanguageModel, Result, Retriever, document, ensure_question,
	expand::{ExpansionVariant, QueryExpander},
	parse::QueryParse,
	pipeline::Answer,
	prompt,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaPair {
	pub question: String,
	pub answer: String,
}

/// Break the question into sub-questions, answer them one at a time, then synthesize.
///
/// The run is all-or-nothing: any failure before synthesis surfaces as `Decomposition` and no
/// partial answer is returned.
pub struct DecompositionPipeline {
	retriever: Arc<dyn Retriever>,
	model: Arc<dyn LanguageModel>,
	expander: QueryExpander,
	sub_question_count: u32,
	carry_forward_answers: bool,
}
impl DecompositionPipeline {
	pub fn new(
		retriever: Arc<dyn Retriever>,
		model: Arc<dyn LanguageModel>,
		cfg: &ragmux_config::Decomposition,
		parse: QueryParse,
	) -> Self {
		let expander =
			QueryExpander::new(Arc::clone(&model), ExpansionVariant::Decomposition, parse);

		Self {
			retriever,
			model,
			expander,
			sub_question_count: cfg.sub_question_count,
			carry_forward_answers: cfg.carry_forward_answers,
		}
	}

	pub async fn answer(&self, question: &str) -> Result<Answer> {
		ensure_question(question)?;

		let pairs = self.answer_sub_questions(question).await.map_err(Error::decomposition)?;
		let context = format_qa_pairs(&pairs);
		let prompt = prompt::synthesis_prompt(&context, question);
		let text = self
			.model
			.generate(&prompt)
			.await
			.map_err(|err| Error::generation("Final synthesis failed", &err))?;

		Ok(Answer { text, queries: pairs.into_iter().map(|pair| pair.question).collect() })
	}

	/// Sequential by construction: pair `i` is appended only after pair `i - 1` exists.
	pub async fn answer_sub_questions(&self, question: &str) -> Result<Vec<QaPair>> {
		let sub_questions = self.expander.expand(question, self.sub_question_count).await?;
		let mut pairs: Vec<QaPair> = Vec::with_capacity(sub_questions.len());

		for (index, sub_question) in sub_questions.into_iter().enumerate() {
			let docs: Vec<Document> =
				self.retriever.retrieve(&sub_question).await.map_err(|err| {
					Error::retrieval(&format!("Retriever failed for sub-question {}", index + 1), &err)
				})?;
			let background =
				if self.carry_forward_answers { format_background(&pairs) } else { String::new() };
			let prompt = prompt::sub_question_prompt(
				&sub_question,
				&background,
				&document::format_context(&docs),
			);
			let answer = self.model.generate(&prompt).await.map_err(|err| {
				Error::generation(&format!("Answering sub-question {} failed", index + 1), &err)
			})?;

			tracing::debug!(
				index = index + 1,
				sub_question = sub_question.as_str(),
				document_count = docs.len(),
				"Answered sub-question."
			);

			pairs.push(QaPair { question: sub_question, answer });
		}

		Ok(pairs)
	}
}

/// `Question i: ...\nAnswer i: ...` blocks, 1-indexed, blank-line separated, trailing space
/// trimmed.
pub fn format_qa_pairs(pairs: &[QaPair]) -> String {
	let mut out = String::new();

	for (i, pair) in pairs.iter().enumerate() {
		let n = i + 1;

		out.push_str(&format!("Question {n}: {}\nAnswer {n}: {}\n\n", pair.question, pair.answer));
	}

	out.trim_end().to_string()
}

fn format_background(pairs: &[QaPair]) -> String {
	pairs
		.iter()
		.map(|pair| format!("Question: {}\nAnswer: {}", pair.question, pair.answer))
		.collect::<Vec<_>>()
		.join("\n---\n")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pair(question: &str, answer: &str) -> QaPair {
		QaPair { question: question.to_string(), answer: answer.to_string() }
	}

	#[test]
	fn qa_pairs_are_numbered_in_order() {
		let formatted = format_qa_pairs(&[pair("q1", "a1"), pair("q2", "a2"), pair("q3", "a3")]);

		assert_eq!(
			formatted,
			"Question 1: q1\nAnswer 1: a1\n\nQuestion 2: q2\nAnswer 2: a2\n\nQuestion 3: q3\nAnswer 3: a3"
		);
	}

	#[test]
	fn no_pairs_format_to_empty_text() {
		assert_eq!(format_qa_pairs(&[]), "");
	}

	#[test]
	fn background_joins_pairs_with_separator() {
		let background = format_background(&[pair("q1", "a1"), pair("q2", "a2")]);

		assert_eq!(background, "Question: q1\nAnswer: a1\n---\nQuestion: q2\nAnswer: a2");
	}
}
