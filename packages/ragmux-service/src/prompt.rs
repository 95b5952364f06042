//! Prompt templates. Rendering is plain string formatting; nothing here talks to a model.

use crate::expand::ExpansionVariant;

pub fn expansion_prompt(variant: ExpansionVariant, question: &str, count: u32) -> String {
	match variant {
		ExpansionVariant::MultiQuery => format!(
			"You are an AI language model assistant. Your task is to generate {count} different \
versions of the given user question to retrieve relevant documents from a vector database. \
By generating multiple perspectives on the user question, your goal is to help the user \
overcome some of the limitations of distance-based similarity search. \
Provide these alternative questions separated by newlines.\n\
Original question: {question}"
		),
		ExpansionVariant::Fusion => format!(
			"You are a helpful assistant that generates multiple search queries based on a single \
input query.\n\
Generate multiple search queries related to: {question}\n\
Output ({count} queries):"
		),
		ExpansionVariant::Decomposition => format!(
			"You are a helpful assistant that generates multiple sub-questions related to an input \
question.\n\
The goal is to break down the input into a set of sub-problems / sub-questions that can be \
answered in isolation.\n\
Generate multiple search queries related to: {question}\n\
Output ({count} queries):"
		),
	}
}

pub fn answer_prompt(context: &str, question: &str) -> String {
	format!(
		"Answer the following question based on this context:\n\n{context}\n\nQuestion: {question}\n"
	)
}

/// Per-sub-question prompt. `q_a_pairs` is empty unless answers are carried forward.
pub fn sub_question_prompt(question: &str, q_a_pairs: &str, context: &str) -> String {
	format!(
		"Here is the question you need to answer:\n\n--- \n{question}\n---\n\n\
Here is any available background question + answer pairs:\n\n--- \n{q_a_pairs}\n---\n\n\
Here is additional context relevant to the question:\n\n--- \n{context}\n---\n\n\
Use the above context and any background question + answer pairs to answer the question: \
\n{question}\n"
	)
}

pub fn synthesis_prompt(context: &str, question: &str) -> String {
	format!(
		"Here is a set of Q+A pairs:\n\n{context}\n\n\
Use these to synthesize an answer to the question: {question}\n"
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expansion_prompts_carry_count_and_question() {
		for (variant, count) in [
			(ExpansionVariant::MultiQuery, 5),
			(ExpansionVariant::Fusion, 4),
			(ExpansionVariant::Decomposition, 3),
		] {
			let prompt = expansion_prompt(variant, "What is RAG?", count);

			assert!(prompt.contains("What is RAG?"), "{variant:?} prompt lost the question.");
			assert!(prompt.contains(&count.to_string()), "{variant:?} prompt lost the count.");
		}
	}

	#[test]
	fn variants_use_different_instructions() {
		let fusion = expansion_prompt(ExpansionVariant::Fusion, "q", 4);
		let decomposition = expansion_prompt(ExpansionVariant::Decomposition, "q", 4);

		assert_ne!(fusion, decomposition);
		assert!(decomposition.contains("sub-questions"));
		assert!(fusion.contains("Output (4 queries):"));
	}

	#[test]
	fn answer_prompt_places_context_before_question() {
		let prompt = answer_prompt("doc one\ndoc two", "Why?");
		let context_at = prompt.find("doc one\ndoc two").expect("Missing context.");
		let question_at = prompt.find("Question: Why?").expect("Missing question.");

		assert!(context_at < question_at);
	}

	#[test]
	fn sub_question_prompt_renders_empty_background_slot() {
		let prompt = sub_question_prompt("q1", "", "ctx");

		assert!(prompt.contains("background question + answer pairs:\n\n--- \n\n---"));
		assert!(prompt.contains("--- \nctx\n---"));
	}

	#[test]
	fn synthesis_prompt_embeds_pairs() {
		let prompt = synthesis_prompt("Question 1: a\nAnswer 1: b", "main?");

		assert!(prompt.contains("Question 1: a\nAnswer 1: b"));
		assert!(prompt.ends_with("synthesize an answer to the question: main?\n"));
	}
}
