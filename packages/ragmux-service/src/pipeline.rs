pub mod decomposition;
pub mod fusion;
pub mod multi_query;

pub use decomposition::{DecompositionPipeline, QaPair, format_qa_pairs};
pub use fusion::FusionPipeline;
pub use multi_query::{MultiQueryPipeline, unique_union};

use std::sync::Arc;

use serde::Serialize;
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{Document, Error, Result, Retriever};

/// What a pipeline hands back: the final text plus the queries or sub-questions it used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
	pub text: String,
	pub queries: Vec<String>,
}

/// Runs one retrieval per query with at most `concurrency` in flight.
///
/// The returned lists line up with `queries` by index regardless of completion order. The
/// first failure aborts the remaining calls.
pub(crate) async fn retrieve_all(
	retriever: &Arc<dyn Retriever>,
	queries: &[String],
	concurrency: usize,
) -> Result<Vec<Vec<Document>>> {
	let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
	let mut tasks = JoinSet::new();

	for (index, query) in queries.iter().cloned().enumerate() {
		let retriever = Arc::clone(retriever);
		let semaphore = Arc::clone(&semaphore);

		tasks.spawn(async move {
			let _permit = semaphore.acquire().await;
			let result = retriever.retrieve(&query).await;

			(index, query, result)
		});
	}

	let mut lists = vec![Vec::new(); queries.len()];

	while let Some(joined) = tasks.join_next().await {
		let (index, query, result) = joined.map_err(|err| Error::Retrieval {
			message: format!("Retrieval task did not complete: {err}"),
		})?;
		let docs = result
			.map_err(|err| Error::retrieval(&format!("Retriever failed for query {query:?}"), &err))?;

		tracing::debug!(index, query = query.as_str(), document_count = docs.len(), "Retrieved.");

		lists[index] = docs;
	}

	Ok(lists)
}
