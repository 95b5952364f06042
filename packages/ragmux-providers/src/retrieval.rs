use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};

use crate::{Endpoint, Error, Result};
use ragmux_config::RetrieverProviderConfig;

/// One item of a ranked retrieval response. Array order is rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedDocument {
	pub content: String,
	pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct RetrievalClient {
	client: Client,
	cfg: RetrieverProviderConfig,
}
impl RetrievalClient {
	pub fn new(cfg: RetrieverProviderConfig) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { client, cfg })
	}

	pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>> {
		let url = crate::endpoint(&self.cfg.api_base, &self.cfg.path);
		let body = serde_json::json!({ "query": query, "top_k": self.cfg.top_k });
		let res = self
			.client
			.post(&url)
			.headers(crate::auth_headers(&self.cfg.api_key, &self.cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;
		let docs = parse_retrieval_response(json)?;

		tracing::debug!(
			provider_id = self.cfg.provider_id.as_str(),
			document_count = docs.len(),
			"Retrieval response received."
		);

		Ok(docs)
	}
}

fn parse_retrieval_response(json: Value) -> Result<Vec<RetrievedDocument>> {
	let items = json
		.get("documents")
		.or_else(|| json.get("results"))
		.or_else(|| json.get("data"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| {
			Error::invalid_response(
				Endpoint::Retrieval,
				"missing documents, results, or data array.",
			)
		})?;
	let mut docs = Vec::with_capacity(items.len());

	for item in items {
		let content = item
			.get("content")
			.or_else(|| item.get("page_content"))
			.and_then(|v| v.as_str())
			.ok_or_else(|| {
				Error::invalid_response(Endpoint::Retrieval, "item is missing string content.")
			})?;
		let metadata = match item.get("metadata") {
			None | Some(Value::Null) => Map::new(),
			Some(Value::Object(map)) => map.clone(),
			Some(_) => {
				return Err(Error::invalid_response(
					Endpoint::Retrieval,
					"item metadata must be an object.",
				));
			},
		};

		docs.push(RetrievedDocument { content: content.to_string(), metadata });
	}

	Ok(docs)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_response_order_as_rank() {
		let json = serde_json::json!({
			"documents": [
				{ "content": "alpha", "metadata": { "source": "a.html" } },
				{ "page_content": "beta" }
			]
		});
		let docs = parse_retrieval_response(json).expect("parse failed");

		assert_eq!(docs.len(), 2);
		assert_eq!(docs[0].content, "alpha");
		assert_eq!(docs[0].metadata.get("source"), Some(&serde_json::json!("a.html")));
		assert_eq!(docs[1].content, "beta");
		assert!(docs[1].metadata.is_empty());
	}

	#[test]
	fn accepts_results_and_data_aliases() {
		for key in ["results", "data"] {
			let json = serde_json::json!({ key: [{ "content": "gamma" }] });
			let docs = parse_retrieval_response(json).expect("parse failed");

			assert_eq!(docs[0].content, "gamma");
		}
	}

	#[test]
	fn empty_array_is_an_empty_ranked_list() {
		let docs = parse_retrieval_response(serde_json::json!({ "documents": [] }))
			.expect("parse failed");

		assert!(docs.is_empty());
	}

	#[test]
	fn rejects_non_object_metadata() {
		let json = serde_json::json!({ "documents": [{ "content": "x", "metadata": [1, 2] }] });
		let err = parse_retrieval_response(json).expect_err("Expected metadata error.");

		assert!(err.to_string().contains("metadata must be an object"));
	}

	#[test]
	fn missing_array_names_the_retrieval_endpoint() {
		let err = parse_retrieval_response(serde_json::json!({ "hits": [] }))
			.expect_err("Expected missing array error.");

		assert!(
			matches!(err, Error::InvalidResponse { endpoint: Endpoint::Retrieval, .. }),
			"Unexpected error: {err:?}"
		);
		assert!(err.to_string().starts_with("Unexpected retrieval response:"), "{err}");
	}
}
