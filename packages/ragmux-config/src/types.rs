use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub strategies: Strategies,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
	pub retriever: RetrieverProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	/// Fixed for the lifetime of the provider. Zero keeps generations deterministic.
	#[serde(default)]
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrieverProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Optional. An empty key sends no Authorization header.
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	#[serde(default = "default_retriever_top_k")]
	pub top_k: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Strategies {
	#[serde(default = "default_strategy")]
	pub default: String,
	/// Either "literal" (split model output on newlines as-is) or "strict".
	#[serde(default = "default_query_parse")]
	pub query_parse: String,
	#[serde(default)]
	pub multi_query: MultiQuery,
	#[serde(default)]
	pub fusion: Fusion,
	#[serde(default)]
	pub decomposition: Decomposition,
}
impl Default for Strategies {
	fn default() -> Self {
		Self {
			default: default_strategy(),
			query_parse: default_query_parse(),
			multi_query: MultiQuery::default(),
			fusion: Fusion::default(),
			decomposition: Decomposition::default(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultiQuery {
	pub query_count: u32,
	#[serde(default = "default_retrieval_concurrency")]
	pub retrieval_concurrency: u32,
}
impl Default for MultiQuery {
	fn default() -> Self {
		Self { query_count: 5, retrieval_concurrency: default_retrieval_concurrency() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fusion {
	pub query_count: u32,
	#[serde(default = "default_rrf_k")]
	pub rrf_k: u32,
	#[serde(default = "default_retrieval_concurrency")]
	pub retrieval_concurrency: u32,
	/// Zero passes every fused document to the answer prompt.
	#[serde(default)]
	pub max_context_documents: u32,
}
impl Default for Fusion {
	fn default() -> Self {
		Self {
			query_count: 4,
			rrf_k: default_rrf_k(),
			retrieval_concurrency: default_retrieval_concurrency(),
			max_context_documents: 0,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Decomposition {
	pub sub_question_count: u32,
	/// When true, each sub-question prompt sees the question + answer pairs gathered so far.
	#[serde(default)]
	pub carry_forward_answers: bool,
}
impl Default for Decomposition {
	fn default() -> Self {
		Self { sub_question_count: 3, carry_forward_answers: false }
	}
}

fn default_retriever_top_k() -> u32 {
	4
}

fn default_strategy() -> String {
	"multi_query".to_string()
}

fn default_query_parse() -> String {
	"literal".to_string()
}

fn default_rrf_k() -> u32 {
	60
}

fn default_retrieval_concurrency() -> u32 {
	4
}
