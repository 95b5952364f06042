mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Decomposition, Fusion, LlmProviderConfig, MultiQuery, Providers,
	RetrieverProviderConfig, Service, Strategies,
};

use std::{fs, path::Path};

pub const STRATEGY_NAMES: [&str; 3] = ["multi_query", "fusion", "decomposition"];
pub const QUERY_PARSE_MODES: [&str; 2] = ["literal", "strict"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	let llm = &cfg.providers.llm;

	for (label, value) in [
		("providers.llm.provider_id", &llm.provider_id),
		("providers.llm.api_base", &llm.api_base),
		("providers.llm.api_key", &llm.api_key),
		("providers.llm.path", &llm.path),
		("providers.llm.model", &llm.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if !llm.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&llm.temperature) {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if llm.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}

	let retriever = &cfg.providers.retriever;

	for (label, value) in [
		("providers.retriever.provider_id", &retriever.provider_id),
		("providers.retriever.api_base", &retriever.api_base),
		("providers.retriever.path", &retriever.path),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if retriever.top_k == 0 {
		return Err(Error::Validation {
			message: "providers.retriever.top_k must be greater than zero.".to_string(),
		});
	}
	if retriever.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.retriever.timeout_ms must be greater than zero.".to_string(),
		});
	}

	let strategies = &cfg.strategies;

	if !STRATEGY_NAMES.contains(&strategies.default.as_str()) {
		return Err(Error::Validation {
			message:
				"strategies.default must be one of multi_query, fusion, or decomposition."
					.to_string(),
		});
	}
	if !QUERY_PARSE_MODES.contains(&strategies.query_parse.as_str()) {
		return Err(Error::Validation {
			message: "strategies.query_parse must be one of literal or strict.".to_string(),
		});
	}

	for (label, value) in [
		("strategies.multi_query.query_count", strategies.multi_query.query_count),
		(
			"strategies.multi_query.retrieval_concurrency",
			strategies.multi_query.retrieval_concurrency,
		),
		("strategies.fusion.query_count", strategies.fusion.query_count),
		("strategies.fusion.rrf_k", strategies.fusion.rrf_k),
		("strategies.fusion.retrieval_concurrency", strategies.fusion.retrieval_concurrency),
		(
			"strategies.decomposition.sub_question_count",
			strategies.decomposition.sub_question_count,
		),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.strategies.default = cfg.strategies.default.trim().to_lowercase();
	cfg.strategies.query_parse = cfg.strategies.query_parse.trim().to_lowercase();

	if cfg.providers.retriever.api_key.trim().is_empty() {
		cfg.providers.retriever.api_key = String::new();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalize_lowercases_strategy_names() {
		let mut cfg: Config = toml::from_str(
			r#"
[service]
log_level = "info"

[providers.llm]
provider_id = "openai"
api_base = "https://api.openai.com"
api_key = "secret"
path = "/v1/chat/completions"
model = "gpt-3.5-turbo"
timeout_ms = 1000

[providers.retriever]
provider_id = "local"
api_base = "http://127.0.0.1:8000"
api_key = "   "
path = "/retrieve"
timeout_ms = 1000

[strategies]
default = "  Fusion "
query_parse = "STRICT"
"#,
		)
		.expect("Failed to parse config.");

		normalize(&mut cfg);

		assert_eq!(cfg.strategies.default, "fusion");
		assert_eq!(cfg.strategies.query_parse, "strict");
		assert!(cfg.providers.retriever.api_key.is_empty());
		assert!(validate(&cfg).is_ok());
	}
}
