use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Endpoint, Error, Result};
use ragmux_config::LlmProviderConfig;

/// A chat-completions client bound to one provider config.
///
/// The temperature is read from the config once and never changes for this client.
#[derive(Debug, Clone)]
pub struct ChatClient {
	client: Client,
	cfg: LlmProviderConfig,
}
impl ChatClient {
	pub fn new(cfg: LlmProviderConfig) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { client, cfg })
	}

	pub async fn complete(&self, prompt: &str) -> Result<String> {
		let url = crate::endpoint(&self.cfg.api_base, &self.cfg.path);
		let body = serde_json::json!({
			"model": self.cfg.model,
			"temperature": self.cfg.temperature,
			"messages": [{ "role": "user", "content": prompt }],
		});
		let res = self
			.client
			.post(&url)
			.headers(crate::auth_headers(&self.cfg.api_key, &self.cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		tracing::debug!(
			provider_id = self.cfg.provider_id.as_str(),
			model = self.cfg.model.as_str(),
			prompt_chars = prompt.len(),
			"Chat completion received."
		);

		parse_chat_response(json)
	}
}

fn parse_chat_response(json: Value) -> Result<String> {
	let choice = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.ok_or_else(|| Error::invalid_response(Endpoint::Chat, "missing choices array."))?;
	let content = choice
		.get("message")
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| {
			Error::invalid_response(Endpoint::Chat, "first choice is missing message content.")
		})?;

	Ok(content.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_first_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "first" } },
				{ "message": { "role": "assistant", "content": "second" } }
			]
		});
		let content = parse_chat_response(json).expect("parse failed");

		assert_eq!(content, "first");
	}

	#[test]
	fn keeps_content_verbatim() {
		let json = serde_json::json!({
			"choices": [{ "message": { "content": "q1\n\nq2\n" } }]
		});

		assert_eq!(parse_chat_response(json).expect("parse failed"), "q1\n\nq2\n");
	}

	#[test]
	fn rejects_missing_choices() {
		let err = parse_chat_response(serde_json::json!({ "error": "boom" }))
			.expect_err("Expected missing choices error.");

		assert!(
			matches!(err, Error::InvalidResponse { endpoint: Endpoint::Chat, .. }),
			"Unexpected error: {err:?}"
		);
		assert_eq!(err.to_string(), "Unexpected chat response: missing choices array.");
	}

	#[test]
	fn rejects_non_string_content() {
		let json = serde_json::json!({ "choices": [{ "message": { "content": null } }] });
		let err = parse_chat_response(json).expect_err("Expected missing content error.");

		assert!(err.to_string().contains("missing message content"));
	}
}
