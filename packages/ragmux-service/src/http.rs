//! Collaborators backed by the HTTP clients in `ragmux-providers`.

use ragmux_providers::{chat::ChatClient, retrieval::RetrievalClient};

use crate::{BoxFuture, Document, LanguageModel, Retriever};

pub struct HttpRetriever {
	client: RetrievalClient,
}
impl HttpRetriever {
	pub fn new(cfg: &ragmux_config::RetrieverProviderConfig) -> ragmux_providers::Result<Self> {
		Ok(Self { client: RetrievalClient::new(cfg.clone())? })
	}
}
impl Retriever for HttpRetriever {
	fn retrieve<'a>(&'a self, query: &'a str) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>> {
		Box::pin(async move {
			let docs = self.client.retrieve(query).await?;

			Ok(docs.into_iter().map(Document::from).collect())
		})
	}
}

pub struct HttpLanguageModel {
	client: ChatClient,
}
impl HttpLanguageModel {
	pub fn new(cfg: &ragmux_config::LlmProviderConfig) -> ragmux_providers::Result<Self> {
		Ok(Self { client: ChatClient::new(cfg.clone())? })
	}
}
impl LanguageModel for HttpLanguageModel {
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Ok(self.client.complete(prompt).await?) })
	}
}
