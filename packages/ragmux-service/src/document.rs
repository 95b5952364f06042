use serde::Serialize;
use serde_json::{Map, Value};

use ragmux_providers::RetrievedDocument;

const FINGERPRINT_HEX_LEN: usize = 16;

/// A unit of retrieved content.
///
/// Identity is the canonical key, never the allocation: two documents with equal content and
/// equal metadata are the same document no matter which query returned them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
	pub content: String,
	pub metadata: Map<String, Value>,
}
impl Document {
	pub fn new(content: impl Into<String>) -> Self {
		Self { content: content.into(), metadata: Map::new() }
	}

	pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
		self.metadata.insert(key.into(), value);

		self
	}

	/// Byte-stable encoding of every field, used only for equality and hashing.
	///
	/// Object keys are emitted in sorted order at every depth, so metadata insertion order
	/// does not change the key.
	pub fn canonical_key(&self) -> String {
		serde_json::json!({ "content": self.content, "metadata": self.metadata }).to_string()
	}

	/// Short blake3 digest of the canonical key, for log fields.
	pub fn fingerprint(&self) -> String {
		let hash = blake3::hash(self.canonical_key().as_bytes()).to_hex();

		hash.as_str()[..FINGERPRINT_HEX_LEN].to_string()
	}
}
impl From<RetrievedDocument> for Document {
	fn from(doc: RetrievedDocument) -> Self {
		Self { content: doc.content, metadata: doc.metadata }
	}
}

/// Joins document bodies with newlines, preserving the given order.
pub fn format_context<'a, I>(docs: I) -> String
where
	I: IntoIterator<Item = &'a Document>,
{
	docs.into_iter().map(|doc| doc.content.as_str()).collect::<Vec<_>>().join("\n")
}
