//! Reciprocal rank fusion over ranked document lists.
//!
//! A document at 0-based position `rank` in a list contributes `1 / (rank + k)`; contributions
//! are summed across every list that contains it. Lists are treated as an unordered
//! collection for scoring, but their order fixes the tie-break: equal scores keep the order in
//! which documents were first seen.

use std::collections::HashMap;

use serde::Serialize;

use crate::{Document, Error, Result};

pub const DEFAULT_RRF_K: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedEntry {
	pub document: Document,
	pub score: f64,
}

/// Fused ranking, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FusedResult {
	pub entries: Vec<FusedEntry>,
}
impl FusedResult {
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn documents(&self) -> impl Iterator<Item = &Document> {
		self.entries.iter().map(|entry| &entry.document)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankFuser {
	k: u32,
}
impl RankFuser {
	pub fn new(k: u32) -> Result<Self> {
		if k == 0 {
			return Err(Error::invalid_input("RRF k must be greater than zero."));
		}

		Ok(Self { k })
	}

	pub fn k(&self) -> u32 {
		self.k
	}

	pub fn fuse(&self, lists: &[Vec<Document>]) -> Result<FusedResult> {
		if lists.is_empty() {
			return Err(Error::invalid_input("Results list cannot be empty."));
		}

		let k = f64::from(self.k);
		let mut index_by_key: HashMap<String, usize> = HashMap::new();
		let mut scored: Vec<FusedEntry> = Vec::new();

		for docs in lists {
			for (rank, doc) in docs.iter().enumerate() {
				let slot = *index_by_key.entry(doc.canonical_key()).or_insert_with(|| {
					scored.push(FusedEntry { document: doc.clone(), score: 0.0 });

					scored.len() - 1
				});

				scored[slot].score += 1.0 / (rank as f64 + k);
			}
		}

		debug_assert!(
			!scored.is_empty() || lists.iter().all(Vec::is_empty),
			"invariant violation: non-empty input lists fused to nothing"
		);

		// `sort_by` is stable, so equal scores keep first-seen order.
		scored.sort_by(|a, b| b.score.total_cmp(&a.score));

		Ok(FusedResult { entries: scored })
	}
}
impl Default for RankFuser {
	fn default() -> Self {
		Self { k: DEFAULT_RRF_K }
	}
}
