//! Turning raw model output into a query list.
//!
//! Orchestration code only calls [`parse_queries`]; the split rules live here so they can be
//! tightened without touching the pipelines.

use std::{collections::HashSet, str::FromStr};

use regex::Regex;

use crate::Error;

const LIST_MARKER_PATTERN: &str = r"^(?:\d+[.)]|[-*•])\s+";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryParse {
	/// Split on `\n` and keep every piece, including empty ones.
	#[default]
	Literal,
	/// Trim, drop empty lines and list markers, and drop case-insensitive repeats.
	Strict,
}
impl QueryParse {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Literal => "literal",
			Self::Strict => "strict",
		}
	}
}
impl FromStr for QueryParse {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"literal" => Ok(Self::Literal),
			"strict" => Ok(Self::Strict),
			_ => Err(Error::invalid_input(format!("Unknown query parse mode {s:?}."))),
		}
	}
}

pub fn parse_queries(raw: &str, mode: QueryParse) -> Vec<String> {
	match mode {
		QueryParse::Literal => split_lines(raw),
		QueryParse::Strict => strict_lines(raw),
	}
}

fn split_lines(raw: &str) -> Vec<String> {
	raw.split('\n').map(str::to_string).collect()
}

fn strict_lines(raw: &str) -> Vec<String> {
	let marker = Regex::new(LIST_MARKER_PATTERN).ok();
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for line in raw.lines() {
		let trimmed = line.trim();
		let stripped = match marker.as_ref() {
			Some(re) => re.replace(trimmed, "").trim().to_string(),
			None => trimmed.to_string(),
		};

		if stripped.is_empty() {
			continue;
		}
		if seen.insert(stripped.to_lowercase()) {
			out.push(stripped);
		}
	}

	out
}
