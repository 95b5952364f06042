use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::Error;

pub const INVALID_STRATEGY_MESSAGE: &str = "Invalid method name provided. Please choose from 'multi_query', 'fusion', or 'decomposition'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	MultiQuery,
	Fusion,
	Decomposition,
}
impl Strategy {
	pub const ALL: [Self; 3] = [Self::MultiQuery, Self::Fusion, Self::Decomposition];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::MultiQuery => "multi_query",
			Self::Fusion => "fusion",
			Self::Decomposition => "decomposition",
		}
	}

	/// Prefix the CLI prints before the answer text.
	pub fn answer_label(self) -> &'static str {
		match self {
			Self::Decomposition => "Final Answer:",
			Self::MultiQuery | Self::Fusion => "Answer:",
		}
	}
}
impl FromStr for Strategy {
	type Err = Error;

	/// Case-insensitive exact match; surrounding whitespace is not stripped.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lowered = s.to_lowercase();

		Self::ALL
			.into_iter()
			.find(|strategy| strategy.as_str() == lowered)
			.ok_or_else(|| Error::invalid_input(INVALID_STRATEGY_MESSAGE))
	}
}
impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_match_case_insensitively() {
		assert_eq!("fusion".parse::<Strategy>().expect("parse failed"), Strategy::Fusion);
		assert_eq!("FUSION".parse::<Strategy>().expect("parse failed"), Strategy::Fusion);
		assert_eq!("Multi_Query".parse::<Strategy>().expect("parse failed"), Strategy::MultiQuery);
		assert_eq!(
			"Decomposition".parse::<Strategy>().expect("parse failed"),
			Strategy::Decomposition
		);
	}

	#[test]
	fn near_misses_are_rejected() {
		for name in ["", "fusion ", "multi-query", "decompose", "rag_fusion"] {
			let err = name.parse::<Strategy>().expect_err("Expected invalid strategy.");

			assert!(err.to_string().contains(INVALID_STRATEGY_MESSAGE), "Unexpected error: {err}");
		}
	}

	#[test]
	fn display_round_trips_through_from_str() {
		for strategy in Strategy::ALL {
			assert_eq!(strategy.to_string().parse::<Strategy>().expect("parse failed"), strategy);
		}
	}
}
