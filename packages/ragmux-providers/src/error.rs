use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which collaborator endpoint produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
	Chat,
	Retrieval,
}
impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Chat => "chat",
			Self::Retrieval => "retrieval",
		})
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Invalid provider headers: {message}")]
	InvalidHeaders { message: String },
	#[error("Unexpected {endpoint} response: {message}")]
	InvalidResponse { endpoint: Endpoint, message: String },
}
impl Error {
	pub(crate) fn invalid_response(endpoint: Endpoint, message: &str) -> Self {
		Self::InvalidResponse { endpoint, message: message.to_string() }
	}
}
