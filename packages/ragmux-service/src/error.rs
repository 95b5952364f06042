pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Generation failed: {message}")]
	Generation { message: String },
	#[error("Retrieval failed: {message}")]
	Retrieval { message: String },
	#[error("No documents retrieved for the given question.")]
	EmptyRetrieval,
	#[error("Decomposition failed: {source}")]
	Decomposition {
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	pub fn invalid_input(message: impl Into<String>) -> Self {
		Self::InvalidInput { message: message.into() }
	}

	/// Wraps a collaborator failure, keeping the full cause chain in the message.
	pub(crate) fn generation(context: &str, err: &color_eyre::Report) -> Self {
		Self::Generation { message: format!("{context}: {err:#}") }
	}

	pub(crate) fn retrieval(context: &str, err: &color_eyre::Report) -> Self {
		Self::Retrieval { message: format!("{context}: {err:#}") }
	}

	pub(crate) fn decomposition(err: Self) -> Self {
		Self::Decomposition { source: Box::new(err) }
	}
}
