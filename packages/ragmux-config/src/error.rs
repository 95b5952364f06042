use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read ragmux config {}: {source}", path.display())]
	ReadConfig { path: PathBuf, source: std::io::Error },
	#[error("Failed to parse ragmux config {}: {source}", path.display())]
	ParseConfig { path: PathBuf, source: toml::de::Error },
	#[error("Invalid ragmux config: {message}")]
	Validation { message: String },
}
