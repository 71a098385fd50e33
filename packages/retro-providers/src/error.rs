pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read {path:?}: {source}")]
	Read { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to decode {path:?}: {source}")]
	Decode { path: std::path::PathBuf, source: serde_json::Error },
	#[error("{message}")]
	InvalidModel { message: String },
	#[error("Unknown prioritizer {name}.")]
	UnknownPrioritizer { name: String },
}
