pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Scoring unavailable: {message}")]
	ScoringUnavailable { message: String },
}
