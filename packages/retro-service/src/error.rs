use retro_fabric::{
	TaskFailure,
	task::{INTERNAL, RESOURCE_UNAVAILABLE},
};

pub const SCORING_UNAVAILABLE: &str = "SCORING_UNAVAILABLE";
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Resource unavailable on queue {queue}: {reason}")]
	ResourceUnavailable { queue: String, reason: String },
	#[error("Scoring unavailable: {message}")]
	ScoringUnavailable { message: String },
	#[error("Failed to load {resource}: {message}")]
	LoadFailure { resource: String, message: String },
	#[error("Transport failure: {message}")]
	TransportFailure { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Task failed with {kind}: {message}")]
	TaskFailed { kind: String, message: String },
}
impl Error {
	/// Rebuilds a typed error from a failure serialized by a worker on `queue`.
	pub fn from_failure(queue: &str, failure: TaskFailure) -> Self {
		match failure.kind.as_str() {
			RESOURCE_UNAVAILABLE => {
				Self::ResourceUnavailable { queue: queue.to_string(), reason: failure.message }
			},
			SCORING_UNAVAILABLE => Self::ScoringUnavailable { message: failure.message },
			INVALID_REQUEST => Self::InvalidRequest { message: failure.message },
			_ => Self::TaskFailed { kind: failure.kind, message: failure.message },
		}
	}

	pub fn kind(&self) -> &str {
		match self {
			Self::ResourceUnavailable { .. } => RESOURCE_UNAVAILABLE,
			Self::ScoringUnavailable { .. } => SCORING_UNAVAILABLE,
			Self::LoadFailure { .. } => "LOAD_FAILURE",
			Self::TransportFailure { .. } => "TRANSPORT_FAILURE",
			Self::InvalidRequest { .. } => INVALID_REQUEST,
			Self::TaskFailed { kind, .. } => kind,
		}
	}
}

impl From<retro_domain::Error> for Error {
	fn from(err: retro_domain::Error) -> Self {
		match err {
			retro_domain::Error::ScoringUnavailable { message } => {
				Self::ScoringUnavailable { message }
			},
		}
	}
}

impl From<retro_fabric::Error> for Error {
	fn from(err: retro_fabric::Error) -> Self {
		match err {
			retro_fabric::Error::TransportFailure { message } => Self::TransportFailure { message },
			retro_fabric::Error::ResourceUnavailable { queue, reason } => {
				Self::ResourceUnavailable { queue, reason }
			},
			retro_fabric::Error::Task(failure) => {
				Self::TaskFailed { kind: failure.kind, message: failure.message }
			},
		}
	}
}

impl From<Error> for TaskFailure {
	fn from(err: Error) -> Self {
		match err {
			Error::ResourceUnavailable { reason, .. } => Self::new(RESOURCE_UNAVAILABLE, reason),
			Error::ScoringUnavailable { message } => Self::new(SCORING_UNAVAILABLE, message),
			Error::InvalidRequest { message } => Self::new(INVALID_REQUEST, message),
			Error::TaskFailed { kind, message } => Self::new(kind, message),
			other @ (Error::LoadFailure { .. } | Error::TransportFailure { .. }) => {
				Self::new(INTERNAL, other.to_string())
			},
		}
	}
}
