use crate::task::TaskFailure;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Transport failure: {message}")]
	TransportFailure { message: String },
	#[error("Resource unavailable on queue {queue}: {reason}")]
	ResourceUnavailable { queue: String, reason: String },
	#[error("Task failed with {}: {}", .0.kind, .0.message)]
	Task(TaskFailure),
}
