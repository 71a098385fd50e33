//! Retrosynthesis task handlers and the client that reaches them over the fabric.

pub mod bootstrap;
pub mod client;
pub mod handlers;
pub mod payload;

mod error;

pub use bootstrap::WorkerRuntime;
pub use client::RetroClient;
pub use error::{Error, INVALID_REQUEST, Result, SCORING_UNAVAILABLE};
pub use handlers::{ContextRecommenderHandler, RetroTransformerHandler};
pub use payload::{ConditionsRequest, PrecursorsRequest, Request};
