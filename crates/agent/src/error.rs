use delve_core::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidState(#[from] StateError),
    #[error("no legal action for this snapshot")]
    NoLegalAction,
}
