// Error kinds surfaced by the workflow controller and its remote collaborators

use reqwest::StatusCode;
use thiserror::Error;

use super::types::CallTarget;

/// A precondition failed before any network call was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no image selected")]
    NoImageSelected,
    #[error("no emotion available")]
    NoEmotionAvailable,
}

/// A remote call was attempted and did not produce a usable result
#[derive(Debug, Error)]
pub enum RemoteCallError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unsuccessful status {0}")]
    Status(StatusCode),
    #[error("response is missing a usable `{field}` field")]
    MalformedResponse { field: &'static str },
    #[error("failed to decode response body: {0}")]
    Decode(String),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a {0} call is already in flight")]
    Busy(CallTarget),
    #[error(transparent)]
    Remote(#[from] RemoteCallError),
}
