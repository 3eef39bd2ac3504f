use crate::net::NetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("invalid {what}: {token:?}")]
    InvalidToken { what: &'static str, token: String },

    #[error("invalid scenario json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Net(#[from] NetError),
}
