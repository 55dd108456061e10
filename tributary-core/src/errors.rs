use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

/// Failures an agent reports back to the manager.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Start failed: {0}")]
    StartFailed(String),

    #[error("Stop failed: {0}")]
    StopFailed(String),

    #[error("Restart failed: {0}")]
    RestartFailed(String),

    #[error("Rebalance handling failed: {0}")]
    RebalanceFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Agent error: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
