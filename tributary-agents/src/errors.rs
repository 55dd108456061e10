use std::fmt::{self, Display, Formatter};
use thiserror::Error;
use tributary_core::AgentError;

pub type Result<T> = std::result::Result<T, ManagerError>;

/// The per-agent call a lifecycle pass or rebalance was making when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentOperation {
    Start,
    Stop,
    Restart,
    PartitionsRevoked,
    PartitionsAssigned,
}

impl Display for AgentOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AgentOperation::Start => write!(f, "start"),
            AgentOperation::Stop => write!(f, "stop"),
            AgentOperation::Restart => write!(f, "restart"),
            AgentOperation::PartitionsRevoked => write!(f, "handle revoked partitions"),
            AgentOperation::PartitionsAssigned => write!(f, "handle assigned partitions"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Agent already registered: {0}")]
    DuplicateAgent(String),

    #[error("Agent not registered: {0}")]
    UnknownAgent(String),

    /// A per-agent call failed; agents after it in the same pass were not called.
    #[error("Agent '{agent}' failed to {operation}: {source}")]
    Agent {
        agent: String,
        operation: AgentOperation,
        #[source]
        source: AgentError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ManagerError {
    /// Name of the agent whose call failed, for `Agent` errors.
    pub fn failed_agent(&self) -> Option<&str> {
        match self {
            ManagerError::Agent { agent, .. } => Some(agent),
            _ => None,
        }
    }
}
