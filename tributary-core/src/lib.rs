//! Core types and traits shared between Tributary agents and the agent manager.
//!
//! - `topic_partition`: the `(topic, partition)` value type and the set type used by
//!   rebalance notifications.
//! - `agent`: the capability set every agent exposes to the manager.
//! - `lifecycle`: a cooperative cancellation cell agents embed in their run loop.

pub mod agent;
pub mod lifecycle;
pub mod topic_partition;

mod errors;
pub use errors::{AgentError, Result};

pub use agent::Agent;
pub use lifecycle::{AgentLifecycle, AgentState};
pub use topic_partition::{TopicPartition, TopicPartitionSet};
