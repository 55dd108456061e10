//! Agent registry, lifecycle control and rebalance dispatch.
//!
//! [`AgentManager`] owns the agents of one application in registration order and
//! keeps a derived topic index next to them. Lifecycle passes walk the agents in
//! that order one at a time; rebalance notifications are split per topic and
//! delivered only to the agents subscribed to it.

mod config;
pub use config::{DuplicatePolicy, ManagerConfig};

mod errors;
pub use errors::{AgentOperation, ManagerError, Result};

mod manager;
pub use manager::AgentManager;

mod rebalance;
pub use rebalance::group_by_topic;

mod registry;
mod topic_index;

pub use tributary_core::{
    Agent, AgentError, AgentLifecycle, AgentState, TopicPartition, TopicPartitionSet,
};
