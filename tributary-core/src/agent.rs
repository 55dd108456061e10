use async_trait::async_trait;

use crate::errors::Result;
use crate::topic_partition::TopicPartitionSet;

/// The capability set the agent manager drives.
///
/// Async methods may suspend and are awaited one agent at a time by the manager.
/// `cancel` and `service_reset` are synchronous: they only flip state that the
/// agent's own run loop is expected to observe (see [`crate::AgentLifecycle`]).
#[async_trait]
pub trait Agent: Send + Sync + 'static {
    /// Start consuming. Completes once the agent is running.
    async fn start(&self) -> Result<()>;

    /// Stop consuming and release resources. Completes once the agent is down.
    async fn stop(&self) -> Result<()>;

    /// Stop followed by start, unless the agent knows a cheaper way.
    async fn restart(&self) -> Result<()> {
        self.stop().await?;
        self.service_reset();
        self.start().await
    }

    /// Mark the agent cancelled without waiting for it to wind down.
    /// Calling it more than once must be harmless.
    fn cancel(&self);

    /// Clear bookkeeping state without stopping work.
    fn service_reset(&self);

    /// Partitions of one subscribed topic were taken away from this process.
    async fn on_partitions_revoked(&self, revoked: &TopicPartitionSet) -> Result<()>;

    /// Partitions of one subscribed topic were handed to this process.
    async fn on_partitions_assigned(&self, assigned: &TopicPartitionSet) -> Result<()>;

    /// Names of the topics this agent consumes. Read by the manager at registration.
    fn topic_names(&self) -> Vec<String>;
}
