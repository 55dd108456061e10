use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tributary_core::{Agent, TopicPartitionSet};

use crate::{
    config::{DuplicatePolicy, ManagerConfig},
    errors::{AgentOperation, ManagerError, Result},
    rebalance::{fan_out, RebalanceKind},
    registry::AgentRegistry,
    topic_index::TopicIndex,
};

/// Suspending lifecycle calls the manager applies to every agent in turn.
#[derive(Debug, Clone, Copy)]
enum LifecyclePass {
    Start,
    Stop,
    Restart,
}

impl LifecyclePass {
    fn operation(self) -> AgentOperation {
        match self {
            LifecyclePass::Start => AgentOperation::Start,
            LifecyclePass::Stop => AgentOperation::Stop,
            LifecyclePass::Restart => AgentOperation::Restart,
        }
    }
}

/// Tracks the agents of one application, drives their lifecycle in registration
/// order and routes consumer-group rebalances to the agents of each topic.
///
/// Structural changes take `&mut self`; share the manager behind a lock (for
/// example `tokio::sync::RwLock`) if several tasks need to mutate it. The async
/// passes and rebalance handlers take `&self` and are serialized internally, so
/// two of them issued concurrently never interleave.
#[derive(Debug)]
pub struct AgentManager {
    config: ManagerConfig,
    registry: AgentRegistry,
    index: TopicIndex,
    // held for the whole duration of every lifecycle pass and rebalance
    op_lock: Mutex<()>,
}

impl AgentManager {
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        Self {
            config,
            registry: AgentRegistry::new(),
            index: TopicIndex::new(),
            op_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Registers `agent` under `name` and indexes it under each of its topics.
    ///
    /// On a name collision the configured [`DuplicatePolicy`] decides: `Reject`
    /// returns [`ManagerError::DuplicateAgent`] and changes nothing, `Replace`
    /// behaves like [`AgentManager::replace`].
    pub fn register(&mut self, name: impl Into<String>, agent: Arc<dyn Agent>) -> Result<()> {
        let name = name.into();

        if self.registry.contains(&name) {
            match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    warn!(agent = %name, "rejecting duplicate agent registration");
                    return Err(ManagerError::DuplicateAgent(name));
                }
                DuplicatePolicy::Replace => {
                    self.replace(name, agent);
                    return Ok(());
                }
            }
        }

        let topics = agent.topic_names();
        self.index.index_agent(&name, &topics);
        self.registry.insert(name.clone(), agent);
        info!(agent = %name, topics = ?topics, "agent registered");
        Ok(())
    }

    /// Binds `name` to `agent` whether or not it was taken, returning the previous
    /// agent. The previous agent's index entries are purged first and the name
    /// keeps its original position in the registration order.
    pub fn replace(
        &mut self,
        name: impl Into<String>,
        agent: Arc<dyn Agent>,
    ) -> Option<Arc<dyn Agent>> {
        let name = name.into();
        self.index.remove_agent(&name);

        let topics = agent.topic_names();
        self.index.index_agent(&name, &topics);
        let previous = self.registry.insert(name.clone(), agent);

        if previous.is_some() {
            info!(agent = %name, topics = ?topics, "agent replaced");
        } else {
            info!(agent = %name, topics = ?topics, "agent registered");
        }
        previous
    }

    /// Unregisters `name` and prunes it from the topic index.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Agent>> {
        let removed = self.registry.remove(name)?;
        self.index.remove_agent(name);
        info!(agent = %name, "agent removed");
        Some(removed)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.registry.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.registry.names().map(str::to_string).collect()
    }

    /// `(name, agent)` pairs, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Agent>)> {
        self.registry.iter()
    }

    /// Topics with at least one subscribed agent, in no particular order.
    pub fn topics(&self) -> Vec<String> {
        self.index.topics()
    }

    /// Names of the agents indexed under `topic`, in registration order.
    pub fn agents_for_topic(&self, topic: &str) -> Vec<String> {
        self.registry
            .names()
            .filter(|name| self.index.contains(topic, name))
            .map(str::to_string)
            .collect()
    }

    /// Re-reads the topic list of one agent and re-indexes it.
    pub fn refresh_topics(&mut self, name: &str) -> Result<()> {
        let agent = self
            .registry
            .get(name)
            .ok_or_else(|| ManagerError::UnknownAgent(name.to_string()))?;

        let topics = agent.topic_names();
        self.index.remove_agent(name);
        self.index.index_agent(name, &topics);
        debug!(agent = %name, topics = ?topics, "agent topics refreshed");
        Ok(())
    }

    /// Throws the topic index away and rebuilds it from the registered agents.
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for (name, agent) in self.registry.iter() {
            self.index.index_agent(name, agent.topic_names());
        }
        debug!(agents = self.registry.len(), "topic index rebuilt");
    }

    /// Starts every agent in registration order, one at a time.
    /// The first failure aborts the pass; agents already started stay started.
    pub async fn start_all(&self) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        self.sequential_pass(LifecyclePass::Start).await
    }

    /// Restarts every agent in registration order, one at a time.
    pub async fn restart_all(&self) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        self.sequential_pass(LifecyclePass::Restart).await
    }

    /// Cancels every agent, then stops them one at a time, both in registration order.
    ///
    /// The cancel pass completes before the first `stop` so that no agent's run
    /// loop is still going while another agent tears down.
    pub async fn stop_all(&self) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        self.cancel_pass();
        self.sequential_pass(LifecyclePass::Stop).await
    }

    /// Marks every agent cancelled, in registration order, without waiting.
    ///
    /// Does not wait for an in-flight pass, so it can cut short a start or
    /// rebalance that is stuck on an agent observing cancellation.
    pub fn cancel_all(&self) {
        self.cancel_pass();
    }

    /// Clears every agent's bookkeeping state, in registration order.
    pub fn reset_all(&self) {
        for (name, agent) in self.registry.iter() {
            debug!(agent = %name, "service reset");
            agent.service_reset();
        }
    }

    /// Routes revoked partitions to the subscribers of each affected topic.
    pub async fn on_partitions_revoked(&self, revoked: &TopicPartitionSet) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        info!(partitions = revoked.len(), "partitions revoked");
        fan_out(&self.registry, &self.index, RebalanceKind::Revoked, revoked).await
    }

    /// Routes newly assigned partitions to the subscribers of each affected topic.
    pub async fn on_partitions_assigned(&self, assigned: &TopicPartitionSet) -> Result<()> {
        let _guard = self.op_lock.lock().await;
        info!(partitions = assigned.len(), "partitions assigned");
        fan_out(&self.registry, &self.index, RebalanceKind::Assigned, assigned).await
    }

    fn cancel_pass(&self) {
        for (name, agent) in self.registry.iter() {
            debug!(agent = %name, "cancel");
            agent.cancel();
        }
    }

    async fn sequential_pass(&self, pass: LifecyclePass) -> Result<()> {
        let operation = pass.operation();
        info!(operation = %operation, agents = self.registry.len(), "lifecycle pass started");

        for (name, agent) in self.registry.iter() {
            debug!(agent = %name, operation = %operation, "calling agent");
            let result = match pass {
                LifecyclePass::Start => agent.start().await,
                LifecyclePass::Stop => agent.stop().await,
                LifecyclePass::Restart => agent.restart().await,
            };

            if let Err(source) = result {
                warn!(
                    agent = %name,
                    operation = %operation,
                    error = %source,
                    "agent failed, remaining agents skipped"
                );
                return Err(ManagerError::Agent {
                    agent: name.to_string(),
                    operation,
                    source,
                });
            }
        }

        info!(operation = %operation, "lifecycle pass finished");
        Ok(())
    }
}

impl Default for AgentManager {
    fn default() -> Self {
        Self::new()
    }
}
