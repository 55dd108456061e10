use std::collections::HashMap;
use tracing::{debug, trace, warn};
use tributary_core::TopicPartitionSet;

use crate::{
    errors::{AgentOperation, ManagerError, Result},
    registry::AgentRegistry,
    topic_index::TopicIndex,
};

/// Which side of a consumer-group rebalance is being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RebalanceKind {
    Revoked,
    Assigned,
}

impl RebalanceKind {
    fn operation(self) -> AgentOperation {
        match self {
            RebalanceKind::Revoked => AgentOperation::PartitionsRevoked,
            RebalanceKind::Assigned => AgentOperation::PartitionsAssigned,
        }
    }
}

/// Splits a flat rebalance set into topic -> partitions of that topic.
pub fn group_by_topic(tps: &TopicPartitionSet) -> HashMap<String, TopicPartitionSet> {
    let mut by_topic: HashMap<String, TopicPartitionSet> = HashMap::new();
    for tp in tps {
        by_topic
            .entry(tp.topic().to_string())
            .or_default()
            .insert(tp.clone());
    }
    by_topic
}

/// Delivers one rebalance event.
///
/// Every subscriber of a topic gets one call carrying only that topic's partitions;
/// an agent on several affected topics gets one call per topic. Calls are awaited
/// one at a time and the first failure stops the fan-out.
pub(crate) async fn fan_out(
    registry: &AgentRegistry,
    index: &TopicIndex,
    kind: RebalanceKind,
    tps: &TopicPartitionSet,
) -> Result<()> {
    let operation = kind.operation();

    for (topic, partitions) in group_by_topic(tps) {
        let subscribers = index.subscribers(&topic);
        if subscribers.is_empty() {
            trace!(topic = %topic, "no agent subscribed, skipping");
            continue;
        }

        for name in subscribers {
            let Some(agent) = registry.get(&name) else {
                warn!(agent = %name, topic = %topic, "indexed agent is not registered, skipping");
                continue;
            };

            debug!(
                agent = %name,
                topic = %topic,
                partitions = partitions.len(),
                "{}",
                operation
            );

            let result = match kind {
                RebalanceKind::Revoked => agent.on_partitions_revoked(&partitions).await,
                RebalanceKind::Assigned => agent.on_partitions_assigned(&partitions).await,
            };

            if let Err(source) = result {
                warn!(agent = %name, topic = %topic, error = %source, "agent failed to {}", operation);
                return Err(ManagerError::Agent {
                    agent: name,
                    operation,
                    source,
                });
            }
        }
    }

    Ok(())
}
