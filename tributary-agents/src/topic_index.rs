use dashmap::DashMap;
use std::collections::HashSet;

/// Derived lookup: topic name -> names of the agents subscribed to it.
///
/// Holds agent names only, never agent handles, so an agent dropped from the
/// registry is not kept alive here. Names are resolved against the registry at
/// dispatch time. Entries reflect each agent's topic list as read when it was
/// indexed; they are not re-validated later.
#[derive(Debug, Default)]
pub(crate) struct TopicIndex(DashMap<String, HashSet<String>>);

impl TopicIndex {
    /// Creates an empty topic index.
    pub(crate) fn new() -> Self {
        Self(DashMap::new())
    }

    /// Adds `agent` to the bucket of every topic in `topics`.
    pub(crate) fn index_agent<I, S>(&self, agent: &str, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for topic in topics {
            self.0
                .entry(topic.into())
                .or_default()
                .insert(agent.to_string());
        }
    }

    /// Drops `agent` from every bucket; buckets left empty are removed.
    pub(crate) fn remove_agent(&self, agent: &str) {
        self.0.retain(|_, agents| {
            agents.remove(agent);
            !agents.is_empty()
        });
    }

    /// Snapshot of the agents subscribed to `topic`; empty when nobody is.
    pub(crate) fn subscribers(&self, topic: &str) -> HashSet<String> {
        self.0
            .get(topic)
            .map(|agents| agents.value().clone())
            .unwrap_or_default()
    }

    /// Returns true if `agent` is in the bucket for `topic`.
    pub(crate) fn contains(&self, topic: &str, agent: &str) -> bool {
        self.0
            .get(topic)
            .map(|agents| agents.contains(agent))
            .unwrap_or(false)
    }

    /// Topics with at least one subscriber.
    pub(crate) fn topics(&self) -> Vec<String> {
        self.0.iter().map(|entry| entry.key().clone()).collect()
    }

    pub(crate) fn clear(&self) {
        self.0.clear();
    }
}
