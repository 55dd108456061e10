use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tributary_core::Agent;

/// Primary store of agents: name -> agent, iterated in registration order.
#[derive(Default)]
pub(crate) struct AgentRegistry {
    // registration order; every entry has a binding in `agents`
    order: Vec<String>,
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `agent`. A name that is already bound keeps its position
    /// and the previous agent is returned.
    pub(crate) fn insert(&mut self, name: String, agent: Arc<dyn Agent>) -> Option<Arc<dyn Agent>> {
        let previous = self.agents.insert(name.clone(), agent);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    /// Unbinds `name`, preserving the order of the remaining agents.
    pub(crate) fn remove(&mut self, name: &str) -> Option<Arc<dyn Agent>> {
        let removed = self.agents.remove(name)?;
        self.order.retain(|n| n != name);
        Some(removed)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Arc<dyn Agent>> {
        self.agents.get(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered names, in registration order.
    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(name, agent)` pairs, in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Agent>)> {
        self.order
            .iter()
            .filter_map(|name| self.agents.get(name).map(|agent| (name.as_str(), agent)))
    }
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.order)
            .finish()
    }
}
