#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tributary_agents::{Agent, AgentError, AgentLifecycle, AgentState, TopicPartition, TopicPartitionSet};

/// One call the manager made into an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(String),
    Stop(String),
    Restart(String),
    Cancel(String),
    Reset(String),
    Revoked(String, Vec<TopicPartition>),
    Assigned(String, Vec<TopicPartition>),
}

impl Event {
    pub fn agent(&self) -> &str {
        match self {
            Event::Start(a)
            | Event::Stop(a)
            | Event::Restart(a)
            | Event::Cancel(a)
            | Event::Reset(a)
            | Event::Revoked(a, _)
            | Event::Assigned(a, _) => a,
        }
    }
}

/// Calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Start,
    Stop,
    Restart,
    Revoked,
    Assigned,
}

/// Ordered record of calls shared by every agent of a test.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn events_for(&self, agent: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.agent() == agent)
            .collect()
    }
}

/// Agent double recording every call into a shared [`Journal`].
#[derive(Debug)]
pub struct RecordingAgent {
    name: String,
    topics: Mutex<Vec<String>>,
    journal: Journal,
    lifecycle: AgentLifecycle,
    fail_on: Option<FailOn>,
}

impl RecordingAgent {
    pub fn new(name: &str, topics: &[&str], journal: &Journal) -> Arc<Self> {
        Self::build(name, topics, journal, None)
    }

    pub fn failing(name: &str, topics: &[&str], journal: &Journal, fail_on: FailOn) -> Arc<Self> {
        Self::build(name, topics, journal, Some(fail_on))
    }

    fn build(name: &str, topics: &[&str], journal: &Journal, fail_on: Option<FailOn>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            topics: Mutex::new(topics.iter().map(|t| t.to_string()).collect()),
            journal: journal.clone(),
            lifecycle: AgentLifecycle::new(),
            fail_on,
        })
    }

    pub fn state(&self) -> AgentState {
        self.lifecycle.state()
    }

    /// Changes the topic list after registration.
    pub fn set_topics(&self, topics: &[&str]) {
        *self.topics.lock().unwrap() = topics.iter().map(|t| t.to_string()).collect();
    }

    fn check(&self, call: FailOn) -> Result<(), AgentError> {
        if self.fail_on == Some(call) {
            let msg = format!("{} refused {:?}", self.name, call);
            return Err(match call {
                FailOn::Start => AgentError::StartFailed(msg),
                FailOn::Stop => AgentError::StopFailed(msg),
                FailOn::Restart => AgentError::RestartFailed(msg),
                FailOn::Revoked | FailOn::Assigned => AgentError::RebalanceFailed(msg),
            });
        }
        Ok(())
    }
}

fn sorted(tps: &TopicPartitionSet) -> Vec<TopicPartition> {
    let mut tps: Vec<TopicPartition> = tps.iter().cloned().collect();
    tps.sort();
    tps
}

#[async_trait]
impl Agent for RecordingAgent {
    async fn start(&self) -> Result<(), AgentError> {
        self.journal.record(Event::Start(self.name.clone()));
        self.check(FailOn::Start)?;
        self.lifecycle.mark_running();
        Ok(())
    }

    async fn stop(&self) -> Result<(), AgentError> {
        self.journal.record(Event::Stop(self.name.clone()));
        self.check(FailOn::Stop)?;
        self.lifecycle.mark_stopped();
        Ok(())
    }

    async fn restart(&self) -> Result<(), AgentError> {
        self.journal.record(Event::Restart(self.name.clone()));
        self.check(FailOn::Restart)?;
        self.lifecycle.mark_running();
        Ok(())
    }

    fn cancel(&self) {
        self.journal.record(Event::Cancel(self.name.clone()));
        self.lifecycle.cancel();
    }

    fn service_reset(&self) {
        self.journal.record(Event::Reset(self.name.clone()));
    }

    async fn on_partitions_revoked(&self, revoked: &TopicPartitionSet) -> Result<(), AgentError> {
        self.journal
            .record(Event::Revoked(self.name.clone(), sorted(revoked)));
        self.check(FailOn::Revoked)
    }

    async fn on_partitions_assigned(&self, assigned: &TopicPartitionSet) -> Result<(), AgentError> {
        self.journal
            .record(Event::Assigned(self.name.clone(), sorted(assigned)));
        self.check(FailOn::Assigned)
    }

    fn topic_names(&self) -> Vec<String> {
        self.topics.lock().unwrap().clone()
    }
}

pub fn tps(entries: &[(&str, i32)]) -> TopicPartitionSet {
    entries
        .iter()
        .map(|&(topic, partition)| TopicPartition::new(topic, partition))
        .collect()
}

pub fn tp_list(entries: &[(&str, i32)]) -> Vec<TopicPartition> {
    let mut list: Vec<TopicPartition> = entries
        .iter()
        .map(|&(topic, partition)| TopicPartition::new(topic, partition))
        .collect();
    list.sort();
    list
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
