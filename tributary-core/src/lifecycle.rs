use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tokio::sync::watch;

/// Observable run state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    /// Built or reset, not started yet.
    Init,
    /// Started and consuming.
    Running,
    /// Asked to wind down; the run loop should exit at its next check.
    Cancelled,
    /// Fully stopped.
    Stopped,
}

impl AgentState {
    /// True once the agent has been told to stop consuming.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentState::Cancelled | AgentState::Stopped)
    }
}

impl Display for AgentState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AgentState::Init => write!(f, "init"),
            AgentState::Running => write!(f, "running"),
            AgentState::Cancelled => write!(f, "cancelled"),
            AgentState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Cooperative cancellation cell for agent implementations.
///
/// `cancel` is a synchronous state transition: it never interrupts an in-flight
/// call, the agent's run loop observes it by polling [`AgentLifecycle::is_cancelled`]
/// or by selecting on [`AgentLifecycle::cancelled`].
///
/// ```ignore
/// loop {
///     tokio::select! {
///         _ = lifecycle.cancelled() => break,
///         record = stream.next() => handle(record).await,
///     }
/// }
/// ```
#[derive(Debug)]
pub struct AgentLifecycle {
    state: watch::Sender<AgentState>,
}

impl AgentLifecycle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AgentState::Init);
        Self { state }
    }

    /// Current state snapshot.
    pub fn state(&self) -> AgentState {
        *self.state.borrow()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state().is_cancelled()
    }

    pub fn mark_running(&self) {
        self.state.send_replace(AgentState::Running);
    }

    /// Flip to `Cancelled`. Returns `false` when the agent was already cancelled
    /// or stopped, in which case nothing changes.
    pub fn cancel(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_cancelled() {
                false
            } else {
                *state = AgentState::Cancelled;
                true
            }
        })
    }

    pub fn mark_stopped(&self) {
        self.state.send_replace(AgentState::Stopped);
    }

    /// Back to `Init`, ready for another start.
    pub fn reset(&self) {
        self.state.send_replace(AgentState::Init);
    }

    /// Watch state transitions from another task.
    pub fn subscribe(&self) -> watch::Receiver<AgentState> {
        self.state.subscribe()
    }

    /// Resolves once the agent is cancelled or stopped; immediately if it already is.
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // the sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|state| state.is_cancelled()).await;
    }
}

impl Default for AgentLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
