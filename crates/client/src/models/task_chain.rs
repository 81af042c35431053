//! Task chain status models.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// State of a Polaris task chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskChainState {
    Ready,
    Running,
    Canceling,
    Canceled,
    Succeeded,
    Failed,
    Undoing,
    /// Empty or unrecognized state.
    #[default]
    #[serde(other)]
    Invalid,
}

impl TaskChainState {
    /// Terminal states: `SUCCEEDED`, `CANCELED` and `FAILED`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskChainState::Succeeded | TaskChainState::Canceled | TaskChainState::Failed
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskChainState::Ready => "READY",
            TaskChainState::Running => "RUNNING",
            TaskChainState::Canceling => "CANCELING",
            TaskChainState::Canceled => "CANCELED",
            TaskChainState::Succeeded => "SUCCEEDED",
            TaskChainState::Failed => "FAILED",
            TaskChainState::Undoing => "UNDOING",
            TaskChainState::Invalid => "",
        }
    }
}

impl fmt::Display for TaskChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskChainState::Invalid => f.write_str("INVALID"),
            state => f.write_str(state.as_str()),
        }
    }
}

/// A Polaris task chain as reported by `getKorgTaskchainStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChain {
    pub id: i64,
    #[serde(rename = "taskchainUuid")]
    pub task_chain_id: Uuid,
    #[serde(default)]
    pub state: TaskChainState,
}
