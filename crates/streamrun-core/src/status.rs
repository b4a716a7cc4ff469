//! Lifecycle state of a task.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse-grained operational phase of a task.
///
/// Transitions are driven by scheduler events. The happy path is
/// `Inactive -> Staging -> Running -> Stopping -> Stopped`; `Failed` is
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Registered, awaiting a launch. The only legal creation state.
    #[default]
    Inactive,
    /// Launch descriptor handed to the resource manager.
    Staging,
    /// Executor reported the task running.
    Running,
    /// Kill requested, awaiting confirmation.
    Stopping,
    /// Task stopped cleanly.
    Stopped,
    /// Task failed.
    Failed,
}

impl TaskState {
    /// Returns true if the task can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }

    /// Returns true if a launch descriptor may be compiled in this state.
    pub fn can_launch(&self) -> bool {
        matches!(self, Self::Inactive)
    }

    /// Check whether moving to `next` is allowed.
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        match (self, next) {
            (from, Self::Failed) => !from.is_terminal(),
            (Self::Inactive, Self::Staging)
            | (Self::Staging, Self::Running)
            | (Self::Running, Self::Stopping)
            | (Self::Stopping, Self::Stopped) => true,
            _ => false,
        }
    }

    /// Lowercase name, as used in the serialized projection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Staging => "staging",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_is_allowed() {
        let path = [
            TaskState::Inactive,
            TaskState::Staging,
            TaskState::Running,
            TaskState::Stopping,
            TaskState::Stopped,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_failed_only_from_non_terminal() {
        assert!(TaskState::Inactive.can_transition_to(TaskState::Failed));
        assert!(TaskState::Stopping.can_transition_to(TaskState::Failed));
        assert!(!TaskState::Stopped.can_transition_to(TaskState::Failed));
        assert!(!TaskState::Failed.can_transition_to(TaskState::Failed));
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!TaskState::Inactive.can_transition_to(TaskState::Running));
        assert!(!TaskState::Running.can_transition_to(TaskState::Staging));
        assert!(!TaskState::Running.can_transition_to(TaskState::Running));
    }

    #[test]
    fn test_only_inactive_can_launch() {
        assert!(TaskState::Inactive.can_launch());
        assert!(!TaskState::Staging.can_launch());
        assert!(!TaskState::Failed.can_launch());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&TaskState::Stopping).unwrap(), "\"stopping\"");
        let state: TaskState = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(state, TaskState::Running);
    }
}
