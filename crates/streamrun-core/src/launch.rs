//! Launch descriptors: what the scheduler hands to the resource manager to
//! start one task instance.

use crate::ids::{AgentId, ExecutorId, TaskInstanceId};
use crate::offer::Resource;
use serde::{Deserialize, Serialize};

/// Artifact the agent downloads before starting the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandUri {
    pub value: String,
    pub executable: bool,
}

/// Shell command plus the artifacts it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub value: String,
    pub uris: Vec<CommandUri>,
}

/// Program the agent runs to host the task workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorInfo {
    pub executor_id: ExecutorId,
    pub name: String,
    pub command: CommandInfo,
}

/// Offer-specific bundle of identity, resource claims and command.
///
/// Built fresh for every accepted offer; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchDescriptor {
    /// Task name, `{kind}-{task id}`.
    pub name: String,

    /// Unique per launch attempt.
    pub task_id: TaskInstanceId,

    /// Agent the offer came from.
    pub agent_id: AgentId,

    pub executor: ExecutorInfo,

    /// What the task reserves, not what the offer had.
    pub resources: Vec<Resource>,

    /// Serialized task config, handed to the executor at launch.
    pub data: Vec<u8>,
}
