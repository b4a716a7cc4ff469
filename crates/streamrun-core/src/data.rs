//! Per-task persistent state.

use crate::error::{CoreError, Result};
use crate::ids::TaskId;
use crate::params::{ParamSchema, Parameters, TaskConfig};
use crate::status::TaskState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity, lifecycle state and configuration of one registered task.
///
/// Callers that share a `TaskData` between threads must serialize access to
/// it themselves; nothing here is internally synchronized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskData {
    pub id: TaskId,
    pub state: TaskState,
    pub config: TaskConfig,
}

impl TaskData {
    /// Create an inactive task and apply the initial parameters.
    ///
    /// All-or-nothing: if the parameters are rejected no `TaskData` exists.
    pub fn new(id: impl Into<TaskId>, params: &Parameters, schema: &ParamSchema) -> Result<Self> {
        let mut data = Self {
            id: id.into(),
            state: TaskState::Inactive,
            config: TaskConfig::new(),
        };
        data.update(params, schema)?;
        Ok(data)
    }

    /// Merge parameters into the config. Does not touch the lifecycle state.
    pub fn update(&mut self, params: &Parameters, schema: &ParamSchema) -> Result<()> {
        self.config.update(params, schema)
    }

    /// Move to `next`, enforcing the lifecycle table.
    pub fn transition(&mut self, next: TaskState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(CoreError::InvalidStateTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }
}

impl fmt::Display for TaskData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    id: {}", self.id)?;
        writeln!(f, "    state: {}", self.state)?;
        if self.config.is_empty() {
            return writeln!(f, "    config: <none>");
        }
        writeln!(f, "    config:")?;
        for (key, value) in self.config.iter() {
            writeln!(f, "      {}: {}", key, value)?;
        }
        Ok(())
    }
}
