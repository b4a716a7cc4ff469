//! Typed tasks.
//!
//! The set of task kinds is closed: every kind is a variant of [`Task`] and
//! carries a static [`TaskProfile`] describing its parameters and executor.
//! Shared behaviour lives in [`CommonTask`], embedded by value in each kind.

mod consumer;
mod producer;

pub use consumer::ConsumerTask;
pub use producer::ProducerTask;

use crate::common::CommonTask;
use crate::data::TaskData;
use crate::error::{CoreError, Result};
use crate::ids::TaskId;
use crate::launch::{ExecutorInfo, LaunchDescriptor};
use crate::offer::Offer;
use crate::params::{ParamSchema, Parameters};
use crate::settings::FrameworkSettings;
use crate::status::TaskState;
use crate::token::TokenSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of workload a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Consumer,
    Producer,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Producer => "producer",
        }
    }

    /// Static description of this kind.
    pub fn profile(&self) -> &'static TaskProfile {
        match self {
            Self::Consumer => &ConsumerTask::PROFILE,
            Self::Producer => &ProducerTask::PROFILE,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consumer" => Ok(Self::Consumer),
            "producer" => Ok(Self::Producer),
            other => Err(CoreError::Validation {
                name: "type".to_string(),
                reason: format!("unknown task type '{}'", other),
            }),
        }
    }
}

/// Everything that distinguishes one task kind from another.
#[derive(Debug, Clone, Copy)]
pub struct TaskProfile {
    pub kind: TaskKind,

    /// Executor name reported to the resource manager.
    pub executor_name: &'static str,

    /// Optional parameters forwarded as `--name value`, in this order.
    pub flags: &'static [&'static str],

    /// Parameters accepted by `update`.
    pub schema: ParamSchema,
}

/// A registered task of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TaskRecord", try_from = "TaskRecord")]
pub enum Task {
    Consumer(ConsumerTask),
    Producer(ProducerTask),
}

impl Task {
    /// Create an inactive task of the given kind.
    pub fn new(kind: TaskKind, id: impl Into<TaskId>, params: &Parameters) -> Result<Self> {
        match kind {
            TaskKind::Consumer => ConsumerTask::new(id, params).map(Self::Consumer),
            TaskKind::Producer => ProducerTask::new(id, params).map(Self::Producer),
        }
    }

    /// Rebuild a task from persisted data.
    pub fn from_data(kind: TaskKind, data: TaskData) -> Result<Self> {
        match kind {
            TaskKind::Consumer => ConsumerTask::from_data(data).map(Self::Consumer),
            TaskKind::Producer => ProducerTask::from_data(data).map(Self::Producer),
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Consumer(_) => TaskKind::Consumer,
            Self::Producer(_) => TaskKind::Producer,
        }
    }

    pub fn common(&self) -> &CommonTask {
        match self {
            Self::Consumer(t) => t.common(),
            Self::Producer(t) => t.common(),
        }
    }

    fn common_mut(&mut self) -> &mut CommonTask {
        match self {
            Self::Consumer(t) => &mut t.common,
            Self::Producer(t) => &mut t.common,
        }
    }

    pub fn data(&self) -> &TaskData {
        &self.common().data
    }

    pub fn id(&self) -> &TaskId {
        &self.data().id
    }

    pub fn state(&self) -> TaskState {
        self.data().state
    }

    /// Merge parameters using this kind's schema.
    pub fn update(&mut self, params: &Parameters) -> Result<()> {
        let schema = self.kind().profile().schema;
        self.common_mut().update(params, &schema)
    }

    /// Apply a scheduler-driven lifecycle transition.
    pub fn transition(&mut self, next: TaskState) -> Result<()> {
        self.common_mut().data.transition(next)
    }

    /// Empty when the offer fits, otherwise the first deficiency.
    pub fn matches(&self, offer: &Offer) -> String {
        self.common().matches(offer)
    }

    pub fn executor_info(&self, settings: &FrameworkSettings) -> Result<ExecutorInfo> {
        self.common().executor_info(self.kind().profile(), settings)
    }

    pub fn new_task_info(
        &self,
        offer: &Offer,
        settings: &FrameworkSettings,
        tokens: &dyn TokenSource,
    ) -> Result<LaunchDescriptor> {
        match self {
            Self::Consumer(t) => t.new_task_info(offer, settings, tokens),
            Self::Producer(t) => t.new_task_info(offer, settings, tokens),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consumer(t) => fmt::Display::fmt(t, f),
            Self::Producer(t) => fmt::Display::fmt(t, f),
        }
    }
}

/// External projection: `{"type": ..., "data": {"id", "state", "config"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskRecord {
    #[serde(rename = "type")]
    kind: TaskKind,
    data: TaskData,
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        let kind = task.kind();
        let data = match task {
            Task::Consumer(t) => t.common.data,
            Task::Producer(t) => t.common.data,
        };
        Self { kind, data }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = CoreError;

    fn try_from(record: TaskRecord) -> Result<Self> {
        Task::from_data(record.kind, record.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_shape() {
        let params = Parameters::new().with("executor", "consumer.sh").with("cpu", "1");
        let task = Task::new(TaskKind::Consumer, "orders", &params).unwrap();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "consumer",
                "data": {
                    "id": "orders",
                    "state": "inactive",
                    "config": { "cpu": "1", "executor": "consumer.sh" }
                }
            })
        );
    }

    #[test]
    fn test_projection_roundtrip() {
        let params = Parameters::new()
            .with("executor", "producer.sh")
            .with("topic", "events")
            .with("mem", "1024");
        let mut task = Task::new(TaskKind::Producer, "events-out", &params).unwrap();
        task.transition(TaskState::Staging).unwrap();

        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();

        assert_eq!(back.kind(), TaskKind::Producer);
        assert_eq!(back.id(), task.id());
        assert_eq!(back.state(), TaskState::Staging);
        assert_eq!(back.data().config, task.data().config);
        assert_eq!(back.common().mem(), 1024.0);
    }

    #[test]
    fn test_projection_with_bad_resource_is_rejected() {
        let json = r#"{"type":"consumer","data":{"id":"x","state":"inactive","config":{"cpu":"fast"}}}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Consumer".parse::<TaskKind>().unwrap(), TaskKind::Consumer);
        assert!("broker".parse::<TaskKind>().is_err());
    }

    #[test]
    fn test_update_uses_kind_schema() {
        let mut task = Task::new(TaskKind::Producer, "p1", &Parameters::new()).unwrap();

        // "topics" belongs to consumers; producers take "topic".
        let err = task.update(&Parameters::new().with("topics", "a")).unwrap_err();
        assert_eq!(err, CoreError::UnknownParameter("topics".to_string()));

        task.update(&Parameters::new().with("topic", "a")).unwrap();
        assert_eq!(task.data().config.get_string("topic").unwrap(), "a");
    }

    #[test]
    fn test_display_includes_type_label() {
        let task = Task::new(TaskKind::Consumer, "c1", &Parameters::new()).unwrap();
        assert_eq!(
            task.to_string(),
            "    type: consumer\n    id: c1\n    state: inactive\n    config: <none>\n"
        );
    }
}
