//! Stream consumer task.

use super::{TaskKind, TaskProfile};
use crate::common::CommonTask;
use crate::data::TaskData;
use crate::error::Result;
use crate::ids::TaskId;
use crate::launch::LaunchDescriptor;
use crate::offer::Offer;
use crate::params::{ParamSchema, ParamSpec, Parameters, UnknownParams};
use crate::settings::FrameworkSettings;
use crate::token::TokenSource;
use std::fmt;

/// Task that runs a stream consumer executor.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerTask {
    pub(crate) common: CommonTask,
}

impl ConsumerTask {
    pub const PROFILE: TaskProfile = TaskProfile {
        kind: TaskKind::Consumer,
        executor_name: "kafka-consumer",
        flags: &["brokers", "topics", "partitions", "cassandra", "keyspace", "schema"],
        schema: ParamSchema {
            params: &[
                ParamSpec::float("cpu").non_negative(),
                ParamSpec::float("mem").non_negative(),
                ParamSpec::text("executor"),
                ParamSpec::text("brokers"),
                ParamSpec::text("topics"),
                ParamSpec::text("partitions"),
                ParamSpec::text("cassandra"),
                ParamSpec::text("keyspace"),
                ParamSpec::text("schema"),
            ],
            unknown: UnknownParams::Reject,
        },
    };

    /// Create an inactive consumer from initial parameters.
    pub fn new(id: impl Into<TaskId>, params: &Parameters) -> Result<Self> {
        let data = TaskData::new(id, params, &Self::PROFILE.schema)?;
        Self::from_data(data)
    }

    pub fn from_data(data: TaskData) -> Result<Self> {
        Ok(Self {
            common: CommonTask::new(data)?,
        })
    }

    pub fn common(&self) -> &CommonTask {
        &self.common
    }

    pub fn update(&mut self, params: &Parameters) -> Result<()> {
        self.common.update(params, &Self::PROFILE.schema)
    }

    pub fn matches(&self, offer: &Offer) -> String {
        self.common.matches(offer)
    }

    /// Compile a launch descriptor for `offer`.
    pub fn new_task_info(
        &self,
        offer: &Offer,
        settings: &FrameworkSettings,
        tokens: &dyn TokenSource,
    ) -> Result<LaunchDescriptor> {
        self.common.task_info(&Self::PROFILE, offer, settings, tokens)
    }
}

impl fmt::Display for ConsumerTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    type: {}", Self::PROFILE.kind)?;
        write!(f, "{}", self.common.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::offer::{Resource, CPUS, MEM};
    use crate::status::TaskState;
    use crate::token::SequenceTokens;

    fn settings() -> FrameworkSettings {
        FrameworkSettings::default()
            .with_api("http://master:6666")
            .with_log_level("debug")
    }

    fn offer(id: &str, agent: &str) -> Offer {
        Offer::new(id, agent)
            .with_resource(Resource::scalar(CPUS, 4.0))
            .with_resource(Resource::scalar(MEM, 4096.0))
    }

    fn consumer(params: Parameters) -> ConsumerTask {
        ConsumerTask::new("orders", &params).unwrap()
    }

    #[test]
    fn test_new_task_info() {
        let task = consumer(
            Parameters::new()
                .with("executor", "consumer.sh")
                .with("cpu", "1")
                .with("mem", "512")
                .with("topics", "orders"),
        );
        let tokens = SequenceTokens::seeded(1);

        let info = task
            .new_task_info(&offer("o1", "agent-1"), &settings(), &tokens)
            .unwrap();

        assert_eq!(info.name, "consumer-orders");
        assert_eq!(info.task_id.as_str(), "consumer-orders-00000001-000000");
        assert_eq!(info.agent_id.as_str(), "agent-1");
        assert_eq!(
            info.resources,
            vec![Resource::scalar(CPUS, 1.0), Resource::scalar(MEM, 512.0)]
        );
        assert_eq!(info.executor.executor_id.as_str(), "consumer-orders");
        assert_eq!(info.executor.name, "kafka-consumer");
        assert_eq!(
            info.executor.command.value,
            "./consumer.sh --log.level debug --type consumer --topics orders"
        );
        assert_eq!(info.executor.command.uris.len(), 1);
        assert_eq!(
            info.executor.command.uris[0].value,
            "http://master:6666/resource/consumer.sh"
        );
        assert!(info.executor.command.uris[0].executable);

        let payload: serde_json::Value = serde_json::from_slice(&info.data).unwrap();
        assert_eq!(payload["topics"], "orders");
        assert_eq!(payload["executor"], "consumer.sh");
    }

    #[test]
    fn test_relaunch_gets_new_instance_id() {
        let task = consumer(Parameters::new().with("executor", "consumer.sh"));
        let tokens = SequenceTokens::seeded(9);

        let first = task
            .new_task_info(&offer("o1", "agent-1"), &settings(), &tokens)
            .unwrap();
        let second = task
            .new_task_info(&offer("o2", "agent-2"), &settings(), &tokens)
            .unwrap();

        assert_ne!(first.task_id, second.task_id);
        assert_eq!(first.resources, second.resources);
        assert_eq!(first.executor, second.executor);
        assert_eq!(second.agent_id.as_str(), "agent-2");
    }

    #[test]
    fn test_missing_executor_is_not_launchable() {
        let tokens = SequenceTokens::seeded(0);

        let absent = consumer(Parameters::new().with("topics", "orders"));
        let err = absent
            .new_task_info(&offer("o1", "a"), &settings(), &tokens)
            .unwrap_err();
        assert_eq!(err, CoreError::MissingExecutor("orders".to_string()));

        let empty = consumer(Parameters::new().with("executor", ""));
        assert!(matches!(
            empty.new_task_info(&offer("o1", "a"), &settings(), &tokens),
            Err(CoreError::MissingExecutor(_))
        ));
    }

    #[test]
    fn test_flags_follow_declared_order() {
        let task = consumer(
            Parameters::new()
                .with("schema", "avro")
                .with("executor", "consumer.sh")
                .with("keyspace", "ks")
                .with("brokers", "b1:9092,b2:9092")
                .with("partitions", ""),
        );

        let executor = task
            .common()
            .executor_info(&ConsumerTask::PROFILE, &settings())
            .unwrap();

        assert_eq!(
            executor.command.value,
            "./consumer.sh --log.level debug --type consumer \
             --brokers b1:9092,b2:9092 --keyspace ks --schema avro"
        );
    }

    #[test]
    fn test_launch_requires_inactive_state() {
        let mut task = consumer(Parameters::new().with("executor", "consumer.sh"));
        task.common.data.transition(TaskState::Staging).unwrap();

        let err = task
            .new_task_info(&offer("o1", "a"), &settings(), &SequenceTokens::seeded(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotLaunchable { .. }));
    }

    #[test]
    fn test_config_change_between_launches() {
        let mut task = consumer(Parameters::new().with("executor", "consumer.sh"));
        let tokens = SequenceTokens::seeded(3);

        let before = task
            .new_task_info(&offer("o1", "a"), &settings(), &tokens)
            .unwrap();
        task.update(&Parameters::new().with("topics", "payments")).unwrap();
        let after = task
            .new_task_info(&offer("o1", "a"), &settings(), &tokens)
            .unwrap();

        assert!(!before.executor.command.value.contains("--topics"));
        assert!(after.executor.command.value.ends_with("--topics payments"));
    }
}
