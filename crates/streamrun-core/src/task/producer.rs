//! Stream producer task.

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

/// Task that runs a stream producer executor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerTask {
    pub(crate) common: CommonTask,
}

impl ProducerTask {
    pub const PROFILE: TaskProfile = TaskProfile {
        kind: TaskKind::Producer,
        executor_name: "kafka-producer",
        flags: &["brokers", "topic", "partitions", "schema"],
        schema: ParamSchema {
            params: &[
                ParamSpec::float("cpu").non_negative(),
                ParamSpec::float("mem").non_negative(),
                ParamSpec::text("executor"),
                ParamSpec::text("brokers"),
                ParamSpec::text("topic"),
                ParamSpec::text("partitions"),
                ParamSpec::text("schema"),
            ],
            unknown: UnknownParams::Reject,
        },
    };

    /// Create an inactive producer from initial parameters.
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

impl fmt::Display for ProducerTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    type: {}", Self::PROFILE.kind)?;
        write!(f, "{}", self.common.data)
    }
}
