//! Behaviour shared by every task type: resource requirements, offer
//! matching and launch descriptor assembly.

use crate::data::TaskData;
use crate::error::{CoreError, Result};
use crate::ids::{ExecutorId, TaskInstanceId};
use crate::launch::{CommandInfo, CommandUri, ExecutorInfo, LaunchDescriptor};
use crate::offer::{Offer, Resource, CPUS, MEM};
use crate::params::{ParamSchema, Parameters};
use crate::settings::FrameworkSettings;
use crate::task::TaskProfile;
use crate::token::TokenSource;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Config key holding the CPU requirement.
pub const CPU_PARAM: &str = "cpu";
/// Config key holding the memory requirement, in MB.
pub const MEM_PARAM: &str = "mem";
/// Config key naming the executor artifact.
pub const EXECUTOR_PARAM: &str = "executor";

/// CPU requirement when `cpu` is not configured.
pub const DEFAULT_CPU: f64 = 0.1;
/// Memory requirement (MB) when `mem` is not configured.
pub const DEFAULT_MEM: f64 = 128.0;

/// First unmet requirement found while matching an offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mismatch {
    InsufficientCpu { offered: f64, required: f64 },
    InsufficientMem { offered: f64, required: f64 },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientCpu { offered, required } => {
                write!(f, "insufficient cpus: offered {}, required {}", offered, required)
            }
            Self::InsufficientMem { offered, required } => {
                write!(f, "insufficient mem: offered {}, required {}", offered, required)
            }
        }
    }
}

/// Task data plus the CPU/memory it needs.
///
/// Requirements are derived from the config whenever it changes, so `cpu`
/// and `mem` always agree with `data.config`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTask {
    pub data: TaskData,
    cpu: f64,
    mem: f64,
}

impl CommonTask {
    /// Wrap task data, deriving its resource requirements.
    pub fn new(data: TaskData) -> Result<Self> {
        let (cpu, mem) = requirements(&data)?;
        Ok(Self { data, cpu, mem })
    }

    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    pub fn mem(&self) -> f64 {
        self.mem
    }

    /// Apply parameters and re-derive requirements.
    ///
    /// Nothing changes unless both steps succeed.
    pub fn update(&mut self, params: &Parameters, schema: &ParamSchema) -> Result<()> {
        let mut data = self.data.clone();
        data.update(params, schema)?;
        *self = Self::new(data)?;
        Ok(())
    }

    /// Check the offer against the requirements, CPU first, then memory.
    /// A non-finite offered amount never satisfies a requirement.
    pub fn check_offer(&self, offer: &Offer) -> Option<Mismatch> {
        let cpus = offer.scalar(CPUS);
        if !cpus.is_finite() || cpus < self.cpu {
            return Some(Mismatch::InsufficientCpu {
                offered: cpus,
                required: self.cpu,
            });
        }

        let mem = offer.scalar(MEM);
        if !mem.is_finite() || mem < self.mem {
            return Some(Mismatch::InsufficientMem {
                offered: mem,
                required: self.mem,
            });
        }

        None
    }

    /// Diagnostic string for operator logs: empty when the offer fits.
    pub fn matches(&self, offer: &Offer) -> String {
        self.check_offer(offer)
            .map(|m| m.to_string())
            .unwrap_or_default()
    }

    /// Build the executor that runs this task.
    ///
    /// Fails when no executor name is configured; such a task cannot be
    /// launched.
    pub fn executor_info(
        &self,
        profile: &TaskProfile,
        settings: &FrameworkSettings,
    ) -> Result<ExecutorInfo> {
        let Some(executor) = self.data.config.optional(EXECUTOR_PARAM) else {
            warn!(task_id = %self.data.id, "Executor name required");
            return Err(CoreError::MissingExecutor(self.data.id.to_string()));
        };

        let params = profile
            .flags
            .iter()
            .filter_map(|name| {
                self.data
                    .config
                    .optional(name)
                    .map(|value| format!("--{} {}", name, value))
            })
            .collect::<Vec<_>>()
            .join(" ");

        debug!(task_id = %self.data.id, params = %params, "Launching executor with params");

        let mut command = format!(
            "./{} --log.level {} --type {}",
            executor, settings.log_level, profile.kind
        );
        if !params.is_empty() {
            command.push(' ');
            command.push_str(&params);
        }

        Ok(ExecutorInfo {
            executor_id: ExecutorId::new(self.task_name(profile)),
            name: profile.executor_name.to_string(),
            command: CommandInfo {
                value: command,
                uris: vec![CommandUri {
                    value: settings.resource_url(executor),
                    executable: true,
                }],
            },
        })
    }

    /// Compile a launch descriptor for a satisfying offer.
    ///
    /// The caller is expected to have checked the offer with
    /// [`check_offer`](Self::check_offer) first.
    pub fn task_info(
        &self,
        profile: &TaskProfile,
        offer: &Offer,
        settings: &FrameworkSettings,
        tokens: &dyn TokenSource,
    ) -> Result<LaunchDescriptor> {
        if !self.data.state.can_launch() {
            return Err(CoreError::NotLaunchable {
                task: self.data.id.to_string(),
                state: self.data.state.to_string(),
            });
        }

        let executor = self.executor_info(profile, settings)?;

        let data = serde_json::to_vec(&self.data.config).map_err(|e| {
            error!(task_id = %self.data.id, error = %e, "Task config failed to serialize");
            CoreError::Serialization(e.to_string())
        })?;

        let name = self.task_name(profile);
        let task_id = TaskInstanceId::new(format!("{}-{}", name, tokens.next_token()));

        info!(
            task_id = %task_id,
            agent_id = %offer.agent_id,
            cpus = self.cpu,
            mem = self.mem,
            "Built launch descriptor"
        );

        Ok(LaunchDescriptor {
            name,
            task_id,
            agent_id: offer.agent_id.clone(),
            executor,
            resources: vec![
                Resource::scalar(CPUS, self.cpu),
                Resource::scalar(MEM, self.mem),
            ],
            data,
        })
    }

    fn task_name(&self, profile: &TaskProfile) -> String {
        format!("{}-{}", profile.kind, self.data.id)
    }
}

fn requirements(data: &TaskData) -> Result<(f64, f64)> {
    let cpu = resource(data, CPU_PARAM, DEFAULT_CPU)?;
    let mem = resource(data, MEM_PARAM, DEFAULT_MEM)?;
    Ok((cpu, mem))
}

fn resource(data: &TaskData, name: &str, default: f64) -> Result<f64> {
    if !data.config.contains(name) {
        return Ok(default);
    }
    let value = data.config.get_f64(name)?;
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation {
            name: name.to_string(),
            reason: format!("must be a non-negative number, got {}", value),
        });
    }
    Ok(value)
}
