//! streamrun Core Domain Types
//!
//! This crate holds the task-level contract between the framework and the
//! cluster resource manager:
//! - Task configuration and lifecycle state
//! - Offer matching against declared CPU/memory requirements
//! - Compilation of a task into a launch descriptor
//!
//! Nothing here performs I/O. Offers come in, descriptors go out.

pub mod common;
pub mod data;
pub mod error;
pub mod ids;
pub mod launch;
pub mod offer;
pub mod params;
pub mod settings;
pub mod status;
pub mod task;
pub mod token;

// Re-export commonly used types
pub use common::{CommonTask, Mismatch};
pub use data::TaskData;
pub use error::{CoreError, Result};
pub use ids::{AgentId, ExecutorId, OfferId, TaskId, TaskInstanceId};
pub use launch::{CommandInfo, CommandUri, ExecutorInfo, LaunchDescriptor};
pub use offer::{Offer, Range, Resource, ResourceValue};
pub use params::{ParamKind, ParamSchema, ParamSpec, Parameters, TaskConfig, UnknownParams};
pub use settings::FrameworkSettings;
pub use status::TaskState;
pub use task::{ConsumerTask, ProducerTask, Task, TaskKind, TaskProfile};
pub use token::{SequenceTokens, TokenSource, UuidTokens};
