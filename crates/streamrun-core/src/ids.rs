//! Newtype wrappers for identifiers to ensure type safety.
//!
//! The resource manager treats every identifier as an opaque string; the
//! wrappers only exist so a `TaskId` can never be handed where an `AgentId`
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string reference.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_id! {
    /// Framework-wide identity of a registered task.
    TaskId
}

string_id! {
    /// Identity of a cluster agent (the node an offer comes from).
    AgentId
}

string_id! {
    /// Identity of a resource offer.
    OfferId
}

string_id! {
    /// Identity of one launch attempt of a task.
    ///
    /// Distinct per call to `new_task_info`, so relaunches of the same task
    /// never collide.
    TaskInstanceId
}

string_id! {
    /// Identity of the executor that hosts a task instance.
    ExecutorId
}
