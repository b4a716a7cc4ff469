//! Resource offers as advertised by the cluster resource manager.
//!
//! The core only ever reads offers.

use crate::ids::{AgentId, OfferId};
use serde::{Deserialize, Serialize};

/// Well-known scalar resource names.
pub const CPUS: &str = "cpus";
pub const MEM: &str = "mem";

/// Inclusive range of values, e.g. ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub begin: u64,
    pub end: u64,
}

/// Quantity carried by a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceValue {
    Scalar(f64),
    Ranges(Vec<Range>),
    Set(Vec<String>),
}

/// One named resource in an offer or a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub value: ResourceValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Resource {
    /// A scalar resource with no role.
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ResourceValue::Scalar(value),
            role: None,
        }
    }

    /// Builder method to set the reservation role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self.value {
            ResourceValue::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

/// Proposal of resources available on one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub agent_id: AgentId,
    pub hostname: String,
    pub resources: Vec<Resource>,
}

impl Offer {
    /// Create an offer with no resources.
    pub fn new(id: impl Into<OfferId>, agent_id: impl Into<AgentId>) -> Self {
        Self {
            id: id.into(),
            agent_id: agent_id.into(),
            hostname: String::new(),
            resources: Vec::new(),
        }
    }

    /// Builder method to set the hostname.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Builder method to add a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Total of every scalar resource called `name`, across roles.
    pub fn scalar(&self, name: &str) -> f64 {
        self.resources
            .iter()
            .filter(|r| r.name == name)
            .filter_map(Resource::as_scalar)
            .sum()
    }
}
