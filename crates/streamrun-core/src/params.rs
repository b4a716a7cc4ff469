//! Task configuration bag and the parameter input that updates it.
//!
//! A [`TaskConfig`] is a string-to-string map with case-normalized keys.
//! It is updated from [`Parameters`], the query-values shape an HTTP
//! configuration endpoint produces, under a per-task-type [`ParamSchema`].

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Keys that route a request rather than configure a task. Never stored.
const RESERVED_KEYS: &[&str] = &["id", "type"];

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Value type a parameter must convert to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Float,
    Int,
    Bool,
}

impl ParamKind {
    fn expected(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Float => "a number",
            Self::Int => "an integer",
            Self::Bool => "true or false",
        }
    }
}

/// Declaration of one accepted parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub non_negative: bool,
}

impl ParamSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
            non_negative: false,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            non_negative: false,
        }
    }

    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            non_negative: false,
        }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Bool,
            non_negative: false,
        }
    }

    /// Reject numbers below zero.
    pub const fn non_negative(mut self) -> Self {
        self.non_negative = true;
        self
    }

    /// Check a raw value against this spec.
    fn validate(&self, value: &str) -> Result<()> {
        let conversion = || CoreError::Conversion {
            name: self.name.to_string(),
            value: value.to_string(),
            expected: self.kind.expected(),
        };

        let number = match self.kind {
            ParamKind::Text => return Ok(()),
            ParamKind::Bool => {
                value.trim().parse::<bool>().map_err(|_| conversion())?;
                return Ok(());
            }
            ParamKind::Float => {
                let v = value.trim().parse::<f64>().map_err(|_| conversion())?;
                if !v.is_finite() {
                    return Err(conversion());
                }
                v
            }
            ParamKind::Int => value.trim().parse::<i64>().map_err(|_| conversion())? as f64,
        };

        if self.non_negative && number < 0.0 {
            return Err(CoreError::Validation {
                name: self.name.to_string(),
                reason: format!("must not be negative, got {}", value),
            });
        }
        Ok(())
    }
}

/// What `update` does with a name the schema does not list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownParams {
    /// Skip it silently.
    Ignore,
    /// Fail the whole update.
    #[default]
    Reject,
}

/// The fixed whitelist of parameters a task type accepts.
#[derive(Debug, Clone, Copy)]
pub struct ParamSchema {
    pub params: &'static [ParamSpec],
    pub unknown: UnknownParams,
}

impl ParamSchema {
    /// Look up a spec by (already normalized) name.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Query-values style input: every name maps to one or more values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, Vec<String>>,
}

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `name`. Names are case-normalized, so `CPU` and
    /// `cpu` share one list of values.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(normalize(&name.into()))
            .or_default()
            .push(value.into());
    }

    /// Builder method to append a value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// Parse a `key=value` argument. The value may be empty; the key may not.
    pub fn parse_pair(pair: &str) -> Result<(String, String)> {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(CoreError::Validation {
                name: pair.to_string(),
                reason: "expected key=value".to_string(),
            }),
        }
    }

    /// The last value supplied for `name`, if any.
    pub fn last(&self, name: &str) -> Option<&str> {
        self.values
            .get(&normalize(name))
            .and_then(|vs| vs.last())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, last value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter_map(|(k, vs)| vs.last().map(|v| (k.as_str(), v.as_str())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}

/// Declarative, user-settable parameter set of a task.
///
/// Absent keys and empty values are different conditions: `get_string`
/// fails on the former and returns `""` for the latter. Only [`optional`]
/// treats an empty value as absent.
///
/// [`optional`]: TaskConfig::optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct TaskConfig {
    values: BTreeMap<String, String>,
}

impl TaskConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `params` into the config.
    ///
    /// Every name is validated before anything is written, so a failed
    /// update leaves the config exactly as it was.
    pub fn update(&mut self, params: &Parameters, schema: &ParamSchema) -> Result<()> {
        let mut staged = Vec::new();

        for (raw_name, value) in params.iter() {
            let name = normalize(raw_name);
            if RESERVED_KEYS.contains(&name.as_str()) {
                continue;
            }

            match schema.get(&name) {
                Some(spec) => {
                    spec.validate(value)?;
                    staged.push((name, value.to_string()));
                }
                None => match schema.unknown {
                    UnknownParams::Ignore => {
                        tracing::debug!(param = %name, "Ignoring unknown parameter");
                    }
                    UnknownParams::Reject => return Err(CoreError::UnknownParameter(name)),
                },
            }
        }

        self.values.extend(staged);
        Ok(())
    }

    /// Raw string value. Fails only when the key is absent.
    pub fn get_string(&self, name: &str) -> Result<&str> {
        self.values
            .get(&normalize(name))
            .map(String::as_str)
            .ok_or_else(|| CoreError::MissingParameter(normalize(name)))
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.convert(name, "a number", |v| v.parse::<f64>().ok())
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.convert(name, "an integer", |v| v.parse::<i64>().ok())
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.convert(name, "true or false", |v| v.parse::<bool>().ok())
    }

    /// Non-empty value, or `None` when absent or empty.
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.values
            .get(&normalize(name))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Like [`get_f64`](Self::get_f64), but absent or empty is `Ok(None)`.
    /// A malformed value is still an error.
    pub fn optional_f64(&self, name: &str) -> Result<Option<f64>> {
        match self.optional(name) {
            Some(_) => self.get_f64(name).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.values.iter()
    }

    fn convert<T>(
        &self,
        name: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T> {
        let raw = self.get_string(name)?;
        parse(raw.trim()).ok_or_else(|| CoreError::Conversion {
            name: normalize(name),
            value: raw.to_string(),
            expected,
        })
    }
}

impl TryFrom<BTreeMap<String, String>> for TaskConfig {
    type Error = CoreError;

    /// Rejects maps whose keys collide once case-normalized.
    fn try_from(map: BTreeMap<String, String>) -> Result<Self> {
        let mut values = BTreeMap::new();
        for (key, value) in map {
            let name = normalize(&key);
            if values.insert(name.clone(), value).is_some() {
                return Err(CoreError::Validation {
                    name,
                    reason: "duplicate key after case normalization".to_string(),
                });
            }
        }
        Ok(Self { values })
    }
}

impl From<TaskConfig> for BTreeMap<String, String> {
    fn from(config: TaskConfig) -> Self {
        config.values
    }
}
