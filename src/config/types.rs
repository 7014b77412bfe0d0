//! Declaration file types
//!
//! This module defines the data structures that represent a paquefile: a mapping
//! from task name to task body.

use serde::de::Error as _;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// Top-level declaration file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Config {
    /// Tasks keyed by name
    pub tasks: HashMap<String, TaskDef>,
}

/// A task declaration as authored
///
/// A body is either a mapping of sections or a list of single-section mappings:
///
/// ```yaml
/// build:
///   depends: [fetch]
///   run: make
/// fetch:
///   - run: git pull
///   - message: fetched
/// ```
///
/// In the list form the first occurrence of a section wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct TaskDef {
    /// Command text, list entries joined with newlines
    pub run: Option<String>,

    /// Shell predicate guarding `run`
    pub condition: Option<String>,

    /// Message to emit once the task ran
    pub message: Option<String>,

    /// Seconds to sleep, kept textual until the plan is executed
    pub sleep: Option<String>,

    /// Dependency references: `name` or `name key:value ...`
    pub depends: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Sections {
    #[serde(default, deserialize_with = "deserialize_run")]
    run: Option<String>,

    #[serde(default, deserialize_with = "deserialize_condition")]
    condition: Option<String>,

    #[serde(default, deserialize_with = "deserialize_message")]
    message: Option<String>,

    #[serde(default, deserialize_with = "deserialize_sleep")]
    sleep: Option<String>,

    #[serde(default, deserialize_with = "deserialize_depends")]
    depends: Vec<String>,
}

impl TryFrom<Value> for TaskDef {
    type Error = serde_yaml::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let sections = match value {
            Value::Null => Mapping::new(),
            Value::Mapping(mapping) => mapping,
            Value::Sequence(seq) => merge_sections(seq)?,
            _ => {
                return Err(serde_yaml::Error::custom(
                    "a task must be a mapping or a list of sections",
                ))
            }
        };

        let sections = Sections::deserialize(Value::Mapping(sections))?;

        Ok(TaskDef {
            run: sections.run,
            condition: sections.condition,
            message: sections.message,
            sleep: sections.sleep,
            depends: sections.depends,
        })
    }
}

/// Flatten `[{run: ..}, {depends: ..}]` into one mapping, keeping the first
/// occurrence of every section
fn merge_sections(seq: Vec<Value>) -> Result<Mapping, serde_yaml::Error> {
    let mut merged = Mapping::new();

    for item in seq {
        let Value::Mapping(section) = item else {
            return Err(serde_yaml::Error::custom(
                "each entry of a task list must be a section mapping",
            ));
        };
        for (key, value) in section {
            if !merged.contains_key(&key) {
                merged.insert(key, value);
            }
        }
    }

    Ok(merged)
}

/// Accept a string or a list of strings, joining lists with newlines
fn text_section<E: serde::de::Error>(section: &str, value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Sequence(seq) => {
            let mut lines = Vec::with_capacity(seq.len());
            for item in seq {
                match item {
                    Value::String(line) => lines.push(line),
                    _ => {
                        return Err(E::custom(format!(
                            "{} section should only contain a string or list of strings",
                            section
                        )))
                    }
                }
            }
            Ok(Some(lines.join("\n")))
        }
        _ => Err(E::custom(format!(
            "{} section should only contain a string or list of strings",
            section
        ))),
    }
}

fn deserialize_run<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    text_section("run", Value::deserialize(deserializer)?)
}

fn deserialize_condition<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    text_section("condition", Value::deserialize(deserializer)?)
}

fn deserialize_message<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    text_section("message", Value::deserialize(deserializer)?)
}

/// Sleep is an integer or a string to be interpolated by arguments
fn deserialize_sleep<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) if n.is_u64() => Ok(Some(n.to_string())),
        _ => Err(D::Error::custom(
            "sleep section should only contain non-negative integers or strings (to be interpolated by arguments)",
        )),
    }
}

fn deserialize_depends<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let invalid = || {
        D::Error::custom(
            "depends section should only contain a list of strings (if only one dependency, write it as a list)",
        )
    };

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                Value::String(reference) => Ok(reference),
                _ => Err(invalid()),
            })
            .collect(),
        _ => Err(invalid()),
    }
}
