//! Goal construction from YAML strings.
//!
//! The same convenience `rostopic pub` offers: a goal can be written as
//! a partial YAML mapping and is completed with the message defaults.

use serde::{de::DeserializeOwned, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::Error;

/// Builds a goal message of type `T` from `text`.
///
/// The document must be a mapping, or empty for `T::default()`. Fields
/// left out keep their defaults; nested mappings merge field by field;
/// scalars and sequences replace the default wholesale. A key that does
/// not name a field of `T` is rejected.
pub fn goal_from_yaml<T>(text: &str) -> Result<T, Error>
where
    T: rosrust::Message + Serialize + DeserializeOwned,
{
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    let patch: Value = serde_yaml::from_str(text)?;
    if !patch.is_mapping() {
        return Err(Error::GoalYamlNotAMapping(value_kind(&patch)));
    }
    let defaults = serde_yaml::to_value(T::default())?;
    let merged = merge_value(defaults, patch)?;
    Ok(serde_yaml::from_value(merged)?)
}

fn merge_value(base: Value, patch: Value) -> Result<Value, Error> {
    match (base, patch) {
        (Value::Mapping(base), Value::Mapping(patch)) => {
            merge_mapping(base, patch).map(Value::Mapping)
        }
        (_, patch) => Ok(patch),
    }
}

fn merge_mapping(mut base: Mapping, patch: Mapping) -> Result<Mapping, Error> {
    for (key, value) in patch {
        match base.remove(&key) {
            Some(existing) => {
                let merged = merge_value(existing, value)?;
                base.insert(key, merged);
            }
            None => return Err(Error::UnknownGoalField(field_name(&key))),
        }
    }
    Ok(base)
}

fn field_name(key: &Value) -> String {
    match key.as_str() {
        Some(name) => name.to_owned(),
        None => format!("{key:?}"),
    }
}

fn value_kind(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
    .to_owned()
}
