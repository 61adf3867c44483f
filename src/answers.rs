//! Raw answer sets.
//! Answers arrive from files, stdin, `--set` overrides or interactive prompts and
//! are kept exactly as given; interpretation happens in [`crate::context`].

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Separators accepted between a group name and a member in flattened keys,
/// e.g. `register_to_models__project` or `register_to_models.project`.
const GROUP_SEPARATORS: [&str; 2] = ["__", "."];

/// Ordered mapping of answer keys to scalar values or nested groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(IndexMap<String, serde_json::Value>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an answer set, trying JSON first and YAML second.
    ///
    /// # Errors
    /// * `Error::AnswersError` if the content is neither, or is not a mapping
    pub fn parse(content: &str) -> Result<Self> {
        let raw: serde_json::Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(_) => serde_yaml::from_str(content)
                .map_err(|e| Error::AnswersError(format!("invalid answers format: {e}")))?,
        };

        let serde_json::Value::Object(map) = raw else {
            return Err(Error::AnswersError("answers must be a mapping of keys to values".into()));
        };

        let mut answers = Self::new();
        for (key, value) in map {
            answers.insert(key, value);
        }
        Ok(answers)
    }

    /// Reads and parses an answers file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading answers from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::AnswersError(format!("cannot read '{}': {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Reads an answer set from a reader such as stdin. Blank input is an empty set.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buffer = String::new();
        reader.read_to_string(&mut buffer)?;
        if buffer.trim().is_empty() {
            return Ok(Self::new());
        }
        Self::parse(&buffer)
    }

    /// Parses a `KEY=VALUE` override. Values are always taken as strings.
    pub fn set_pair(&mut self, pair: &str) -> Result<()> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::AnswersError(format!("expected KEY=VALUE, got '{pair}'")))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::AnswersError(format!("missing key in '{pair}'")));
        }
        self.insert(key, serde_json::Value::String(value.to_string()));
        Ok(())
    }

    /// Inserts an answer, folding flattened group keys into their group.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: serde_json::Value) {
        let key = key.into();
        if let Some((group, member)) = split_group_key(&key) {
            let entry = self
                .0
                .entry(group.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if !entry.is_object() {
                *entry = serde_json::Value::Object(serde_json::Map::new());
            }
            if let serde_json::Value::Object(members) = entry {
                members.insert(member.to_string(), value);
            }
            return;
        }

        if let serde_json::Value::Object(incoming) = value {
            for (member, member_value) in incoming {
                self.insert(format!("{key}.{member}"), member_value);
            }
            return;
        }
        self.0.insert(key, value);
    }

    /// Applies every answer from `other` on top of this set.
    pub fn merge(&mut self, other: Answers) {
        for (key, value) in other.0 {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        match split_group_key(key) {
            Some((group, member)) => self.0.get(group).and_then(|g| g.get(member)),
            None => self.0.get(key),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_null())
    }

    /// The answer set as a JSON object, used as a rendering context for prompt defaults.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.0.clone().into_iter().collect())
    }
}

fn split_group_key(key: &str) -> Option<(&str, &str)> {
    GROUP_SEPARATORS
        .iter()
        .find_map(|separator| key.split_once(separator))
        .filter(|(group, member)| !group.is_empty() && !member.is_empty())
}
