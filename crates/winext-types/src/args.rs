//! Keyword arguments passed to module functions.
//!
//! Values are a closed set of variants so that flag rendering can dispatch on
//! the variant instead of inspecting runtime types.

use std::fmt;

use serde_json::{Map, Value};

use crate::{ExtError, Result};

/// Username/password pair rendered as a PSCredential construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A single keyword argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Credential(Credential),
    /// Floats, lists and mappings without a `username` key
    Other(Value),
}

impl ArgValue {
    /// Convert a JSON value into an argument.
    ///
    /// Any object carrying a `username` key is a credential and must also
    /// carry a string `password`.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(ArgValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(ArgValue::Int(i)),
                None => Ok(ArgValue::Other(Value::Number(n))),
            },
            Value::String(s) => Ok(ArgValue::Str(s)),
            Value::Object(map) if map.contains_key("username") => credential_from_map(&map),
            other => Ok(ArgValue::Other(other)),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

fn credential_from_map(map: &Map<String, Value>) -> Result<ArgValue> {
    let username = map
        .get("username")
        .and_then(Value::as_str)
        .ok_or_else(|| ExtError::InvalidArgument("credential username must be a string".to_string()))?;
    let password = map
        .get("password")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ExtError::InvalidArgument(format!("credential for '{}' is missing a password", username))
        })?;
    Ok(ArgValue::Credential(Credential {
        username: username.to_string(),
        password: password.to_string(),
    }))
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<i32> for ArgValue {
    fn from(i: i32) -> Self {
        ArgValue::Int(i64::from(i))
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<Credential> for ArgValue {
    fn from(c: Credential) -> Self {
        ArgValue::Credential(c)
    }
}

/// Ordered keyword arguments. Iteration follows insertion order; setting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationArgs {
    entries: Vec<(String, ArgValue)>,
}

impl InvocationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<ArgValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<ArgValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ArgValue::as_str)
    }

    /// Read a list of strings. A single string counts as a one-element list.
    pub fn get_string_list(&self, key: &str) -> Result<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(ArgValue::Str(s)) => Ok(vec![s.clone()]),
            Some(ArgValue::Other(Value::Array(items))) => items
                .iter()
                .map(|item| {
                    item.as_str().map(ToString::to_string).ok_or_else(|| {
                        ExtError::InvalidArgument(format!("{}: expected a list of strings", key))
                    })
                })
                .collect(),
            Some(_) => Err(ExtError::InvalidArgument(format!(
                "{}: expected a string or a list of strings",
                key
            ))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
