//! `key=value` arguments from the command line.

use serde_json::Value;
use winext_types::{
    args::{ArgValue, InvocationArgs},
    grains::Grains,
    ExtError, Result,
};

/// Interpret a command-line value: `true`/`false` in any case, integers,
/// JSON objects and arrays; everything else stays a string.
pub fn parse_value(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if raw.starts_with('{') || raw.starts_with('[') {
        if let Ok(v) = serde_json::from_str(raw) {
            return v;
        }
    }
    Value::String(raw.to_string())
}

pub fn split_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(ExtError::InvalidArgument(format!("expected KEY=VALUE, got '{}'", pair))),
    }
}

pub fn parse_kwargs(pairs: &[String]) -> Result<InvocationArgs> {
    let mut args = InvocationArgs::new();
    for pair in pairs {
        let (key, value) = split_pair(pair)?;
        args.set(key, ArgValue::from_json(parse_value(value))?);
    }
    Ok(args)
}

/// Grain overrides are kept as strings; release tags like `10` must not
/// turn into numbers.
pub fn parse_grain_overrides(pairs: &[String]) -> Result<Grains> {
    let mut grains = Grains::new();
    for pair in pairs {
        let (key, value) = split_pair(pair)?;
        grains.set(key, value);
    }
    Ok(grains)
}
