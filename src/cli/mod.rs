//! Command line helpers and the interactive chat console

pub mod console;

use serde_json::Value;

use crate::agent::ContextMap;
use crate::error::{OperoError, OperoResult};

/// Parse `key=value` pairs into task parameters.
///
/// Values that parse as JSON (numbers, booleans, quoted strings, arrays) keep
/// their type; anything else is taken as a plain string.
pub fn parse_params<S: AsRef<str>>(pairs: &[S]) -> OperoResult<ContextMap> {
    let mut params = ContextMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| OperoError::InvalidInput(format!("expected key=value, got '{}'", pair)))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(OperoError::InvalidInput(format!("empty key in '{}'", pair)));
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        params.insert(key.to_string(), value);
    }
    Ok(params)
}
