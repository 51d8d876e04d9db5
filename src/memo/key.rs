//! Cache Key Module
//!
//! Derives stable, type-preserving cache keys from function arguments.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::MemoError;

// == Cache Key ==
/// Key identifying one argument tuple within a single memoized function.
///
/// Built from the structural serialization of the arguments, so `(1, "2")`
/// and `("1", 2)` produce different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key from `args` on behalf of `function`.
    ///
    /// Fails with [`MemoError::KeyDerivation`] when the arguments have no
    /// structural representation (for example a map keyed by tuples).
    pub fn derive<A>(function: &str, args: &A) -> Result<Self, MemoError>
    where
        A: Serialize + ?Sized,
    {
        let value = serde_json::to_value(args).map_err(|e| MemoError::KeyDerivation {
            function: function.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(canonicalize(value).to_string()))
    }

    /// The encoded form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sorts object keys recursively so HashMap arguments encode the same way
/// regardless of iteration order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
