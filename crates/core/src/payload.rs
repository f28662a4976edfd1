//! Diagnostic payloads and content hashing
//!
//! A diagnostic payload is an opaque JSON value (a `GenericSet` of owners, a
//! bug component, a grouping key...). Two payloads are the same diagnostic when
//! their content is equal, regardless of the guid the uploader minted for them.
//!
//! ## Content hash
//!
//! Each payload carries a 128-bit xxh3 hash computed once at construction:
//! - object members are hashed in key order, so member order never matters
//! - the top-level `"guid"` member is skipped, so re-minted guids never matter
//! - every value is prefixed with a type tag, so `"1"` and `1` differ
//!
//! Equality, hashing and merge decisions all compare the content hash only.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use xxhash_rust::xxh3::Xxh3;

/// Member name excluded from content hashing
const GUID_MEMBER: &str = "guid";

/// Stable content hash of a diagnostic payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(u128);

impl ContentHash {
    /// Hash a JSON value
    pub fn of(value: &Value) -> Self {
        let mut hasher = Xxh3::new();
        hash_value(&mut hasher, value, true);
        ContentHash(hasher.digest128())
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

fn hash_value(hasher: &mut Xxh3, value: &Value, top_level: bool) {
    match value {
        Value::Null => hasher.update(&[0]),
        Value::Bool(b) => hasher.update(&[1, *b as u8]),
        Value::Number(n) => {
            hasher.update(&[2]);
            hash_str(hasher, &n.to_string());
        }
        Value::String(s) => {
            hasher.update(&[3]);
            hash_str(hasher, s);
        }
        Value::Array(items) => {
            hasher.update(&[4]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                hash_value(hasher, item, false);
            }
        }
        Value::Object(map) => {
            let mut members: Vec<(&String, &Value)> = map
                .iter()
                .filter(|(k, _)| !(top_level && k.as_str() == GUID_MEMBER))
                .collect();
            members.sort_by(|(a, _), (b, _)| a.cmp(b));

            hasher.update(&[5]);
            hasher.update(&(members.len() as u64).to_le_bytes());
            for (key, member) in members {
                hash_str(hasher, key);
                hash_value(hasher, member, false);
            }
        }
    }
}

fn hash_str(hasher: &mut Xxh3, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

/// Diagnostic content plus its content hash
///
/// Serializes transparently as the underlying JSON value; the hash is
/// recomputed on deserialization.
///
/// # Example
///
/// ```
/// use diagstore_core::DiagnosticPayload;
/// use serde_json::json;
///
/// let a = DiagnosticPayload::new(json!({"type": "GenericSet", "guid": "1", "values": ["a"]}));
/// let b = DiagnosticPayload::new(json!({"values": ["a"], "guid": "2", "type": "GenericSet"}));
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct DiagnosticPayload {
    value: Value,
    hash: ContentHash,
}

impl DiagnosticPayload {
    /// Wrap a JSON value, computing its content hash
    pub fn new(value: Value) -> Self {
        let hash = ContentHash::of(&value);
        Self { value, hash }
    }

    /// Parse a payload from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::new(value))
    }

    /// The JSON content
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The precomputed content hash
    #[inline]
    pub fn content_hash(&self) -> ContentHash {
        self.hash
    }

    /// Check that the payload is a usable diagnostic
    ///
    /// A diagnostic must be a non-empty JSON object.
    pub fn validate(&self) -> Result<()> {
        match &self.value {
            Value::Object(map) if map.is_empty() => {
                Err(Error::Validation("diagnostic payload is an empty object".into()))
            }
            Value::Object(_) => Ok(()),
            other => Err(Error::Validation(format!(
                "diagnostic payload must be a JSON object, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Check if the payload is a usable diagnostic
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl PartialEq for DiagnosticPayload {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for DiagnosticPayload {}

impl std::hash::Hash for DiagnosticPayload {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl From<Value> for DiagnosticPayload {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<DiagnosticPayload> for Value {
    fn from(payload: DiagnosticPayload) -> Self {
        payload.value
    }
}
