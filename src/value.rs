//! The Value/Key Normalizer (§4.1) and the dynamic legacy return shape of
//! §3/§4.3.
//!
//! User-supplied keys and values arrive as strings, numbers, or byte
//! buffers; they are normalized here into `fred`'s own `Key`/`Value` types
//! before any driver call, and driver results are converted back the other
//! way for callers that want the legacy dynamic shape rather than a typed
//! extraction via `fred`'s `FromValue`.

use bytes::Bytes;
use fred::types::{Key as DriverKey, Value as DriverValue};

use crate::error::{Error, Result};

/// A user-supplied key, prior to normalization.
///
/// Binary-safe paths (`Bytes`) never round-trip through UTF-8; string paths
/// use the driver's native string encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Str(String),
    Bytes(Bytes),
}

impl Key {
    pub fn is_empty(&self) -> bool {
        match self {
            Key::Str(s) => s.is_empty(),
            Key::Bytes(b) => b.is_empty(),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<Bytes> for Key {
    fn from(b: Bytes) -> Self {
        Key::Bytes(b)
    }
}

impl From<Vec<u8>> for Key {
    fn from(b: Vec<u8>) -> Self {
        Key::Bytes(Bytes::from(b))
    }
}

impl From<Key> for DriverKey {
    fn from(key: Key) -> Self {
        match key {
            Key::Str(s) => DriverKey::from(s),
            Key::Bytes(b) => DriverKey::from(b),
        }
    }
}

/// Lets a raw legacy argument double as a key — needed by the command
/// surface's variadic-token parsers (§4.2), where e.g. `BLPOP k1 k2 timeout`
/// arrives as a single `Arg` slice and the key positions aren't known to be
/// keys until the trailing timeout is split off.
impl From<Value> for DriverKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Str(s) => DriverKey::from(s),
            Value::Bytes(b) => DriverKey::from(b),
            Value::Int(n) => DriverKey::from(n.to_string()),
            Value::Double(n) => DriverKey::from(stringify_double(n)),
            Value::Json(v) => DriverKey::from(v.to_string()),
        }
    }
}

/// Normalizes an optional user-supplied key, failing with `InvalidKey` when
/// absent. Mirrors the "`null`/`undefined` keys fail immediately" invariant
/// of §3.
pub fn normalize_key(key: Option<impl Into<Key>>) -> Result<DriverKey> {
    match key {
        Some(k) => Ok(k.into().into()),
        None => Err(Error::InvalidKey),
    }
}

/// `SET` (and anything else the per-command-family note in §4.2 calls out)
/// rejects an empty key explicitly, distinct from a missing one.
pub fn reject_empty_key(key: &Key) -> Result<()> {
    if key.is_empty() {
        Err(Error::InvalidKey)
    } else {
        Ok(())
    }
}

/// A user-supplied value. Numbers are stringified with the platform's
/// shortest round-trip decimal representation before being handed to the
/// driver, matching the "no scientific notation unless unavoidable" rule
/// of §4.1.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bytes(Bytes),
    Int(i64),
    Double(f64),
    /// An object/array argument, e.g. to a `defineCommand` script. §4.6
    /// requires these be JSON-stringified before reaching the driver —
    /// the legacy client accepts a plain JS object anywhere a string
    /// argument is expected and serializes it on the way out.
    Json(serde_json::Value),
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<Value> for DriverValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Str(s) => DriverValue::from(s),
            Value::Bytes(b) => DriverValue::from(b),
            Value::Int(n) => DriverValue::from(n),
            Value::Double(n) => DriverValue::from(stringify_double(n)),
            Value::Json(v) => DriverValue::from(v.to_string()),
        }
    }
}

/// Shortest round-trip decimal representation, with `inf`/`-inf` tokens for
/// the infinities, per §4.1 and the `WITHSCORES` rule of §3.
pub fn stringify_double(n: f64) -> String {
    if n.is_infinite() {
        if n.is_sign_positive() { "inf".to_string() } else { "-inf".to_string() }
    } else if n == n.trunc() && n.abs() < 1e17 {
        format!("{}", n as i64)
    } else {
        let mut s = format!("{n}");
        if s.contains(['e', 'E']) {
            // format! on f64 avoids scientific notation for all finite,
            // non-trunc values in the ranges this adapter deals with, but
            // guard against it anyway per the "no scientific notation
            // unless unavoidable" rule.
            s = format!("{n:.17}");
            s = trim_trailing_zeros(&s);
        }
        s
    }
}

fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0');
    let trimmed = trimmed.trim_end_matches('.');
    trimmed.to_string()
}

/// The dynamic legacy reply shape of §3/§4.3: driver results are flattened
/// into this before being handed back to a caller that wants the ioredis
/// shape rather than a typed `fred` extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Null,
    Integer(i64),
    /// A decimal string, already through `stringify_double`/infinity tokens.
    Double(String),
    Bulk(Bytes),
    Simple(String),
    Array(Vec<Reply>),
    Map(Vec<(Reply, Reply)>),
}

impl Reply {
    pub fn as_bulk_string(&self) -> Option<String> {
        match self {
            Reply::Bulk(b) => String::from_utf8(b.to_vec()).ok(),
            Reply::Simple(s) => Some(s.clone()),
            Reply::Double(s) => Some(s.clone()),
            Reply::Integer(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Booleans surfaced by the driver as 0/1 integers per the
    /// `EXISTS`/`HEXISTS`/`SISMEMBER`/`SCRIPT EXISTS` rule of §4.3.
    pub fn from_bool(b: bool) -> Self {
        Reply::Integer(if b { 1 } else { 0 })
    }
}

impl From<DriverKey> for Reply {
    fn from(key: DriverKey) -> Self {
        Reply::Bulk(key.into_bytes())
    }
}

impl TryFrom<DriverValue> for Reply {
    type Error = Error;

    fn try_from(value: DriverValue) -> Result<Self> {
        Ok(match value {
            DriverValue::Null => Reply::Null,
            DriverValue::Integer(n) => Reply::Integer(n),
            DriverValue::Double(n) => Reply::Double(stringify_double(n)),
            DriverValue::Boolean(b) => Reply::from_bool(b),
            DriverValue::String(s) => Reply::Bulk(Bytes::copy_from_slice(s.as_bytes())),
            DriverValue::Bytes(b) => Reply::Bulk(b),
            DriverValue::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(Reply::try_from(item)?);
                }
                Reply::Array(out)
            }
            DriverValue::Set(set) => {
                let mut out = Vec::new();
                for item in set.into_iter() {
                    out.push(Reply::try_from(item)?);
                }
                Reply::Array(out)
            }
            DriverValue::Map(map) => {
                let mut out = Vec::with_capacity(map.len());
                for (k, v) in map.into_iter() {
                    out.push((Reply::from(k), Reply::try_from(v)?));
                }
                Reply::Map(out)
            }
            DriverValue::Queued => Reply::Simple("QUEUED".to_string()),
        })
    }
}

/// Lets pipeline/transaction `exec` paths ask `fred` for `Vec<Reply>`/
/// `Result<Reply, _>` directly (`pipeline.try_all::<Reply>()`, mirroring the
/// driver's own `Value::convert::<T>()` pattern exercised in
/// `examples/apollographql-router/fred/tests/integration/other/mod.rs`'s `should_smoke_test_from_value_impl`),
/// instead of threading a second conversion step through every call site.
impl fred::types::FromValue for Reply {
    fn from_value(value: DriverValue) -> std::result::Result<Self, fred::error::Error> {
        Reply::try_from(value).map_err(|_| {
            fred::error::Error::new(fred::error::ErrorKind::InvalidArgument, "could not convert reply")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringifies_integral_doubles_without_decimal_point() {
        assert_eq!(stringify_double(2.0), "2");
        assert_eq!(stringify_double(-5.0), "-5");
    }

    #[test]
    fn stringifies_infinities_as_tokens() {
        assert_eq!(stringify_double(f64::INFINITY), "inf");
        assert_eq!(stringify_double(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn stringifies_fractional_doubles() {
        assert_eq!(stringify_double(1.5), "1.5");
        assert_eq!(stringify_double(0.1), "0.1");
    }

    #[test]
    fn empty_key_is_detected() {
        assert!(Key::from("").is_empty());
        assert!(!Key::from("a").is_empty());
    }

    #[test]
    fn missing_key_is_invalid() {
        let k: Option<Key> = None;
        assert!(matches!(normalize_key(k), Err(Error::InvalidKey)));
    }

    #[test]
    fn json_value_is_stringified_before_reaching_the_driver() {
        let value = Value::from(serde_json::json!({"a": 1}));
        let driver_value: DriverValue = value.into();
        assert_eq!(driver_value.as_str().unwrap().to_string(), "{\"a\":1}".to_string());
    }
}
