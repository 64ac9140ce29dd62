//! The Result Translator (§4.3): driver replies reshaped into the legacy
//! flat-array/record shapes callers expect — `WITHSCORES` flattening,
//! `HGETALL` records, stream entries, boolean-as-0/1, and so on.

use fred::types::Value as DriverValue;

use crate::error::Result;
use crate::value::Reply;

/// `ZRANGE ... WITHSCORES` and friends: `[member, score, member, score,
/// ...]`, each score already stringified per §4.1's double rules.
pub fn flatten_with_scores(pairs: Vec<(DriverValue, f64)>) -> Result<Vec<Reply>> {
    let mut out = Vec::with_capacity(pairs.len() * 2);
    for (member, score) in pairs {
        out.push(Reply::try_from(member)?);
        out.push(Reply::Double(crate::value::stringify_double(score)));
    }
    Ok(out)
}

/// `HGETALL`/`CONFIG GET`: a driver map becomes an alternating
/// `[field, value, field, value, ...]` vector, not the `Reply::Map` used for
/// pipelines' own transaction reporting.
pub fn flatten_map(map: fred::types::Map) -> Result<Vec<Reply>> {
    let mut out = Vec::with_capacity(map.len() * 2);
    for (k, v) in map.into_iter() {
        out.push(Reply::from(k));
        out.push(Reply::try_from(v)?);
    }
    Ok(out)
}

/// A single `XRANGE`/`XREVRANGE`/`XREAD` stream entry: `[id, [field, value,
/// ...]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEntry {
    pub id: String,
    pub fields: Vec<Reply>,
}

impl StreamEntry {
    pub fn into_reply(self) -> Reply {
        Reply::Array(vec![Reply::Simple(self.id), Reply::Array(self.fields)])
    }
}

/// A stream's worth of entries under its key, as `XREAD` returns them:
/// `[streamKey, [entry, entry, ...]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamReply {
    pub key: String,
    pub entries: Vec<StreamEntry>,
}

impl StreamReply {
    pub fn into_reply(self) -> Reply {
        Reply::Array(vec![
            Reply::Simple(self.key),
            Reply::Array(self.entries.into_iter().map(StreamEntry::into_reply).collect()),
        ])
    }
}

/// `EXISTS`/`HEXISTS`/`SISMEMBER`/`SCRIPT EXISTS`/`EXPIRE`/etc.: the driver
/// returns a Redis-protocol integer 0/1 that the legacy client surfaces as
/// the same 0/1 integer, not a Rust `bool` — so this is a direct passthrough
/// rather than a `true`/`false` translation, matching the "looks numeric,
/// stays numeric" rule in §4.3.
pub fn passthrough_bool_as_integer(value: bool) -> Reply {
    Reply::from_bool(value)
}

/// `TTL`/`PTTL`: the driver already returns `-2` (no key) / `-1` (no expiry)
/// / the remaining duration as a plain integer — passed through unchanged,
/// called out explicitly here because it's a common point where adapters
/// are tempted to remap `-1`/`-2` into `null` and shouldn't.
pub fn passthrough_ttl(n: i64) -> Reply {
    Reply::Integer(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_with_scores_pairs() {
        let pairs = vec![(DriverValue::from("a"), 1.0), (DriverValue::from("b"), 2.5)];
        let flat = flatten_with_scores(pairs).unwrap();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat[1], Reply::Double("1".to_string()));
        assert_eq!(flat[3], Reply::Double("2.5".to_string()));
    }

    #[test]
    fn ttl_minus_two_passes_through_unchanged() {
        assert_eq!(passthrough_ttl(-2), Reply::Integer(-2));
    }

    #[test]
    fn stream_entry_shape_is_id_then_field_array() {
        let entry = StreamEntry { id: "1-0".to_string(), fields: vec![Reply::Bulk("v".into())] };
        let reply = entry.into_reply();
        match reply {
            Reply::Array(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0], Reply::Simple("1-0".to_string()));
            }
            _ => panic!("expected array"),
        }
    }
}
