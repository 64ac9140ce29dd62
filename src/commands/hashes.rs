//! Hash command family (§4.4): `HSET`/`HGET`/`HGETALL` and friends.

use fred::interfaces::*;
use fred::types::{Key as DriverKey, Value as DriverValue};

use super::params;
use super::Driver;
use crate::error::{Error, Result};
use crate::value::{Reply, Value as Arg};

/// `HSET key field value [field value ...]`. Accepts the flat variadic
/// token vector and splits it into `(field, value)` pairs via
/// [`params::parse_field_value_pairs`], per §4.2's `MSET`/`HSET` note — the
/// single-object form is a caller-side concern, not a second code path here.
pub async fn hset<D: Driver>(driver: &D, key: DriverKey, tokens: &[Arg]) -> Result<i64> {
    let pairs = params::parse_field_value_pairs(tokens, "HSET")?;
    let pairs: Vec<(DriverValue, DriverValue)> = pairs.into_iter().map(|(f, v)| (f.into(), v.into())).collect();
    driver.hset(key, pairs).await.map_err(Error::from)
}

pub async fn hsetnx<D: Driver>(driver: &D, key: DriverKey, field: Arg, value: Arg) -> Result<bool> {
    driver.hsetnx(key, DriverValue::from(field), DriverValue::from(value)).await.map_err(Error::from)
}

pub async fn hget<D: Driver>(driver: &D, key: DriverKey, field: Arg) -> Result<Reply> {
    let result: DriverValue = driver.hget(key, DriverValue::from(field)).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn hmget<D: Driver>(driver: &D, key: DriverKey, fields: Vec<Arg>) -> Result<Reply> {
    let fields: Vec<DriverValue> = fields.into_iter().map(Into::into).collect();
    let result: DriverValue = driver.hmget(key, fields).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn hdel<D: Driver>(driver: &D, key: DriverKey, fields: Vec<Arg>) -> Result<i64> {
    let fields: Vec<DriverValue> = fields.into_iter().map(Into::into).collect();
    driver.hdel(key, fields).await.map_err(Error::from)
}

pub async fn hexists<D: Driver>(driver: &D, key: DriverKey, field: Arg) -> Result<Reply> {
    let result = driver.hexists(key, DriverValue::from(field)).await.map_err(Error::from)?;
    Ok(Reply::from_bool(result))
}

/// `HGETALL`: the Result Translator flattens the driver's map to
/// `[field, value, field, value, ...]` per §4.3, preserving bytes on buffer
/// paths — `flatten_map` in `commands::results` does the actual flattening.
pub async fn hgetall<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    let map: fred::types::Map = driver.hgetall(key).await.map_err(Error::from)?;
    Ok(Reply::Array(super::results::flatten_map(map)?))
}

pub async fn hkeys<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    let result: DriverValue = driver.hkeys(key).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn hvals<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    let result: DriverValue = driver.hvals(key).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn hlen<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.hlen(key).await.map_err(Error::from)
}

pub async fn hstrlen<D: Driver>(driver: &D, key: DriverKey, field: Arg) -> Result<i64> {
    driver.hstrlen(key, DriverValue::from(field)).await.map_err(Error::from)
}

pub async fn hincrby<D: Driver>(driver: &D, key: DriverKey, field: Arg, by: i64) -> Result<i64> {
    driver.hincrby(key, DriverValue::from(field), by).await.map_err(Error::from)
}

pub async fn hincrbyfloat<D: Driver>(driver: &D, key: DriverKey, field: Arg, by: f64) -> Result<f64> {
    driver.hincrbyfloat(key, DriverValue::from(field), by).await.map_err(Error::from)
}

/// `HRANDFIELD key [count [WITHVALUES]]` — supplemented feature (see
/// SPEC_FULL.md). `count < 0` is forwarded as-is; the driver enforces the
/// "may repeat" semantics negative counts imply.
pub async fn hrandfield<D: Driver>(driver: &D, key: DriverKey, count: Option<i64>, with_values: bool) -> Result<Reply> {
    let result: DriverValue = driver.hrandfield(key, count, with_values).await.map_err(Error::from)?;
    Reply::try_from(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_exists_becomes_integer_reply() {
        assert_eq!(Reply::from_bool(true), Reply::Integer(1));
        assert_eq!(Reply::from_bool(false), Reply::Integer(0));
    }
}
