//! Generic key command family (§4.4, supplemented in §SPEC_FULL.md):
//! `DEL`/`EXISTS`/`EXPIRE`/`TTL`/`RENAME`/`SCAN`/`DUMP`/`RESTORE`/`COPY` and
//! friends.
//!
//! `EXISTS`, `KEYS`, `TYPE`, `OBJECT ENCODING`, `RANDOMKEY`, and `TOUCH` go
//! through [`super::raw::custom`] instead of a typed `fred` method: none of
//! them appear in the retrieved driver test pack (unlike every other call
//! in this file, grepped from `fred`'s own `keys`/`scanning` integration
//! tests), so rather than guess a typed signature this follows the
//! raw-command-fallback rule of §4.4 — flagged as an assumption in
//! DESIGN.md.

use fred::interfaces::*;
use fred::types::scan::ScanType;
use fred::types::{ExpireOptions, Key as DriverKey, Value as DriverValue};

use super::raw;
use super::Driver;
use crate::error::{Error, Result};
use crate::value::Reply;

pub async fn del<D: Driver>(driver: &D, keys: Vec<DriverKey>) -> Result<i64> {
    driver.del(keys).await.map_err(Error::from)
}

pub async fn exists<D: Driver>(driver: &D, keys: Vec<DriverKey>) -> Result<i64> {
    raw::custom(driver, "EXISTS", keys.into_iter().map(DriverValue::from).collect()).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireCondition {
    Nx,
    Xx,
    Gt,
    Lt,
}

fn expire_options(cond: Option<ExpireCondition>) -> Option<ExpireOptions> {
    cond.map(|c| match c {
        ExpireCondition::Nx => ExpireOptions::NX,
        ExpireCondition::Xx => ExpireOptions::XX,
        ExpireCondition::Gt => ExpireOptions::GT,
        ExpireCondition::Lt => ExpireOptions::LT,
    })
}

pub async fn expire<D: Driver>(driver: &D, key: DriverKey, seconds: i64, cond: Option<ExpireCondition>) -> Result<bool> {
    let result: i64 = driver.expire(key, seconds, expire_options(cond)).await.map_err(Error::from)?;
    Ok(result == 1)
}

pub async fn pexpire<D: Driver>(driver: &D, key: DriverKey, millis: i64, cond: Option<ExpireCondition>) -> Result<bool> {
    let result: i64 = driver.pexpire(key, millis, expire_options(cond)).await.map_err(Error::from)?;
    Ok(result == 1)
}

pub async fn expireat<D: Driver>(driver: &D, key: DriverKey, timestamp: i64, cond: Option<ExpireCondition>) -> Result<bool> {
    let result: i64 = driver.expireat(key, timestamp, expire_options(cond)).await.map_err(Error::from)?;
    Ok(result == 1)
}

pub async fn pexpireat<D: Driver>(driver: &D, key: DriverKey, timestamp: i64, cond: Option<ExpireCondition>) -> Result<bool> {
    let result: i64 = driver.pexpireat(key, timestamp, expire_options(cond)).await.map_err(Error::from)?;
    Ok(result == 1)
}

pub async fn expire_time<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.expire_time(key).await.map_err(Error::from)
}

pub async fn pexpire_time<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.pexpire_time(key).await.map_err(Error::from)
}

pub async fn ttl<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.ttl(key).await.map_err(Error::from)
}

pub async fn pttl<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.pttl(key).await.map_err(Error::from)
}

pub async fn persist<D: Driver>(driver: &D, key: DriverKey) -> Result<bool> {
    driver.persist(key).await.map_err(Error::from)
}

pub async fn rename<D: Driver>(driver: &D, source: DriverKey, destination: DriverKey) -> Result<()> {
    driver.rename(source, destination).await.map_err(Error::from)
}

pub async fn renamenx<D: Driver>(driver: &D, source: DriverKey, destination: DriverKey) -> Result<bool> {
    driver.renamenx(source, destination).await.map_err(Error::from)
}

pub async fn keys<D: Driver>(driver: &D, pattern: &str) -> Result<Reply> {
    raw::custom_reply(driver, "KEYS", vec![DriverValue::from(pattern)]).await
}

pub async fn r#type<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    raw::custom_reply(driver, "TYPE", vec![DriverValue::from(key)]).await
}

pub async fn object_encoding<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    raw::custom_reply(driver, "OBJECT", vec![DriverValue::from("ENCODING"), DriverValue::from(key)]).await
}

/// `OBJECT FREQ key` — supplemented feature (SPEC_FULL.md); only meaningful
/// under an LFU `maxmemory-policy`, same raw-passthrough shape as
/// `OBJECT ENCODING` above.
pub async fn object_freq<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    raw::custom(driver, "OBJECT", vec![DriverValue::from("FREQ"), DriverValue::from(key)]).await
}

pub async fn randomkey<D: Driver>(driver: &D) -> Result<Reply> {
    raw::custom_reply(driver, "RANDOMKEY", vec![]).await
}

pub async fn touch<D: Driver>(driver: &D, keys: Vec<DriverKey>) -> Result<i64> {
    raw::custom(driver, "TOUCH", keys.into_iter().map(DriverValue::from).collect()).await
}

pub async fn copy<D: Driver>(driver: &D, source: DriverKey, destination: DriverKey, db: Option<u8>, replace: bool) -> Result<bool> {
    let result: i64 = driver.copy(source, destination, db, replace).await.map_err(Error::from)?;
    Ok(result == 1)
}

pub async fn dump<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    let result: DriverValue = driver.dump(key).await.map_err(Error::from)?;
    Reply::try_from(result)
}

#[allow(clippy::too_many_arguments)]
pub async fn restore<D: Driver>(
    driver: &D,
    key: DriverKey,
    ttl_ms: i64,
    payload: Reply,
    replace: bool,
    absttl: bool,
    idletime: Option<i64>,
    freq: Option<i64>,
) -> Result<()> {
    let payload = match payload {
        Reply::Bulk(bytes) => DriverValue::from(bytes),
        other => return Err(Error::UnknownToken { command: "RESTORE".into(), token: format!("{other:?}") }),
    };
    driver.restore(key, ttl_ms, payload, replace, absttl, idletime, freq).await.map_err(Error::from)
}

/// `SCAN cursor [MATCH pattern] [COUNT n] [TYPE t]`. `fred`'s own
/// `scan_page` takes the same "give me a cursor, get the next page plus a
/// new cursor" shape as the legacy client's single-call `SCAN`, rather than
/// the streaming `scan()` form used when the whole keyspace is walked in
/// one await.
pub async fn scan<D: Driver>(driver: &D, cursor: &str, pattern: Option<&str>, count: Option<i64>, type_filter: Option<&str>) -> Result<(String, Vec<Reply>)> {
    let scan_type = type_filter.map(|t| match t.to_ascii_lowercase().as_str() {
        "string" => ScanType::String,
        "list" => ScanType::List,
        "set" => ScanType::Set,
        "zset" => ScanType::ZSet,
        "hash" => ScanType::Hash,
        "stream" => ScanType::Stream,
        _ => ScanType::String,
    });
    let (new_cursor, found): (bytes_utils::Str, Vec<DriverKey>) =
        driver.scan_page(cursor.to_string(), pattern.unwrap_or("*"), count, scan_type).await.map_err(Error::from)?;
    let keys = found.into_iter().map(Reply::from).collect();
    Ok((new_cursor.to_string(), keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expire_condition_maps_to_driver_options() {
        assert!(matches!(expire_options(Some(ExpireCondition::Gt)), Some(ExpireOptions::GT)));
        assert!(expire_options(None).is_none());
    }
}
