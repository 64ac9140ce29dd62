//! List command family (§4.4): `LPUSH`/`RPUSH`/`LPOP`/`RPOP`/`LRANGE` and
//! the blocking variants.

use fred::interfaces::*;
use fred::types::lists::{LMoveDirection, ListLocation};
use fred::types::{Key as DriverKey, Value as DriverValue};

use super::params;
use super::Driver;
use crate::error::{Error, Result};
use crate::value::{Reply, Value as Arg};

pub async fn lpush<D: Driver>(driver: &D, key: DriverKey, values: Vec<Arg>) -> Result<i64> {
    let values: Vec<DriverValue> = values.into_iter().map(Into::into).collect();
    driver.lpush(key, values).await.map_err(Error::from)
}

pub async fn rpush<D: Driver>(driver: &D, key: DriverKey, values: Vec<Arg>) -> Result<i64> {
    let values: Vec<DriverValue> = values.into_iter().map(Into::into).collect();
    driver.rpush(key, values).await.map_err(Error::from)
}

pub async fn lpushx<D: Driver>(driver: &D, key: DriverKey, values: Vec<Arg>) -> Result<i64> {
    let values: Vec<DriverValue> = values.into_iter().map(Into::into).collect();
    driver.lpushx(key, values).await.map_err(Error::from)
}

pub async fn rpushx<D: Driver>(driver: &D, key: DriverKey, values: Vec<Arg>) -> Result<i64> {
    let values: Vec<DriverValue> = values.into_iter().map(Into::into).collect();
    driver.rpushx(key, values).await.map_err(Error::from)
}

pub async fn lpop<D: Driver>(driver: &D, key: DriverKey, count: Option<usize>) -> Result<Reply> {
    let result: DriverValue = driver.lpop(key, count).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn rpop<D: Driver>(driver: &D, key: DriverKey, count: Option<usize>) -> Result<Reply> {
    let result: DriverValue = driver.rpop(key, count).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn llen<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.llen(key).await.map_err(Error::from)
}

pub async fn lrange<D: Driver>(driver: &D, key: DriverKey, start: i64, stop: i64) -> Result<Reply> {
    let result: DriverValue = driver.lrange(key, start, stop).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn lindex<D: Driver>(driver: &D, key: DriverKey, index: i64) -> Result<Reply> {
    let result: DriverValue = driver.lindex(key, index).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn lset<D: Driver>(driver: &D, key: DriverKey, index: i64, value: Arg) -> Result<()> {
    driver.lset(key, index, DriverValue::from(value)).await.map_err(Error::from)
}

pub async fn lrem<D: Driver>(driver: &D, key: DriverKey, count: i64, value: Arg) -> Result<i64> {
    driver.lrem(key, count, DriverValue::from(value)).await.map_err(Error::from)
}

pub async fn ltrim<D: Driver>(driver: &D, key: DriverKey, start: i64, stop: i64) -> Result<()> {
    driver.ltrim(key, start, stop).await.map_err(Error::from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

pub async fn linsert<D: Driver>(driver: &D, key: DriverKey, side: Side, pivot: Arg, value: Arg) -> Result<i64> {
    let location = match side {
        Side::Before => ListLocation::Before,
        Side::After => ListLocation::After,
    };
    driver.linsert(key, location, DriverValue::from(pivot), DriverValue::from(value)).await.map_err(Error::from)
}

/// `LMOVE`/`RPOPLPUSH`: both are expressed through the driver's single
/// `lmove`, matching the legacy client's own layering of `rpoplpush` as
/// `lmove(src, dst, Right, Left)`.
pub async fn lmove<D: Driver>(
    driver: &D,
    source: DriverKey,
    destination: DriverKey,
    from_left: bool,
    to_left: bool,
) -> Result<Reply> {
    let from = if from_left { LMoveDirection::Left } else { LMoveDirection::Right };
    let to = if to_left { LMoveDirection::Left } else { LMoveDirection::Right };
    let result: DriverValue = driver.lmove(source, destination, from, to).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn rpoplpush<D: Driver>(driver: &D, source: DriverKey, destination: DriverKey) -> Result<Reply> {
    lmove(driver, source, destination, false, true).await
}

/// `BLPOP key [key ...] timeout` — the trailing-or-leading timeout is split
/// off via [`params::split_blocking_timeout`], per §4.2.
pub async fn blpop<D: Driver>(driver: &D, args: &[Arg]) -> Result<Reply> {
    let (keys, timeout) = params::split_blocking_timeout(args, "BLPOP")?;
    let keys: Vec<DriverKey> = keys.into_iter().map(DriverKey::from).collect();
    let result: DriverValue = driver.blpop(keys, timeout).await.map_err(Error::from)?;
    Reply::try_from(result)
}

/// `BRPOP key [key ...] timeout` — same timeout-position handling as [`blpop`].
pub async fn brpop<D: Driver>(driver: &D, args: &[Arg]) -> Result<Reply> {
    let (keys, timeout) = params::split_blocking_timeout(args, "BRPOP")?;
    let keys: Vec<DriverKey> = keys.into_iter().map(DriverKey::from).collect();
    let result: DriverValue = driver.brpop(keys, timeout).await.map_err(Error::from)?;
    Reply::try_from(result)
}

/// `BRPOPLPUSH`: expressed through the driver's `blmove(Right, Left)`
/// rather than a raw-command fallback — `fred` exposes `blmove` directly,
/// resolving §9's open question of whether the driver truly lacks a
/// `brpoplpush` form or just names it differently (it's the latter).
pub async fn brpoplpush<D: Driver>(driver: &D, source: DriverKey, destination: DriverKey, timeout: f64) -> Result<Reply> {
    let result: DriverValue =
        driver.blmove(source, destination, LMoveDirection::Right, LMoveDirection::Left, timeout).await.map_err(Error::from)?;
    Reply::try_from(result)
}

/// `LMPOP`/`BLMPOP` — supplemented feature (SPEC_FULL.md).
pub async fn lmpop<D: Driver>(driver: &D, keys: Vec<DriverKey>, from_left: bool, count: Option<i64>) -> Result<Reply> {
    let direction = if from_left { LMoveDirection::Left } else { LMoveDirection::Right };
    let result: DriverValue = driver.lmpop(keys, direction, count).await.map_err(Error::from)?;
    Reply::try_from(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_maps_to_list_location() {
        assert!(matches!(
            match Side::Before {
                Side::Before => ListLocation::Before,
                Side::After => ListLocation::After,
            },
            ListLocation::Before
        ));
    }
}
