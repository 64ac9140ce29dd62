//! Set command family (§4.4): `SADD`/`SREM`/`SMEMBERS`/`SINTER`/... .

use fred::interfaces::*;
use fred::types::{Key as DriverKey, Value as DriverValue};

use super::Driver;
use crate::error::{Error, Result};
use crate::value::{Reply, Value as Arg};

pub async fn sadd<D: Driver>(driver: &D, key: DriverKey, members: Vec<Arg>) -> Result<i64> {
    let members: Vec<DriverValue> = members.into_iter().map(Into::into).collect();
    driver.sadd(key, members).await.map_err(Error::from)
}

pub async fn srem<D: Driver>(driver: &D, key: DriverKey, members: Vec<Arg>) -> Result<i64> {
    let members: Vec<DriverValue> = members.into_iter().map(Into::into).collect();
    driver.srem(key, members).await.map_err(Error::from)
}

/// `SMEMBERS`: driver yields a set, re-shaped to a sequence — member order
/// is not guaranteed by the server and this adapter makes no attempt to
/// impose one, per §4.3.
pub async fn smembers<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    let result: DriverValue = driver.smembers(key).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn sismember<D: Driver>(driver: &D, key: DriverKey, member: Arg) -> Result<Reply> {
    let result = driver.sismember(key, DriverValue::from(member)).await.map_err(Error::from)?;
    Ok(Reply::from_bool(result))
}

pub async fn smismember<D: Driver>(driver: &D, key: DriverKey, members: Vec<Arg>) -> Result<Reply> {
    let members: Vec<DriverValue> = members.into_iter().map(Into::into).collect();
    let result: Vec<bool> = driver.smismember(key, members).await.map_err(Error::from)?;
    Ok(Reply::Array(result.into_iter().map(Reply::from_bool).collect()))
}

pub async fn scard<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.scard(key).await.map_err(Error::from)
}

pub async fn spop<D: Driver>(driver: &D, key: DriverKey, count: Option<i64>) -> Result<Reply> {
    let result: DriverValue = driver.spop(key, count.map(|c| c as usize)).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn srandmember<D: Driver>(driver: &D, key: DriverKey, count: Option<i64>) -> Result<Reply> {
    let result: DriverValue = driver.srandmember(key, count).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn smove<D: Driver>(driver: &D, source: DriverKey, destination: DriverKey, member: Arg) -> Result<bool> {
    driver.smove(source, destination, DriverValue::from(member)).await.map_err(Error::from)
}

pub async fn sinter<D: Driver>(driver: &D, keys: Vec<DriverKey>) -> Result<Reply> {
    let result: DriverValue = driver.sinter(keys).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn sunion<D: Driver>(driver: &D, keys: Vec<DriverKey>) -> Result<Reply> {
    let result: DriverValue = driver.sunion(keys).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn sdiff<D: Driver>(driver: &D, keys: Vec<DriverKey>) -> Result<Reply> {
    let result: DriverValue = driver.sdiff(keys).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn sinterstore<D: Driver>(driver: &D, destination: DriverKey, keys: Vec<DriverKey>) -> Result<i64> {
    driver.sinterstore(destination, keys).await.map_err(Error::from)
}

pub async fn sunionstore<D: Driver>(driver: &D, destination: DriverKey, keys: Vec<DriverKey>) -> Result<i64> {
    driver.sunionstore(destination, keys).await.map_err(Error::from)
}

pub async fn sdiffstore<D: Driver>(driver: &D, destination: DriverKey, keys: Vec<DriverKey>) -> Result<i64> {
    driver.sdiffstore(destination, keys).await.map_err(Error::from)
}

/// `SINTERCARD` — supplemented feature (SPEC_FULL.md).
pub async fn sintercard<D: Driver>(driver: &D, keys: Vec<DriverKey>, limit: Option<i64>) -> Result<i64> {
    driver.sintercard(keys, limit).await.map_err(Error::from)
}
