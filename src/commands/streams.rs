//! Stream command family (§4.4): `XADD`/`XRANGE`/`XREAD`/`XGROUP` and the
//! consumer-group commands.
//!
//! Most of this module asks the driver for a raw [`DriverValue`] and hands
//! it straight to [`Reply::try_from`] rather than building the structured
//! [`super::results::StreamEntry`]/[`super::results::StreamReply`] types —
//! `fred`'s untyped `Value` reply already nests `[id, [field, value, ...]]`
//! the same way the legacy client expects, so there's nothing left to
//! reshape. Those structured types stay available for callers that want to
//! walk a stream reply without re-parsing `Reply`.

use fred::interfaces::*;
use fred::types::streams::{XCapKind, XCapTrim, XID};
use fred::types::{Key as DriverKey, Value as DriverValue};

use super::params::{self, TrimBound, TrimOptions, TrimStrategy, XGroupCommand};
use super::Driver;
use crate::error::{Error, Result};
use crate::value::{Reply, Value as Arg};

fn trim_tuple(opts: &TrimOptions) -> (XCapKind, XCapTrim, i64) {
    let kind = match opts.strategy {
        TrimStrategy::MaxLen => XCapKind::MaxLen,
        TrimStrategy::MinId => XCapKind::MinId,
    };
    let trim = match opts.bound {
        TrimBound::Exact => XCapTrim::Exact,
        TrimBound::Approximate => XCapTrim::AlmostExact,
    };
    let threshold = opts.threshold.parse().unwrap_or(0);
    (kind, trim, threshold)
}

/// `XADD key [NOMKSTREAM] [MAXLEN|MINID ...] id field value [...]`. The
/// whole trailing token vector (everything after the key) is parsed by
/// [`params::parse_xadd_prefix`], which also splits out the `field value`
/// pairs at the end.
pub async fn xadd<D: Driver>(driver: &D, key: DriverKey, tokens: &[Arg]) -> Result<Reply> {
    let (opts, field_tokens) = params::parse_xadd_prefix(tokens)?;
    let fields = params::parse_field_value_pairs(field_tokens, "XADD")?;
    let fields: Vec<(DriverValue, DriverValue)> = fields.into_iter().map(|(f, v)| (f.into(), v.into())).collect();
    let id = opts.id.clone().unwrap_or_else(|| "*".to_string());
    let nomkstream = !opts.make_stream;
    let result: DriverValue = match &opts.trim {
        Some(trim) => driver.xadd(key, nomkstream, Some(trim_tuple(trim)), id, fields).await.map_err(Error::from)?,
        None => driver.xadd(key, nomkstream, None::<(XCapKind, XCapTrim, i64)>, id, fields).await.map_err(Error::from)?,
    };
    Reply::try_from(result)
}

/// `XTRIM key MAXLEN|MINID [=|~] threshold [LIMIT n]`.
pub async fn xtrim<D: Driver>(driver: &D, key: DriverKey, tokens: &[Arg]) -> Result<i64> {
    let opts = params::parse_xtrim_options(tokens)?;
    driver.xtrim(key, trim_tuple(&opts)).await.map_err(Error::from)
}

pub async fn xlen<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.xlen(key).await.map_err(Error::from)
}

pub async fn xdel<D: Driver>(driver: &D, key: DriverKey, ids: Vec<String>) -> Result<i64> {
    driver.xdel(key, ids).await.map_err(Error::from)
}

pub async fn xrange<D: Driver>(driver: &D, key: DriverKey, start: String, end: String, count: Option<i64>) -> Result<Reply> {
    let result: DriverValue = driver.xrange(key, start, end, count).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn xrevrange<D: Driver>(driver: &D, key: DriverKey, end: String, start: String, count: Option<i64>) -> Result<Reply> {
    let result: DriverValue = driver.xrevrange(key, end, start, count).await.map_err(Error::from)?;
    Reply::try_from(result)
}

/// `XREAD [COUNT n] [BLOCK ms] STREAMS k1 .. kn id1 .. idn`. Parsed by
/// [`params::parse_xread_options`]; errors if a `GROUP` clause is present
/// (that's [`xreadgroup`]'s grammar). Returns `Reply::Null` when a blocking
/// read times out, matching the driver's `nil` multi-bulk reply.
pub async fn xread<D: Driver>(driver: &D, tokens: &[Arg]) -> Result<Reply> {
    let opts = params::parse_xread_options(tokens, "XREAD")?;
    if opts.group.is_some() {
        return Err(Error::UnknownToken { command: "XREAD".to_string(), token: "GROUP".to_string() });
    }
    let keys: Vec<String> = opts.streams.iter().map(|(k, _)| k.clone()).collect();
    let ids: Vec<String> = opts.streams.into_iter().map(|(_, id)| id).collect();
    let result: DriverValue = driver.xread(opts.count, opts.block_ms, keys, ids).await.map_err(Error::from)?;
    if result.is_null() {
        return Ok(Reply::Null);
    }
    Reply::try_from(result)
}

/// `XREADGROUP GROUP group consumer [COUNT n] [BLOCK ms] [NOACK] STREAMS k1
/// .. kn id1 .. idn`.
pub async fn xreadgroup<D: Driver>(driver: &D, tokens: &[Arg]) -> Result<Reply> {
    let opts = params::parse_xread_options(tokens, "XREADGROUP")?;
    let (group, consumer) = opts.group.ok_or_else(|| Error::WrongArity("XREADGROUP".to_string()))?;
    let keys: Vec<String> = opts.streams.iter().map(|(k, _)| k.clone()).collect();
    let ids: Vec<XID> = opts.streams.into_iter().map(|(_, id)| XID::from(id)).collect();
    let result: DriverValue =
        driver.xreadgroup(&group, &consumer, opts.count, opts.block_ms, opts.noack, keys, ids).await.map_err(Error::from)?;
    if result.is_null() {
        return Ok(Reply::Null);
    }
    Reply::try_from(result)
}

/// `XGROUP CREATE|DESTROY|CREATECONSUMER|DELCONSUMER|SETID key ...`. `tokens`
/// is the full raw argument vector following `XGROUP` (subcommand, key,
/// then the subcommand's own arguments), parsed by [`params::parse_xgroup`];
/// `key` is the same key already normalized by the caller.
pub async fn xgroup<D: Driver>(driver: &D, key: DriverKey, tokens: &[Arg]) -> Result<Reply> {
    let cmd = params::parse_xgroup(tokens)?;
    match cmd {
        XGroupCommand::Create { group, id, mkstream } => {
            driver.xgroup_create(key, group, id, mkstream).await.map_err(Error::from)?;
            Ok(Reply::Simple("OK".to_string()))
        }
        XGroupCommand::Destroy { group } => {
            let result: i64 = driver.xgroup_destroy(key, group).await.map_err(Error::from)?;
            Ok(Reply::Integer(result))
        }
        XGroupCommand::CreateConsumer { group, consumer } => {
            let result: i64 = driver.xgroup_createconsumer(key, group, consumer).await.map_err(Error::from)?;
            Ok(Reply::Integer(result))
        }
        XGroupCommand::DelConsumer { group, consumer } => {
            let result: i64 = driver.xgroup_delconsumer(key, group, consumer).await.map_err(Error::from)?;
            Ok(Reply::Integer(result))
        }
        XGroupCommand::SetId { group, id, entries_read } => {
            driver.xgroup_setid(key, group, id, entries_read).await.map_err(Error::from)?;
            Ok(Reply::Simple("OK".to_string()))
        }
    }
}

pub async fn xack<D: Driver>(driver: &D, key: DriverKey, group: &str, ids: Vec<String>) -> Result<i64> {
    driver.xack(key, group, ids).await.map_err(Error::from)
}

/// `XPENDING key group [IDLE ms] [start end count [consumer]]` — the
/// summary (no range) form and the extended (range) form both funnel
/// through `fred`'s single `xpending` call, which takes `()` for the
/// summary shape.
pub async fn xpending_summary<D: Driver>(driver: &D, key: DriverKey, group: &str) -> Result<Reply> {
    let result: DriverValue = driver.xpending(key, group, ()).await.map_err(Error::from)?;
    Reply::try_from(result)
}

#[allow(clippy::too_many_arguments)]
pub async fn xclaim<D: Driver>(
    driver: &D,
    key: DriverKey,
    group: &str,
    consumer: &str,
    min_idle_time: i64,
    ids: Vec<String>,
    idle: Option<i64>,
    time: Option<i64>,
    retry_count: Option<i64>,
    force: bool,
    justid: bool,
) -> Result<Reply> {
    let result: DriverValue = driver
        .xclaim(key, group, consumer, min_idle_time, ids, idle, time, retry_count, force, justid)
        .await
        .map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn xautoclaim<D: Driver>(
    driver: &D,
    key: DriverKey,
    group: &str,
    consumer: &str,
    min_idle_time: i64,
    start: String,
    count: Option<i64>,
    justid: bool,
) -> Result<Reply> {
    let result: DriverValue =
        driver.xautoclaim(key, group, consumer, min_idle_time, start, count, justid).await.map_err(Error::from)?;
    Reply::try_from(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_tuple_maps_strategy_and_bound() {
        let opts = TrimOptions { strategy: TrimStrategy::MaxLen, bound: TrimBound::Approximate, threshold: "100".to_string(), limit: None };
        let (kind, trim, threshold) = trim_tuple(&opts);
        assert!(matches!(kind, XCapKind::MaxLen));
        assert!(matches!(trim, XCapTrim::AlmostExact));
        assert_eq!(threshold, 100);
    }
}
