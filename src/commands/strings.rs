//! `GET`/`SET` and the rest of the string command family (§4.4).
//!
//! `SETEX`/`PSETEX`/`SETNX` are deliberately not separate driver calls —
//! each funnels into [`set`] with the equivalent `SetOptions` record, per
//! the "implemented via unified SET... never via a separate command" rule
//! of §4.4.

use fred::interfaces::*;
use fred::types::{Expiration, Key as DriverKey, SetOptions as DriverSetOptions, Value as DriverValue};

use super::params::{self, ExpireUnit, Expiry, SetOptions};
use super::Driver;
use crate::error::{Error, Result};
use crate::value::{Reply, Value as Arg};

fn expiration(opts: &SetOptions) -> Option<Expiration> {
    opts.expiry.map(|e| match e.unit {
        ExpireUnit::Seconds => Expiration::EX(e.count),
        ExpireUnit::Millis => Expiration::PX(e.count),
        ExpireUnit::UnixSeconds => Expiration::EXAT(e.count),
        ExpireUnit::UnixMillis => Expiration::PXAT(e.count),
    }).or(if opts.keep_ttl { Some(Expiration::KEEPTTL) } else { None })
}

fn condition(opts: &SetOptions) -> Option<DriverSetOptions> {
    use super::params::SetCondition;
    opts.condition.map(|c| match c {
        SetCondition::OnlyIfExists => DriverSetOptions::XX,
        SetCondition::OnlyIfDoesNotExist => DriverSetOptions::NX,
    })
}

/// `SET key value [EX n|PX n|EXAT n|PXAT n] [KEEPTTL] [NX|XX] [GET]`. Runs
/// the trailing option tokens through [`params::parse_set_options`] before
/// dispatching, per §4.2. Returns `Reply::Simple("OK")` on a plain success,
/// `Reply::Null` on a conditional miss (per §3's invariant: `SET` returns
/// `"OK"` exactly when the driver confirms success, `null` otherwise), or
/// the previous value when `GET` was requested.
pub async fn set<D: Driver>(driver: &D, key: DriverKey, value: Arg, option_tokens: &[Arg]) -> Result<Reply> {
    let opts = params::parse_set_options(option_tokens)?;
    let value: DriverValue = value.into();
    let result: DriverValue =
        driver.set(key, value, expiration(&opts), condition(&opts), opts.get).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn get<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    let result: DriverValue = driver.get(key).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn getdel<D: Driver>(driver: &D, key: DriverKey) -> Result<Reply> {
    let result: DriverValue = driver.getdel(key).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn getex<D: Driver>(driver: &D, key: DriverKey, opts: &SetOptions) -> Result<Reply> {
    let result: DriverValue = driver.getex(key, expiration(opts)).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn append<D: Driver>(driver: &D, key: DriverKey, value: Arg) -> Result<i64> {
    driver.append(key, DriverValue::from(value)).await.map_err(Error::from)
}

pub async fn strlen<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.strlen(key).await.map_err(Error::from)
}

pub async fn setrange<D: Driver>(driver: &D, key: DriverKey, offset: i64, value: Arg) -> Result<i64> {
    driver.setrange(key, offset, DriverValue::from(value)).await.map_err(Error::from)
}

pub async fn getrange<D: Driver>(driver: &D, key: DriverKey, start: i64, end: i64) -> Result<Reply> {
    let result: DriverValue = driver.getrange(key, start, end).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn incr<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.incr(key).await.map_err(Error::from)
}

pub async fn incrby<D: Driver>(driver: &D, key: DriverKey, by: i64) -> Result<i64> {
    driver.incrby(key, by).await.map_err(Error::from)
}

pub async fn incrbyfloat<D: Driver>(driver: &D, key: DriverKey, by: f64) -> Result<f64> {
    driver.incrbyfloat(key, by).await.map_err(Error::from)
}

pub async fn decr<D: Driver>(driver: &D, key: DriverKey) -> Result<i64> {
    driver.decr(key).await.map_err(Error::from)
}

pub async fn decrby<D: Driver>(driver: &D, key: DriverKey, by: i64) -> Result<i64> {
    driver.decrby(key, by).await.map_err(Error::from)
}

/// `MSET key value [key value ...]`. Accepts the flat variadic token vector
/// directly and splits it into `(key, value)` pairs via
/// [`params::parse_field_value_pairs`], per §4.2's "variadic pairs or a
/// single record object" note — the single-object form is a caller-side
/// concern (flattening a JS-style record into this same token vector before
/// calling in), not a second code path here.
pub async fn mset<D: Driver>(driver: &D, tokens: &[Arg]) -> Result<()> {
    let pairs = params::parse_field_value_pairs(tokens, "MSET")?;
    let pairs: Vec<(DriverKey, DriverValue)> = pairs.into_iter().map(|(k, v)| (DriverKey::from(k), v.into())).collect();
    driver.mset(pairs).await.map_err(Error::from)
}

pub async fn msetnx<D: Driver>(driver: &D, tokens: &[Arg]) -> Result<bool> {
    let pairs = params::parse_field_value_pairs(tokens, "MSETNX")?;
    let pairs: Vec<(DriverKey, DriverValue)> = pairs.into_iter().map(|(k, v)| (DriverKey::from(k), v.into())).collect();
    driver.msetnx(pairs).await.map_err(Error::from)
}

pub async fn mget<D: Driver>(driver: &D, keys: Vec<DriverKey>) -> Result<Reply> {
    let result: DriverValue = driver.mget(keys).await.map_err(Error::from)?;
    Reply::try_from(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_options_map_ex_to_expiration() {
        let opts = SetOptions { expiry: Some(Expiry { unit: ExpireUnit::Seconds, count: 10 }), ..Default::default() };
        assert!(matches!(expiration(&opts), Some(Expiration::EX(10))));
    }

    #[test]
    fn keepttl_without_expiry_maps_through() {
        let opts = SetOptions { keep_ttl: true, ..Default::default() };
        assert!(matches!(expiration(&opts), Some(Expiration::KEEPTTL)));
    }
}
