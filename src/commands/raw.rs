//! Raw-command passthrough (§4.4's fallback rule, §9): used wherever the
//! driver has no typed method for a command — `EXISTS`/`KEYS`/`TYPE`/
//! `OBJECT ENCODING`/`RANDOMKEY`/`TOUCH` here, and anything reached through
//! `Client::call_raw` one layer up for commands this crate doesn't model at
//! all (JSON/search module commands and the like), grounded in `fred`'s own
//! `client.custom(cmd!(...), args)` pattern exercised across its `memory`,
//! `server`, and `streams` integration tests.

use fred::prelude::*;
use fred::types::Value as DriverValue;

use super::Driver;
use crate::error::{Error, Result};
use crate::value::Reply;

pub async fn custom<D: Driver, T>(driver: &D, command: &'static str, args: Vec<DriverValue>) -> Result<T>
where
    T: fred::types::FromValue,
{
    driver.custom(cmd!(command), args).await.map_err(Error::from)
}

pub async fn custom_reply<D: Driver>(driver: &D, command: &'static str, args: Vec<DriverValue>) -> Result<Reply> {
    custom(driver, command, args).await
}
