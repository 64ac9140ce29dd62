//! HyperLogLog command family (§4.4): `PFADD`/`PFCOUNT`/`PFMERGE`.

use fred::interfaces::*;
use fred::types::{Key as DriverKey, Value as DriverValue};

use super::Driver;
use crate::error::{Error, Result};
use crate::value::Value as Arg;

pub async fn pfadd<D: Driver>(driver: &D, key: DriverKey, elements: Vec<Arg>) -> Result<i64> {
    let elements: Vec<DriverValue> = elements.into_iter().map(Into::into).collect();
    driver.pfadd(key, elements).await.map_err(Error::from)
}

pub async fn pfcount<D: Driver>(driver: &D, keys: Vec<DriverKey>) -> Result<i64> {
    driver.pfcount(keys).await.map_err(Error::from)
}

pub async fn pfmerge<D: Driver>(driver: &D, destination: DriverKey, sources: Vec<DriverKey>) -> Result<()> {
    driver.pfmerge(destination, sources).await.map_err(Error::from)
}
