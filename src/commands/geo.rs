//! Geospatial command family (§4.4, supplemented — SPEC_FULL.md):
//! `GEOADD`/`GEOPOS`/`GEODIST`/`GEOSEARCH`.

use fred::interfaces::*;
use fred::types::geo::{GeoPosition, GeoRadiusInfo, GeoUnit, GeoValue};
use fred::types::{Key as DriverKey, SortOrder, Value as DriverValue};

use super::Driver;
use crate::error::{Error, Result};
use crate::value::{Reply, Value as Arg};

fn unit_from_str(raw: &str) -> GeoUnit {
    match raw.to_ascii_lowercase().as_str() {
        "km" => GeoUnit::Kilometers,
        "mi" => GeoUnit::Miles,
        "ft" => GeoUnit::Feet,
        _ => GeoUnit::Meters,
    }
}

/// A `GEORADIUS`/`GEOSEARCH` hit reshaped to the legacy reply order:
/// `member` first, then `distance`, `hash`, `[lon, lat]` — each included
/// only when its matching `WITH*` flag was requested, matching the order
/// the server itself emits them in.
fn radius_info_to_reply(info: GeoRadiusInfo) -> Reply {
    let mut parts = vec![Reply::Simple(info.member.into_string().unwrap_or_default())];
    if let Some(distance) = info.distance {
        parts.push(Reply::Double(crate::value::stringify_double(distance)));
    }
    if let Some(hash) = info.hash {
        parts.push(Reply::Integer(hash));
    }
    if let Some(pos) = info.position {
        parts.push(Reply::Array(vec![
            Reply::Double(crate::value::stringify_double(pos.longitude)),
            Reply::Double(crate::value::stringify_double(pos.latitude)),
        ]));
    }
    if parts.len() == 1 {
        parts.into_iter().next().unwrap()
    } else {
        Reply::Array(parts)
    }
}

/// `GEOADD key [NX|XX] [CH] longitude latitude member [...]`.
pub async fn geoadd<D: Driver>(driver: &D, key: DriverKey, members: Vec<(f64, f64, Arg)>) -> Result<i64> {
    let values: Vec<GeoValue> = members
        .into_iter()
        .map(|(lon, lat, member)| GeoValue::new(GeoPosition::from((lon, lat)), DriverValue::from(member)))
        .collect();
    driver.geoadd(key, None, false, values).await.map_err(Error::from)
}

pub async fn geopos<D: Driver>(driver: &D, key: DriverKey, members: Vec<Arg>) -> Result<Reply> {
    let members: Vec<DriverValue> = members.into_iter().map(Into::into).collect();
    let result: DriverValue = driver.geopos(key, members).await.map_err(Error::from)?;
    Reply::try_from(result)
}

pub async fn geodist<D: Driver>(driver: &D, key: DriverKey, member1: Arg, member2: Arg, unit: Option<&str>) -> Result<Reply> {
    let result: Option<f64> = driver
        .geodist(key, DriverValue::from(member1), DriverValue::from(member2), unit.map(unit_from_str))
        .await
        .map_err(Error::from)?;
    Ok(result.map(|d| Reply::Double(crate::value::stringify_double(d))).unwrap_or(Reply::Null))
}

pub async fn geohash<D: Driver>(driver: &D, key: DriverKey, members: Vec<Arg>) -> Result<Reply> {
    let members: Vec<DriverValue> = members.into_iter().map(Into::into).collect();
    let result: DriverValue = driver.geohash(key, members).await.map_err(Error::from)?;
    Reply::try_from(result)
}

/// `GEOSEARCH key FROMMEMBER member|FROMLONLAT lon lat BYRADIUS r unit|BYBOX
/// w h unit [ASC|DESC] [COUNT n] [WITHCOORD] [WITHDIST] [WITHHASH]`.
#[allow(clippy::too_many_arguments)]
pub async fn geosearch<D: Driver>(
    driver: &D,
    key: DriverKey,
    from_member: Option<Arg>,
    from_lonlat: Option<(f64, f64)>,
    by_radius: Option<(f64, &str)>,
    by_box: Option<(f64, f64, &str)>,
    ascending: Option<bool>,
    count: Option<i64>,
    with_coord: bool,
    with_dist: bool,
    with_hash: bool,
) -> Result<Reply> {
    let from_member = from_member.map(DriverValue::from);
    let from_lonlat = from_lonlat.map(GeoPosition::from);
    let by_radius = by_radius.map(|(r, unit)| (r, unit_from_str(unit)));
    let by_box = by_box.map(|(w, h, unit)| (w, h, unit_from_str(unit)));
    let order = ascending.map(|asc| if asc { SortOrder::Asc } else { SortOrder::Desc });
    let result: DriverValue = driver
        .geosearch(key, from_member, from_lonlat, by_radius, by_box, order, count, with_coord, with_dist, with_hash)
        .await
        .map_err(Error::from)?;
    let hits: Vec<GeoRadiusInfo> = result.into_geo_radius_result(with_coord, with_dist, with_hash).map_err(Error::from)?;
    Ok(Reply::Array(hits.into_iter().map(radius_info_to_reply).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_tokens_map_case_insensitively() {
        assert!(matches!(unit_from_str("KM"), GeoUnit::Kilometers));
        assert!(matches!(unit_from_str("mi"), GeoUnit::Miles));
        assert!(matches!(unit_from_str("bogus"), GeoUnit::Meters));
    }

    #[test]
    fn radius_info_without_with_flags_is_bare_member() {
        let info = GeoRadiusInfo { member: "Palermo".into(), distance: None, position: None, hash: None };
        assert_eq!(radius_info_to_reply(info), Reply::Simple("Palermo".to_string()));
    }
}
