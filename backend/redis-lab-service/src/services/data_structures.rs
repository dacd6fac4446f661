//! Data structure facade over Redis
//!
//! `DataStructureStore` exposes one method per Redis operation across the
//! seven structure kinds. `RedisStore` is the production implementation; every
//! command is timed and counted in Prometheus.

use async_trait::async_trait;
use redis::{
    aio::ConnectionManager,
    geo::{Coord, RadiusOptions, RadiusOrder, RadiusSearchResult, Unit},
    AsyncCommands, ErrorKind, RedisError, RedisResult,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use crate::metrics;
use crate::models::{FieldValue, GeoMatch, KeyTtl, RangeOrder, GEO_RADIUS_LIMIT};

/// Largest latitude Redis can index (Web Mercator bound).
pub const MAX_GEO_LATITUDE: f64 = 85.051_128_78;
pub const MAX_GEO_LONGITUDE: f64 = 180.0;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis unavailable: {0}")]
    Communication(String),

    #[error("Wrong type: {0}")]
    WrongType(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Redis command failed: {0}")]
    Command(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
            || err.is_timeout()
            || err.kind() == ErrorKind::IoError
        {
            StoreError::Communication(err.to_string())
        } else if err.code() == Some("WRONGTYPE")
            || err.kind() == ErrorKind::TypeError
            || err.to_string().contains("not an integer")
        {
            StoreError::WrongType(err.to_string())
        } else {
            StoreError::Command(err.to_string())
        }
    }
}

/// Operations over Redis data structures addressed by key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStructureStore: Send + Sync {
    // ========== Strings ==========

    async fn set_string(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Overwrite with an expiry. A zero TTL is rejected.
    async fn set_string_with_ttl(&self, key: &str, value: &str, seconds: u64)
        -> StoreResult<()>;

    async fn get_string(&self, key: &str) -> StoreResult<Option<String>>;

    async fn increment(&self, key: &str) -> StoreResult<i64>;

    async fn increment_by(&self, key: &str, delta: i64) -> StoreResult<i64>;

    // ========== Lists ==========

    /// Append to the tail; returns the list length afterwards.
    async fn push_to_list(&self, key: &str, values: &[String]) -> StoreResult<u64>;

    async fn list_range(&self, key: &str, start: isize, end: isize) -> StoreResult<Vec<String>>;

    async fn pop_from_list(&self, key: &str) -> StoreResult<Option<String>>;

    async fn list_size(&self, key: &str) -> StoreResult<u64>;

    // ========== Sets ==========

    /// Returns how many values were not already members.
    async fn add_to_set(&self, key: &str, values: &[String]) -> StoreResult<u64>;

    async fn set_members(&self, key: &str) -> StoreResult<Vec<String>>;

    async fn is_set_member(&self, key: &str, value: &str) -> StoreResult<bool>;

    async fn set_size(&self, key: &str) -> StoreResult<u64>;

    async fn set_intersect(&self, key1: &str, key2: &str) -> StoreResult<Vec<String>>;

    async fn set_union(&self, key1: &str, key2: &str) -> StoreResult<Vec<String>>;

    async fn set_difference(&self, key1: &str, key2: &str) -> StoreResult<Vec<String>>;

    // ========== Sorted sets ==========

    async fn add_to_sorted_set(&self, key: &str, value: &str, score: f64) -> StoreResult<()>;

    async fn sorted_set_range(
        &self,
        key: &str,
        start: isize,
        end: isize,
        order: RangeOrder,
    ) -> StoreResult<Vec<String>>;

    async fn sorted_set_rank(&self, key: &str, value: &str) -> StoreResult<Option<u64>>;

    async fn sorted_set_score(&self, key: &str, value: &str) -> StoreResult<Option<f64>>;

    // ========== Hashes ==========

    async fn set_hash_field(&self, key: &str, field: &str, value: FieldValue) -> StoreResult<()>;

    async fn set_hash_all(&self, key: &str, fields: &BTreeMap<String, FieldValue>)
        -> StoreResult<()>;

    async fn get_hash_field(&self, key: &str, field: &str) -> StoreResult<Option<FieldValue>>;

    async fn get_hash_all(&self, key: &str) -> StoreResult<BTreeMap<String, FieldValue>>;

    async fn hash_fields(&self, key: &str) -> StoreResult<Vec<String>>;

    async fn hash_values(&self, key: &str) -> StoreResult<Vec<FieldValue>>;

    async fn hash_field_exists(&self, key: &str, field: &str) -> StoreResult<bool>;

    // ========== HyperLogLog ==========

    /// Returns 1 when an internal register changed, else 0.
    async fn add_to_hyperloglog(&self, key: &str, values: &[String]) -> StoreResult<u64>;

    async fn hyperloglog_count(&self, key: &str) -> StoreResult<u64>;

    // ========== Geo ==========

    async fn add_geo_location(
        &self,
        key: &str,
        longitude: f64,
        latitude: f64,
        member: &str,
    ) -> StoreResult<()>;

    /// Distance in kilometres, `None` if either member is missing.
    async fn geo_distance(&self, key: &str, member1: &str, member2: &str)
        -> StoreResult<Option<f64>>;

    async fn geo_radius(
        &self,
        key: &str,
        longitude: f64,
        latitude: f64,
        radius_km: f64,
    ) -> StoreResult<Vec<GeoMatch>>;

    async fn geo_radius_by_member(
        &self,
        key: &str,
        member: &str,
        radius_km: f64,
    ) -> StoreResult<Vec<GeoMatch>>;

    // ========== Keys ==========

    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// True if a key was removed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// False if the key does not exist.
    async fn expire(&self, key: &str, seconds: i64) -> StoreResult<bool>;

    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl>;

    async fn ping(&self) -> StoreResult<()>;
}

/// Redis-backed `DataStructureStore`.
///
/// The connection manager is multiplexed; each call works on its own clone.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    async fn observe<T, F>(&self, command: &'static str, fut: F) -> RedisResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        let start = Instant::now();
        let result = fut.await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::record_redis_command(command, outcome, start.elapsed().as_secs_f64());
        result
    }
}

pub fn validate_coordinates(longitude: f64, latitude: f64) -> StoreResult<()> {
    if !longitude.is_finite() || !(-MAX_GEO_LONGITUDE..=MAX_GEO_LONGITUDE).contains(&longitude) {
        return Err(StoreError::InvalidArgument(format!(
            "longitude {longitude} outside [-180, 180]"
        )));
    }
    if !latitude.is_finite() || !(-MAX_GEO_LATITUDE..=MAX_GEO_LATITUDE).contains(&latitude) {
        return Err(StoreError::InvalidArgument(format!(
            "latitude {latitude} outside [-{MAX_GEO_LATITUDE}, {MAX_GEO_LATITUDE}]"
        )));
    }
    Ok(())
}

fn validate_ttl(seconds: i64) -> StoreResult<()> {
    if seconds <= 0 {
        return Err(StoreError::InvalidArgument(format!(
            "TTL must be at least one second, got {seconds}"
        )));
    }
    Ok(())
}

fn validate_radius(radius_km: f64) -> StoreResult<()> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(StoreError::InvalidArgument(format!(
            "radius must be a non-negative number, got {radius_km}"
        )));
    }
    Ok(())
}

fn radius_options() -> RadiusOptions {
    RadiusOptions::default()
        .with_dist()
        .with_coord()
        .order(RadiusOrder::Asc)
        .limit(GEO_RADIUS_LIMIT)
}

fn to_geo_match(result: RadiusSearchResult) -> GeoMatch {
    let (longitude, latitude) = result
        .coord
        .map(|c| (c.longitude, c.latitude))
        .unwrap_or_default();
    GeoMatch {
        name: result.name,
        distance_km: result.dist.unwrap_or_default(),
        longitude,
        latitude,
    }
}

// GEORADIUSBYMEMBER answers an unknown centre member with an error.
fn is_unknown_member(err: &RedisError) -> bool {
    err.to_string()
        .contains("could not decode requested zset member")
}

fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}

#[async_trait]
impl DataStructureStore for RedisStore {
    async fn set_string(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        self.observe("SET", conn.set::<_, _, ()>(key, value)).await?;
        debug!(key, "string value set");
        Ok(())
    }

    async fn set_string_with_ttl(
        &self,
        key: &str,
        value: &str,
        seconds: u64,
    ) -> StoreResult<()> {
        validate_ttl(i64::try_from(seconds).unwrap_or(i64::MAX))?;
        let mut conn = self.conn.clone();
        self.observe("SETEX", conn.set_ex::<_, _, ()>(key, value, seconds))
            .await?;
        debug!(key, ttl_seconds = seconds, "string value set with TTL");
        Ok(())
    }

    async fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(self.observe("GET", conn.get(key)).await?)
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        self.increment_by(key, 1).await
    }

    async fn increment_by(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = self.observe("INCRBY", conn.incr(key, delta)).await?;
        debug!(key, delta, value, "counter incremented");
        Ok(value)
    }

    async fn push_to_list(&self, key: &str, values: &[String]) -> StoreResult<u64> {
        if values.is_empty() {
            return self.list_size(key).await;
        }
        let mut conn = self.conn.clone();
        let len: u64 = self.observe("RPUSH", conn.rpush(key, values)).await?;
        debug!(key, added = values.len(), len, "values pushed to list");
        Ok(len)
    }

    async fn list_range(&self, key: &str, start: isize, end: isize) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(self.observe("LRANGE", conn.lrange(key, start, end)).await?)
    }

    async fn pop_from_list(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = self.observe("LPOP", conn.lpop(key, None)).await?;
        debug!(key, popped = value.is_some(), "list head popped");
        Ok(value)
    }

    async fn list_size(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.conn.clone();
        Ok(self.observe("LLEN", conn.llen(key)).await?)
    }

    async fn add_to_set(&self, key: &str, values: &[String]) -> StoreResult<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        let added: u64 = self.observe("SADD", conn.sadd(key, values)).await?;
        debug!(key, added, "members added to set");
        Ok(added)
    }

    async fn set_members(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = self.observe("SMEMBERS", conn.smembers(key)).await?;
        Ok(sorted(members))
    }

    async fn is_set_member(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        Ok(self.observe("SISMEMBER", conn.sismember(key, value)).await?)
    }

    async fn set_size(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.conn.clone();
        Ok(self.observe("SCARD", conn.scard(key)).await?)
    }

    async fn set_intersect(&self, key1: &str, key2: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = self.observe("SINTER", conn.sinter(&[key1, key2][..])).await?;
        Ok(sorted(members))
    }

    async fn set_union(&self, key1: &str, key2: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = self.observe("SUNION", conn.sunion(&[key1, key2][..])).await?;
        Ok(sorted(members))
    }

    async fn set_difference(&self, key1: &str, key2: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = self.observe("SDIFF", conn.sdiff(&[key1, key2][..])).await?;
        Ok(sorted(members))
    }

    async fn add_to_sorted_set(&self, key: &str, value: &str, score: f64) -> StoreResult<()> {
        if !score.is_finite() {
            return Err(StoreError::InvalidArgument(format!(
                "score must be finite, got {score}"
            )));
        }
        let mut conn = self.conn.clone();
        self.observe("ZADD", conn.zadd::<_, _, _, ()>(key, value, score))
            .await?;
        debug!(key, value, score, "sorted set member upserted");
        Ok(())
    }

    async fn sorted_set_range(
        &self,
        key: &str,
        start: isize,
        end: isize,
        order: RangeOrder,
    ) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let members = match order {
            RangeOrder::Ascending => self.observe("ZRANGE", conn.zrange(key, start, end)).await?,
            RangeOrder::Descending => {
                self.observe("ZREVRANGE", conn.zrevrange(key, start, end))
                    .await?
            }
        };
        Ok(members)
    }

    async fn sorted_set_rank(&self, key: &str, value: &str) -> StoreResult<Option<u64>> {
        let mut conn = self.conn.clone();
        Ok(self.observe("ZRANK", conn.zrank(key, value)).await?)
    }

    async fn sorted_set_score(&self, key: &str, value: &str) -> StoreResult<Option<f64>> {
        let mut conn = self.conn.clone();
        Ok(self.observe("ZSCORE", conn.zscore(key, value)).await?)
    }

    async fn set_hash_field(&self, key: &str, field: &str, value: FieldValue) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        self.observe("HSET", conn.hset::<_, _, _, ()>(key, field, value.encode()))
            .await?;
        debug!(key, field, "hash field set");
        Ok(())
    }

    async fn set_hash_all(
        &self,
        key: &str,
        fields: &BTreeMap<String, FieldValue>,
    ) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let pairs: Vec<(&str, String)> = fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.encode()))
            .collect();
        let mut conn = self.conn.clone();
        self.observe("HSET", conn.hset_multiple::<_, _, _, ()>(key, &pairs))
            .await?;
        debug!(key, fields = pairs.len(), "hash fields set");
        Ok(())
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> StoreResult<Option<FieldValue>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = self.observe("HGET", conn.hget(key, field)).await?;
        Ok(raw.map(FieldValue::decode))
    }

    async fn get_hash_all(&self, key: &str) -> StoreResult<BTreeMap<String, FieldValue>> {
        let mut conn = self.conn.clone();
        let raw: BTreeMap<String, String> = self.observe("HGETALL", conn.hgetall(key)).await?;
        Ok(raw
            .into_iter()
            .map(|(field, value)| (field, FieldValue::decode(value)))
            .collect())
    }

    async fn hash_fields(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let fields: Vec<String> = self.observe("HKEYS", conn.hkeys(key)).await?;
        Ok(sorted(fields))
    }

    async fn hash_values(&self, key: &str) -> StoreResult<Vec<FieldValue>> {
        let mut conn = self.conn.clone();
        let values: Vec<String> = self.observe("HVALS", conn.hvals(key)).await?;
        Ok(values.into_iter().map(FieldValue::decode).collect())
    }

    async fn hash_field_exists(&self, key: &str, field: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        Ok(self.observe("HEXISTS", conn.hexists(key, field)).await?)
    }

    async fn add_to_hyperloglog(&self, key: &str, values: &[String]) -> StoreResult<u64> {
        let mut conn = self.conn.clone();
        let changed: u64 = self.observe("PFADD", conn.pfadd(key, values)).await?;
        debug!(key, elements = values.len(), changed, "hyperloglog updated");
        Ok(changed)
    }

    async fn hyperloglog_count(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.conn.clone();
        Ok(self.observe("PFCOUNT", conn.pfcount(key)).await?)
    }

    async fn add_geo_location(
        &self,
        key: &str,
        longitude: f64,
        latitude: f64,
        member: &str,
    ) -> StoreResult<()> {
        validate_coordinates(longitude, latitude)?;
        let mut conn = self.conn.clone();
        self.observe(
            "GEOADD",
            conn.geo_add::<_, _, ()>(key, (Coord::lon_lat(longitude, latitude), member)),
        )
        .await?;
        debug!(key, member, longitude, latitude, "geo location added");
        Ok(())
    }

    async fn geo_distance(
        &self,
        key: &str,
        member1: &str,
        member2: &str,
    ) -> StoreResult<Option<f64>> {
        let mut conn = self.conn.clone();
        Ok(self
            .observe(
                "GEODIST",
                conn.geo_dist(key, member1, member2, Unit::Kilometers),
            )
            .await?)
    }

    async fn geo_radius(
        &self,
        key: &str,
        longitude: f64,
        latitude: f64,
        radius_km: f64,
    ) -> StoreResult<Vec<GeoMatch>> {
        validate_coordinates(longitude, latitude)?;
        validate_radius(radius_km)?;
        let mut conn = self.conn.clone();
        let results: Vec<RadiusSearchResult> = self
            .observe(
                "GEORADIUS",
                conn.geo_radius(
                    key,
                    longitude,
                    latitude,
                    radius_km,
                    Unit::Kilometers,
                    radius_options(),
                ),
            )
            .await?;
        Ok(results.into_iter().map(to_geo_match).collect())
    }

    async fn geo_radius_by_member(
        &self,
        key: &str,
        member: &str,
        radius_km: f64,
    ) -> StoreResult<Vec<GeoMatch>> {
        validate_radius(radius_km)?;
        let mut conn = self.conn.clone();
        let results: Vec<RadiusSearchResult> = match self
            .observe(
                "GEORADIUSBYMEMBER",
                conn.geo_radius_by_member(
                    key,
                    member,
                    radius_km,
                    Unit::Kilometers,
                    radius_options(),
                ),
            )
            .await
        {
            Ok(results) => results,
            Err(err) if is_unknown_member(&err) => {
                debug!(key, member, "radius centre member not found");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(results.into_iter().map(to_geo_match).collect())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        Ok(self.observe("EXISTS", conn.exists(key)).await?)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = self.observe("DEL", conn.del(key)).await?;
        debug!(key, removed, "key deleted");
        Ok(removed > 0)
    }

    async fn expire(&self, key: &str, seconds: i64) -> StoreResult<bool> {
        validate_ttl(seconds)?;
        let mut conn = self.conn.clone();
        let applied: bool = self.observe("EXPIRE", conn.expire(key, seconds)).await?;
        debug!(key, seconds, applied, "expiry set");
        Ok(applied)
    }

    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl> {
        let mut conn = self.conn.clone();
        let raw: i64 = self.observe("TTL", conn.ttl(key)).await?;
        Ok(KeyTtl::from_redis(raw))
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        Ok(self.observe("PING", redis_utils::ping(&mut conn)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_failures_are_communication_errors() {
        let refused = RedisError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(
            StoreError::from(refused),
            StoreError::Communication(_)
        ));

        let timed_out = RedisError::from(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        assert!(matches!(
            StoreError::from(timed_out),
            StoreError::Communication(_)
        ));
    }

    #[test]
    fn test_type_errors_are_wrong_type() {
        let incompatible =
            RedisError::from((ErrorKind::TypeError, "Response was of incompatible type"));
        assert!(matches!(
            StoreError::from(incompatible),
            StoreError::WrongType(_)
        ));

        let not_integer = RedisError::from((
            ErrorKind::ResponseError,
            "An error was signalled by the server",
            "value is not an integer or out of range".to_string(),
        ));
        assert!(matches!(
            StoreError::from(not_integer),
            StoreError::WrongType(_)
        ));
    }

    #[test]
    fn test_other_server_errors_are_command_errors() {
        let err = RedisError::from((
            ErrorKind::ResponseError,
            "An error was signalled by the server",
            "unknown command 'FOO'".to_string(),
        ));
        assert!(matches!(StoreError::from(err), StoreError::Command(_)));
    }

    #[test]
    fn test_unknown_member_detection() {
        let err = RedisError::from((
            ErrorKind::ResponseError,
            "An error was signalled by the server",
            "could not decode requested zset member".to_string(),
        ));
        assert!(is_unknown_member(&err));
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(validate_coordinates(126.978, 37.5665).is_ok());
        assert!(validate_coordinates(180.0, MAX_GEO_LATITUDE).is_ok());
        assert!(validate_coordinates(-180.0, -MAX_GEO_LATITUDE).is_ok());

        assert!(matches!(
            validate_coordinates(180.5, 0.0),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_coordinates(0.0, 86.0),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_ttl_must_be_positive() {
        assert!(validate_ttl(1).is_ok());
        assert!(matches!(validate_ttl(0), Err(StoreError::InvalidArgument(_))));
        assert!(matches!(validate_ttl(-5), Err(StoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_radius_bounds() {
        assert!(validate_radius(0.0).is_ok());
        assert!(validate_radius(50.0).is_ok());
        assert!(validate_radius(-1.0).is_err());
        assert!(validate_radius(f64::INFINITY).is_err());
    }

    #[test]
    fn test_geo_match_from_search_result() {
        let result = RadiusSearchResult {
            name: "seoul".to_string(),
            coord: Some(Coord::lon_lat(126.978, 37.5665)),
            dist: Some(0.0002),
        };
        let hit = to_geo_match(result);

        assert_eq!(hit.name, "seoul");
        assert_eq!(hit.longitude, 126.978);
        assert_eq!(hit.latitude, 37.5665);
        assert!(hit.distance_km < 0.01);
    }
}
