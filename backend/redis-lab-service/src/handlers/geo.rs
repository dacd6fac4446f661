/// Geo endpoints under `/api/redis/geo`
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::StoreData;
use crate::error::Result;
use crate::models::Location;
use crate::services::data_structures::validate_coordinates;

fn default_radius_km() -> f64 {
    10.0
}

#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    pub member1: String,
    pub member2: String,
}

#[derive(Debug, Deserialize)]
pub struct RadiusQuery {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default = "default_radius_km")]
    pub radius: f64,
}

#[derive(Debug, Deserialize)]
pub struct MemberRadiusQuery {
    pub member: String,
    #[serde(default = "default_radius_km")]
    pub radius: f64,
}

/// `POST /api/redis/geo/{key}` with a location body
pub async fn add(
    store: StoreData,
    key: web::Path<String>,
    location: web::Json<Location>,
) -> Result<HttpResponse> {
    location.validate()?;
    store
        .add_geo_location(&key, location.longitude, location.latitude, &location.name)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Location added",
        "name": location.name,
    })))
}

/// `POST /api/redis/geo/{key}/batch` with an array of locations
pub async fn add_batch(
    store: StoreData,
    key: web::Path<String>,
    locations: web::Json<Vec<Location>>,
) -> Result<HttpResponse> {
    // Reject the whole batch before any point is written.
    for location in locations.iter() {
        location.validate()?;
        validate_coordinates(location.longitude, location.latitude)?;
    }
    for location in locations.iter() {
        store
            .add_geo_location(&key, location.longitude, location.latitude, &location.name)
            .await?;
    }
    Ok(HttpResponse::Ok().json(json!({
        "message": "Locations added",
        "added": locations.len(),
    })))
}

/// `GET /api/redis/geo/{key}/distance?member1&member2`
pub async fn distance(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<DistanceQuery>,
) -> Result<HttpResponse> {
    let distance = store
        .geo_distance(&key, &query.member1, &query.member2)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "from": query.member1,
        "to": query.member2,
        "distance": distance,
        "unit": "km",
    })))
}

/// `GET /api/redis/geo/{key}/radius?longitude&latitude&radius`
pub async fn radius(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<RadiusQuery>,
) -> Result<HttpResponse> {
    let matches = store
        .geo_radius(&key, query.longitude, query.latitude, query.radius)
        .await?;
    Ok(HttpResponse::Ok().json(matches))
}

/// `GET /api/redis/geo/{key}/radius/member?member&radius`
pub async fn radius_by_member(
    store: StoreData,
    key: web::Path<String>,
    query: web::Query<MemberRadiusQuery>,
) -> Result<HttpResponse> {
    let matches = store
        .geo_radius_by_member(&key, &query.member, query.radius)
        .await?;
    Ok(HttpResponse::Ok().json(matches))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test::TestRequest};
    use serde_json::json;

    use crate::handlers::test_support::send;
    use crate::models::GeoMatch;
    use crate::services::data_structures::MockDataStructureStore;
    use crate::services::StoreError;

    #[actix_web::test]
    async fn test_add_location() {
        let mut store = MockDataStructureStore::new();
        store
            .expect_add_geo_location()
            .withf(|key, lon, lat, member| {
                key == "cities" && *lon == 126.978 && *lat == 37.5665 && member == "seoul"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let (status, body) = send(
            store,
            TestRequest::post()
                .uri("/api/redis/geo/cities")
                .set_json(json!({"name": "seoul", "longitude": 126.978, "latitude": 37.5665})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "seoul");
    }

    #[actix_web::test]
    async fn test_batch_adds_each_location() {
        let mut store = MockDataStructureStore::new();
        store
            .expect_add_geo_location()
            .times(2)
            .returning(|_, _, _, _| Ok(()));

        let (status, body) = send(
            store,
            TestRequest::post().uri("/api/redis/geo/cities/batch").set_json(json!([
                {"name": "seoul", "longitude": 126.978, "latitude": 37.5665},
                {"name": "gwangju", "longitude": 127.1, "latitude": 37.5}
            ])),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["added"], 2);
    }

    #[actix_web::test]
    async fn test_batch_with_bad_coordinates_writes_nothing() {
        let mut store = MockDataStructureStore::new();
        store.expect_add_geo_location().never();

        let (status, body) = send(
            store,
            TestRequest::post().uri("/api/redis/geo/cities/batch").set_json(json!([
                {"name": "seoul", "longitude": 126.978, "latitude": 37.5665},
                {"name": "pole", "longitude": 0.0, "latitude": 89.0},
                {"name": "gwangju", "longitude": 127.1, "latitude": 37.5}
            ])),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[actix_web::test]
    async fn test_out_of_range_latitude_is_bad_request() {
        let mut store = MockDataStructureStore::new();
        store
            .expect_add_geo_location()
            .returning(|_, _, _, _| Err(StoreError::InvalidArgument("latitude".into())));

        let (status, body) = send(
            store,
            TestRequest::post()
                .uri("/api/redis/geo/cities")
                .set_json(json!({"name": "pole", "longitude": 0.0, "latitude": 90.0})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[actix_web::test]
    async fn test_distance_shape() {
        let mut store = MockDataStructureStore::new();
        store
            .expect_geo_distance()
            .withf(|_, a, b| a == "seoul" && b == "gwangju")
            .returning(|_, _, _| Ok(Some(11.8)));

        let (status, body) = send(
            store,
            TestRequest::get().uri("/api/redis/geo/cities/distance?member1=seoul&member2=gwangju"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"from": "seoul", "to": "gwangju", "distance": 11.8, "unit": "km"})
        );
    }

    #[actix_web::test]
    async fn test_radius_defaults_to_ten_km() {
        let mut store = MockDataStructureStore::new();
        store
            .expect_geo_radius()
            .withf(|_, _, _, radius| *radius == 10.0)
            .returning(|_, lon, lat, _| {
                Ok(vec![GeoMatch {
                    name: "seoul".into(),
                    distance_km: 0.0,
                    longitude: lon,
                    latitude: lat,
                }])
            });

        let (status, body) = send(
            store,
            TestRequest::get().uri("/api/redis/geo/cities/radius?longitude=126.978&latitude=37.5665"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "seoul");
        assert_eq!(body[0]["distance"], 0.0);
        assert_eq!(body[0]["longitude"], 126.978);
    }

    #[actix_web::test]
    async fn test_radius_by_member_route() {
        let mut store = MockDataStructureStore::new();
        store
            .expect_geo_radius_by_member()
            .withf(|_, member, radius| member == "seoul" && *radius == 50.0)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let (status, body) = send(
            store,
            TestRequest::get().uri("/api/redis/geo/cities/radius/member?member=seoul&radius=50"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
