//! Rentals service endpoints
//!
//! `GET /rentals` joins the rentals collection with the catalog; the two
//! reads run concurrently. Either failing is logged and treated as empty,
//! which empties the joined result.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use movies_core::{expand_rentals, ExpandedRental, Rental, RentRequest, ReturnRequest};

use super::health;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::store::{Collection, Document, DocumentStore, StoreError};

/// Response of `POST /rent/return`
#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub status: &'static str,
}

async fn load_rentals(store: &dyn DocumentStore) -> Result<Vec<Rental>, StoreError> {
    let docs = store.find_all(Collection::Rentals).await?;

    Ok(docs
        .iter()
        .filter_map(|doc| match doc.decode::<Rental>() {
            Ok(rental) => Some(rental),
            Err(e) => {
                tracing::warn!("skipping rental document: {}", e);
                None
            }
        })
        .collect())
}

/// GET /rentals - rentals priced from the catalog
async fn list_rentals(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<Vec<ExpandedRental>> {
    tracing::info!("GET /rentals");

    let (rentals, catalog) = tokio::join!(
        load_rentals(state.store.as_ref()),
        state.catalog.fetch(&headers)
    );

    let rentals = rentals.unwrap_or_else(|e| {
        tracing::error!("Failed to query rentals: {}", e);
        Vec::new()
    });
    let catalog = catalog.unwrap_or_else(|e| {
        tracing::error!("Failed to get movies catalog: {}", e);
        Vec::new()
    });

    Json(expand_rentals(rentals, &catalog))
}

/// POST /rent - record a rental, keyed by catalog id
async fn rent(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RentRequest>, JsonRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    tracing::info!("POST /rent");
    let Json(req) = payload?;

    let rental = Rental::new(req.catalog_id, req.price);
    let result = match Document::from_serializable(rental.id.clone(), &rental) {
        Ok(doc) => state.store.upsert(Collection::Rentals, doc).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => tracing::info!(catalog_id = %rental.catalog_id, price = ?rental.price, "Rent received"),
        Err(e) => tracing::error!(catalog_id = %rental.catalog_id, "Failed to rent: {}", e),
    }

    Ok(Json(Vec::new()))
}

/// POST /rent/return - drop a rental
async fn return_rental(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReturnRequest>, JsonRejection>,
) -> Result<Json<ReturnResponse>, ApiError> {
    tracing::info!("POST /rent/return");
    let Json(req) = payload?;

    match state.store.delete(Collection::Rentals, &req.catalog_id).await {
        Ok(true) => tracing::info!(catalog_id = %req.catalog_id, "Return received"),
        Ok(false) => tracing::info!(catalog_id = %req.catalog_id, "Return for a movie that was not rented"),
        Err(e) => tracing::error!(catalog_id = %req.catalog_id, "Failed to return: {}", e),
    }

    Ok(Json(ReturnResponse {
        status: "return processed",
    }))
}

/// Rentals routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rentals", get(list_rentals))
        .route("/rent", post(rent))
        .route("/rent/return", post(return_rental))
        .merge(health::router("rentals"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use movies_core::RENTAL_MARKUP;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::catalog_source::HttpCatalog;
    use crate::http::routes::testing::{
        app, app_with, get, post_json, seeded_store, send, BrokenStore, UnavailableCatalog,
    };
    use crate::http::server::Service;
    use crate::store::{Collection, DocumentStore, MemoryDocumentStore};

    #[tokio::test]
    async fn rent_then_list_applies_markup() {
        let app = app(Service::All, seeded_store().await);

        let (status, body) =
            post_json(&app, "/rent", r#"{"catalog_id": 508442, "price": 3.99}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, rentals) = get(&app, "/rentals").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rentals.as_array().unwrap().len(), 1);

        let rental = &rentals[0];
        assert_eq!(rental["id"], "508442");
        assert_eq!(rental["catalog_id"], "508442");
        assert_eq!(rental["original_title"], "Soul");
        assert_eq!(rental["price"], json!(3.99 * RENTAL_MARKUP));
        assert_eq!(rental["vote_average"], json!(8.2));
        assert!(rental["backdrop_path"].is_string());
        assert!(rental["overview"].is_string());
    }

    #[tokio::test]
    async fn renting_twice_keeps_one_rental() {
        let store = seeded_store().await;
        let app = app(Service::Rentals, store.clone());

        post_json(&app, "/rent", r#"{"catalog_id": "129", "price": 1}"#).await;
        post_json(&app, "/rent", r#"{"catalog_id": 129, "price": 2}"#).await;

        let stored = store.find_all(Collection::Rentals).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].body["price"], json!(2.0));
    }

    #[tokio::test]
    async fn rentals_keep_rent_order() {
        let app = app(Service::All, seeded_store().await);
        for id in ["14160", "324857", "10681"] {
            post_json(&app, "/rent", &format!(r#"{{"catalog_id": "{id}"}}"#)).await;
        }

        let (_, rentals) = get(&app, "/rentals").await;
        let ids: Vec<_> = rentals
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(ids, vec!["14160", "324857", "10681"]);
    }

    #[tokio::test]
    async fn rental_outside_catalog_is_hidden() {
        let app = app(Service::All, seeded_store().await);
        post_json(&app, "/rent", r#"{"catalog_id": "999", "price": 1.0}"#).await;
        assert_eq!(get(&app, "/rentals").await, (StatusCode::OK, json!([])));
    }

    #[tokio::test]
    async fn catalog_outage_empties_rentals() {
        let store = seeded_store().await;
        let app = app_with(Service::Rentals, store, Arc::new(UnavailableCatalog));

        post_json(&app, "/rent", r#"{"catalog_id": 129, "price": 2.99}"#).await;
        assert_eq!(get(&app, "/rentals").await, (StatusCode::OK, json!([])));
    }

    #[tokio::test]
    async fn store_failure_still_answers_empty() {
        let app = app(Service::All, Arc::new(BrokenStore));

        let (status, body) = post_json(&app, "/rent", r#"{"catalog_id": 1}"#).await;
        assert_eq!((status, body), (StatusCode::OK, json!([])));
        assert_eq!(get(&app, "/rentals").await, (StatusCode::OK, json!([])));
    }

    #[tokio::test]
    async fn rent_without_catalog_id_is_rejected() {
        let app = app(Service::Rentals, Arc::new(MemoryDocumentStore::new()));

        let (status, body) = post_json(&app, "/rent", r#"{"price": 1.0}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");

        let (status, _) = post_json(&app, "/rent", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rent_without_content_type_is_rejected() {
        let app = app(Service::Rentals, Arc::new(MemoryDocumentStore::new()));
        let request = Request::builder()
            .method("POST")
            .uri("/rent")
            .body(Body::from(r#"{"catalog_id": 1}"#))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn return_removes_rental() {
        let store = seeded_store().await;
        let app = app(Service::All, store.clone());

        post_json(&app, "/rent", r#"{"catalog_id": 129, "price": 2.99}"#).await;
        post_json(&app, "/rent", r#"{"catalog_id": 14160, "price": 1.49}"#).await;

        let (status, body) = post_json(&app, "/rent/return", r#"{"catalog_id": "129"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "return processed"}));

        let (_, rentals) = get(&app, "/rentals").await;
        assert_eq!(rentals.as_array().unwrap().len(), 1);
        assert_eq!(rentals[0]["id"], "14160");
    }

    #[tokio::test]
    async fn returning_unrented_movie_is_not_an_error() {
        let app = app(Service::Rentals, Arc::new(MemoryDocumentStore::new()));
        let (status, body) = post_json(&app, "/rent/return", r#"{"catalog_id": 1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "return processed");
    }

    #[tokio::test]
    async fn joins_against_remote_catalog_with_propagated_baggage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog"))
            .and(header("baggage", "divert=bob"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 42, "original_title": "Remote", "price": 10.0, "vote_average": 6.0}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryDocumentStore::new());
        let catalog = Arc::new(HttpCatalog::new(&server.uri(), Duration::from_secs(2)).unwrap());
        let app = app_with(Service::Rentals, store, catalog);

        post_json(&app, "/rent", r#"{"catalog_id": 42, "price": 10.0}"#).await;

        let request = Request::builder()
            .uri("/rentals")
            .header("baggage", "divert=bob")
            .body(Body::empty())
            .unwrap();
        let (status, rentals) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rentals[0]["original_title"], "Remote");
        assert_eq!(rentals[0]["price"], json!(10.0 * RENTAL_MARKUP));
    }

    #[tokio::test]
    async fn bad_remote_catalog_item_keeps_other_rentals() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 42, "price": 10.0},
                {"id": 7, "price": "n/a"}
            ])))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryDocumentStore::new());
        let catalog = Arc::new(HttpCatalog::new(&server.uri(), Duration::from_secs(2)).unwrap());
        let app = app_with(Service::Rentals, store, catalog);

        post_json(&app, "/rent", r#"{"catalog_id": 42, "price": 10.0}"#).await;
        post_json(&app, "/rent", r#"{"catalog_id": 7, "price": 1.0}"#).await;

        let (status, rentals) = get(&app, "/rentals").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rentals.as_array().unwrap().len(), 1);
        assert_eq!(rentals[0]["catalog_id"], "42");
        assert_eq!(rentals[0]["price"], json!(10.0 * RENTAL_MARKUP));
    }
}
