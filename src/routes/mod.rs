//! HTTP routes

pub mod offers;
pub mod pricing;
pub mod requests;
pub mod responses;

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;
use responses::HealthResponse;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/catalog", get(pricing::list_catalog))
        .route("/api/catalog/:code", get(pricing::get_catalog_entry))
        .route("/api/pricing/dimensions", post(pricing::price_dimensions))
        .route("/api/pricing/optibrush", post(pricing::price_optibrush))
        .route("/api/pricing/discount", post(pricing::convert_discount))
        .route("/api/offers", post(offers::create_offer))
        .route("/api/offers/:id", get(offers::get_offer).delete(offers::close_offer))
        .route("/api/offers/:id/type", put(offers::set_offer_type))
        .route("/api/offers/:id/frequency", put(offers::set_frequency))
        .route("/api/offers/:id/items", post(offers::add_item))
        .route(
            "/api/offers/:id/items/:item_id",
            axum::routing::patch(offers::update_item).delete(offers::remove_item),
        )
        .route("/api/offers/:id/next", post(offers::next_step))
        .route("/api/offers/:id/back", post(offers::previous_step))
        .route("/api/offers/:id/summary", get(offers::summary))
        .route("/api/offers/:id/save", post(offers::save_offer))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        catalog_entries: state.catalog.len(),
        cache: state.sessions.stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>) -> (StatusCode, Value,
    ) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn app() -> Router {
        router(AppState::builtin())
    }

    // ==================== catalog / pricing tests ====================

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["catalog_entries"], 6);
    }

    #[tokio::test]
    async fn test_catalog_lookup() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/catalog/STD-85x60", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "STD-85x60");
        assert_eq!(body["m2"], "0.51");

        let (status, body) = send(&app, Method::GET, "/api/catalog/NOPE", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_type"], "not_found");
    }

    #[tokio::test]
    async fn test_dimension_pricing() {
        let body = json!({ "size": "120*180", "purpose": "nakup", "special_shape": true });
        let uri = "/api/pricing/dimensions";
        let (status, body) = send(&app(), Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["m2"], "2.16");
        assert_eq!(body["price"], "534.60");
    }

    #[tokio::test]
    async fn test_optibrush_pricing() {
        let body = json!({ "widthCm": 85, "heightCm": 150 });
        let (status, body) = send(&app(), Method::POST, "/api/pricing/optibrush", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalPrice"], "152.32");
    }

    #[tokio::test]
    async fn test_discount_conversion() {
        let app = app();
        let body = json!({ "original_price": "12.00", "discount": 25 });
        let (_, body) = send(&app, Method::POST, "/api/pricing/discount", Some(body)).await;
        assert_eq!(body["price"], "9.00");

        let body = json!({ "original_price": "12.00", "price": "9.00" });
        let (_, body) = send(&app, Method::POST, "/api/pricing/discount", Some(body)).await;
        assert_eq!(body["discount"], 25);

        let body = json!({ "original_price": "12.00" });
        let (status, _) = send(&app, Method::POST, "/api/pricing/discount", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ==================== offer session tests ====================

    async fn create(app: &Router, offer_type: &str) -> (String, Value) {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/offers",
            Some(json!({ "offer_type": offer_type, "frequency": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["offer"]["id"].as_str().unwrap().to_string();
        (id, body)
    }

    #[tokio::test]
    async fn test_rental_offer_flow() {
        let app = app();
        let (id, body) = create(&app, "najem").await;
        assert_eq!(body["offer"]["step"], "type");
        let item_id = body["offer"]["rentalItems"][0]["id"].as_u64().unwrap();

        let next_uri = format!("/api/offers/{}/next", id);
        let (_, body) = send(&app, Method::POST, &next_uri, None).await;
        assert_eq!(body["offer"]["step"], "items-najem");
        assert_eq!(body["can_advance"], false);

        let (status, body) = send(&app, Method::POST, &next_uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_type"], "incomplete_items");
        assert_eq!(body["details"]["step"], "items-najem");

        let item_uri = format!("/api/offers/{}/items/{}", id, item_id);
        let select = json!({ "action": "select_code", "code": "STD-85x60" });
        send(&app, Method::PATCH, &item_uri, Some(select)).await;
        let discount = json!({ "action": "set_discount", "discount": 25 });
        let (status, body) = send(&app, Method::PATCH, &item_uri, Some(discount)).await;
        assert_eq!(status, StatusCode::OK);
        let item = &body["offer"]["rentalItems"][0];
        assert_eq!(item["pricePerUnit"], "9.00");
        assert_eq!(item["originalPrice"], "12.00");

        let (_, body) = send(&app, Method::POST, &next_uri, None).await;
        assert_eq!(body["offer"]["step"], "preview");

        let summary_uri = format!("/api/offers/{}/summary?week=20", id);
        let (_, body) = send(&app, Method::GET, &summary_uri, None).await;
        assert_eq!(body["summary"]["kind"], "rental");
        assert_eq!(body["summary"]["weeklyTotal"], "9.00");
        assert_eq!(body["summary"]["fourWeekTotal"], "36.00");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/offers/{}/save", id),
            Some(json!({ "company": "Hotel Bled", "week": 20 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"], "Ponudba za najem predpražnikov - Hotel Bled");

        let (status, _) = send(&app, Method::GET, &format!("/api/offers/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_frequency_change_reports_repriced_items() {
        let app = app();
        let (id, body) = create(&app, "najem").await;
        let item_id = body["offer"]["rentalItems"][0]["id"].as_u64().unwrap();
        let item_uri = format!("/api/offers/{}/items/{}", id, item_id);
        let select = json!({ "action": "select_code", "code": "STD-85x60" });
        send(&app, Method::PATCH, &item_uri, Some(select)).await;

        let (_, body) = send(
            &app,
            Method::PUT,
            &format!("/api/offers/{}/frequency", id),
            Some(json!({ "frequency": 4 })),
        )
        .await;
        assert_eq!(body["repriced_items"], 1);
        assert_eq!(body["offer"]["rentalItems"][0]["pricePerUnit"], "9.90");
    }

    #[tokio::test]
    async fn test_invalid_item_command() {
        let app = app();
        let (id, body) = create(&app, "nakup").await;
        let item_id = body["offer"]["purchaseItems"][0]["id"].as_u64().unwrap();
        let item_uri = format!("/api/offers/{}/items/{}", id, item_id);

        let seasonal = json!({ "action": "enable_seasonal" });
        let (status, body) = send(&app, Method::PATCH, &item_uri, Some(seasonal)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "invalid_operation");

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/offers/{}/items/999", id),
            Some(json!({ "action": "set_name", "name": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_and_remove_items() {
        let app = app();
        let (id, _) = create(&app, "primerjava").await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/offers/{}/items", id),
            Some(json!({ "list": "purchase" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let purchase = body["offer"]["purchaseItems"].as_array().unwrap();
        assert_eq!(purchase.len(), 2);
        let added = purchase[1]["id"].as_u64().unwrap();

        let item_uri = format!("/api/offers/{}/items/{}", id, added);
        let (_, body) = send(&app, Method::DELETE, &item_uri, None).await;
        assert_eq!(body["offer"]["purchaseItems"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_close_offer() {
        let app = app();
        let (id, _) = create(&app, "dodatna").await;
        let (status, _) = send(&app, Method::DELETE, &format!("/api/offers/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &format!("/api/offers/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_summary_rejects_bad_week() {
        let app = app();
        let (id, _) = create(&app, "najem").await;
        let summary_uri = format!("/api/offers/{}/summary?week=60", id);
        let (status, _) = send(&app, Method::GET, &summary_uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
