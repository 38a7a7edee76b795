//! `GET /products` through the full router.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{StatusCode, header::CACHE_CONTROL};
use serde_json::json;
use tailored_core::{CategoryId, VisitorProfile};
use tailored_integration_tests::{TestApp, json_body, product_ids, sample_catalog, test_config};

async fn remember_hats(app: &TestApp, token: &str) {
    app.profiles
        .insert(
            token,
            VisitorProfile {
                category_id: Some(CategoryId::new("cat_hats")),
                category_name: Some("Hats".to_string()),
            },
        )
        .await;
}

#[tokio::test]
async fn test_recent_category_comes_first() {
    let app = TestApp::new(sample_catalog());
    remember_hats(&app, "visitor-1").await;

    let response = app
        .get(
            "/products",
            &[("cookie", "userId=visitor-1"), ("x-simulated-country", "FR")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let all = &body["all_products_section"];
    assert_eq!(all["category_name"], "Hats");
    assert_eq!(
        product_ids(&all["products"]),
        ["p05", "p02", "p06", "p04", "p03", "p01"]
    );
}

#[tokio::test]
async fn test_personalized_section_is_hydrated() {
    let app = TestApp::new(sample_catalog());

    let body = json_body(
        app.get("/products", &[("x-simulated-country", "FR")])
            .await,
    )
    .await;

    let personalized = &body["personalized_section"];
    assert_eq!(personalized["country"], "France");
    assert_eq!(
        personalized["continent_text"],
        json!({"article": "a", "name": "European"})
    );
    assert_eq!(product_ids(&personalized["products"]), ["p01", "p02"]);

    // Full catalog records, not the id-only projection
    let first = &personalized["products"][0];
    assert_eq!(first["title"], "Product p01");
    assert_eq!(first["categories"][0]["name"], "Bags");
}

#[tokio::test]
async fn test_anonymous_visitor_keeps_catalog_grouping() {
    let app = TestApp::new(sample_catalog());

    let body = json_body(app.get("/products", &[]).await).await;

    let all = &body["all_products_section"];
    assert!(all.get("category_name").is_none());
    assert_eq!(
        product_ids(&all["products"]),
        ["p06", "p04", "p05", "p02", "p03", "p01"]
    );

    // No country header: configured default (US, North America)
    let personalized = &body["personalized_section"];
    assert_eq!(personalized["country"], "United States");
    assert_eq!(personalized["continent_text"]["name"], "North American");
    assert_eq!(product_ids(&personalized["products"]), ["p04"]);
}

#[tokio::test]
async fn test_simulated_country_overrides_geo_header() {
    let app = TestApp::new(sample_catalog());

    let body = json_body(
        app.get(
            "/products",
            &[("x-simulated-country", "JP"), ("x-vercel-ip-country", "FR")],
        )
        .await,
    )
    .await;

    assert_eq!(body["personalized_section"]["country"], "Japan");
    assert_eq!(product_ids(&body["personalized_section"]["products"]), ["p06"]);
}

#[tokio::test]
async fn test_unknown_visitor_token_is_anonymous() {
    let app = TestApp::new(sample_catalog());
    remember_hats(&app, "visitor-1").await;

    let body = json_body(app.get("/products", &[("cookie", "userId=someone-else")]).await).await;

    assert!(body["all_products_section"].get("category_name").is_none());
    assert_eq!(
        product_ids(&body["all_products_section"]["products"])[0],
        "p06"
    );
}

#[tokio::test]
async fn test_cache_control_header() {
    let app = TestApp::new(sample_catalog());

    let response = app.get("/products", &[]).await;

    assert_eq!(
        response.headers().get(CACHE_CONTROL).unwrap(),
        "max-age=604800, must-revalidate"
    );
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_cache_max_age_is_configurable() {
    let mut config = test_config();
    config.products_max_age = 60;
    let app = TestApp::with_config(sample_catalog(), config);

    let response = app.get("/products", &[]).await;

    assert_eq!(
        response.headers().get(CACHE_CONTROL).unwrap(),
        "max-age=60, must-revalidate"
    );
}

#[tokio::test]
async fn test_catalog_failure_is_bad_gateway() {
    let app = TestApp::new(sample_catalog());
    app.catalog.set_failing(true);

    let response = app.get("/products", &[]).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_ne!(
        response.headers().get(CACHE_CONTROL).unwrap(),
        "max-age=604800, must-revalidate"
    );
}
