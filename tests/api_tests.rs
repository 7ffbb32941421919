use actix_web::{test, web, App};
use async_trait::async_trait;
use readnext::error::{ApiError, Result};
use readnext::routes::api_routes;
use readnext::services::{CatalogStore, RecommendationService, SearchMatch, SimilaritySearch};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

struct StubSearch {
    ids: Vec<i64>,
}

#[async_trait]
impl SimilaritySearch for StubSearch {
    async fn search(&self, _text: &str, k: usize) -> Result<Vec<SearchMatch>> {
        Ok(self
            .ids
            .iter()
            .take(k)
            .enumerate()
            .map(|(rank, id)| SearchMatch {
                score: 1.0 - rank as f32 * 0.1,
                metadata: json!({ "id": id }),
            })
            .collect())
    }
}

struct DownSearch;

#[async_trait]
impl SimilaritySearch for DownSearch {
    async fn search(&self, _text: &str, _k: usize) -> Result<Vec<SearchMatch>> {
        Err(ApiError::IndexUnavailable("connection refused".to_string()))
    }
}

fn catalog_with_rows(n: usize) -> (NamedTempFile, Arc<CatalogStore>) {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "title,author,description,coverImg").unwrap();
    for i in 0..n {
        writeln!(file, "Book {i},Author {i},Description {i},http://img/{i}.jpg").unwrap();
    }
    let catalog = Arc::new(CatalogStore::load(file.path()).unwrap());
    (file, catalog)
}

fn recommendation_service(search: Arc<dyn SimilaritySearch>) -> web::Data<RecommendationService> {
    let (_file, catalog) = catalog_with_rows(8);
    web::Data::new(RecommendationService::new(search, catalog))
}

#[actix_web::test]
async fn recommendations_returns_ranked_books() {
    let service = recommendation_service(Arc::new(StubSearch {
        ids: vec![3, 1, 4, 1, 5],
    }));
    let app =
        test::init_service(App::new().app_data(service).service(api_routes())).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(json!({ "query": "desert worlds" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    let recommendations = body["recommendations"].as_array().unwrap();
    let ids: Vec<u64> = recommendations
        .iter()
        .map(|b| b["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 1, 4, 1, 5]);
    assert_eq!(recommendations[0]["title"], "Book 3");
    assert_eq!(recommendations[0]["coverImageUrl"], "http://img/3.jpg");
}

#[actix_web::test]
async fn recommendations_honors_top_k() {
    let service = recommendation_service(Arc::new(StubSearch {
        ids: vec![0, 1, 2, 3, 4, 5, 6],
    }));
    let app =
        test::init_service(App::new().app_data(service).service(api_routes())).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(json!({ "query": "anything", "top_k": 2 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);

    // Default is five when top_k is omitted.
    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(json!({ "query": "anything" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn blank_query_is_rejected_with_400() {
    let service = recommendation_service(Arc::new(StubSearch { ids: vec![0] }));
    let app =
        test::init_service(App::new().app_data(service).service(api_routes())).await;

    for query in ["", "   "] {
        let req = test::TestRequest::post()
            .uri("/api/recommendations")
            .set_json(json!({ "query": query }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "query {:?}", query);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Query cannot be empty");
    }
}

#[actix_web::test]
async fn search_outage_maps_to_503_with_no_partial_results() {
    let service = recommendation_service(Arc::new(DownSearch));
    let app =
        test::init_service(App::new().app_data(service).service(api_routes())).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(json!({ "query": "novels" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("try again"));
    assert!(body.get("recommendations").is_none());
}

#[actix_web::test]
async fn health_endpoint_reports_ok() {
    let service = recommendation_service(Arc::new(StubSearch { ids: vec![] }));
    let app =
        test::init_service(App::new().app_data(service).service(api_routes())).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}
