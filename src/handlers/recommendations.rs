use crate::{
    error::ApiError,
    models::{RecommendationRequest, RecommendationResponse},
    services::RecommendationService,
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};

pub fn recommendations_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/recommendations").route(web::post().to(get_recommendations)));
}

/// Get book recommendations for a free-text query.
///
/// Rejects blank queries up front so the search backend is never consulted
/// for them.
pub async fn get_recommendations(
    request: Json<RecommendationRequest>,
    recommendation_service: web::Data<RecommendationService>,
) -> Result<HttpResponse, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::EmptyQuery);
    }

    let recommendations = recommendation_service
        .recommend(&request.query, request.top_k)
        .await?;

    Ok(HttpResponse::Ok().json(RecommendationResponse { recommendations }))
}
