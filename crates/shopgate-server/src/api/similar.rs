//! POST /api/products/similar: similar products from a creator's catalog.

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use shopgate_core::Product;
use shopgate_upstream::AgentClient;

use crate::middleware::TraceId;

use super::{parse_body, required, ApiError, AppState};

const MAX_SIMILAR: u32 = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SimilarRequest {
    creator_slug: Option<String>,
    product_id: Option<String>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct SimilarResponse {
    products: Vec<Product>,
}

pub(super) fn normalize_limit(limit: Option<u32>) -> Option<u32> {
    limit.map(|l| l.clamp(1, MAX_SIMILAR))
}

pub(super) async fn similar_products(
    State(state): State<AppState>,
    Extension(trace): Extension<TraceId>,
    body: Result<Json<SimilarRequest>, JsonRejection>,
) -> Result<Json<SimilarResponse>, ApiError> {
    let request = parse_body(body)?;
    let (Some(slug), Some(product_id)) = (
        required(request.creator_slug.as_deref()),
        required(request.product_id.as_deref()),
    ) else {
        return Err(ApiError::bad_request("creatorSlug and productId are required"));
    };

    let Some(creator) = state.creators.find(slug) else {
        return Err(ApiError::not_found(format!("unknown creator: {slug}")));
    };

    let client = AgentClient::from_config(state.http.clone(), &state.config)
        .map_err(|e| ApiError::from_upstream(&e, "agent not configured"))?;

    let products = client
        .find_similar_products(
            &creator.id,
            product_id,
            normalize_limit(request.limit),
            Some(&trace.0),
        )
        .await
        .map_err(|e| ApiError::from_upstream(&e, "failed to load similar products"))?;

    Ok(Json(SimilarResponse { products }))
}
