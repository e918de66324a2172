//! POST /api/pdp: PDP payload plus the derived variant view.

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopgate_catalog::{build_pdp_view, PdpView, Selection};
use shopgate_upstream::{AgentClient, PdpRequest};

use crate::middleware::TraceId;

use super::{parse_body, required, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PdpRouteRequest {
    merchant_id: Option<String>,
    product_id: Option<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    debug: bool,
    selection: Option<SelectionInput>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SelectionInput {
    color: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PdpRouteResponse {
    pdp_payload: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<PdpView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<Value>,
}

pub(super) async fn get_pdp(
    State(state): State<AppState>,
    Extension(trace): Extension<TraceId>,
    body: Result<Json<PdpRouteRequest>, JsonRejection>,
) -> Result<Json<PdpRouteResponse>, ApiError> {
    let request = parse_body(body)?;
    let (Some(merchant_id), Some(product_id)) = (
        required(request.merchant_id.as_deref()),
        required(request.product_id.as_deref()),
    ) else {
        return Err(ApiError::bad_request("merchantId and productId are required"));
    };

    let client = AgentClient::from_config(state.http.clone(), &state.config)
        .map_err(|e| ApiError::from_upstream(&e, "agent not configured"))?;

    let response = client
        .get_pdp_payload(
            &PdpRequest {
                merchant_id: merchant_id.to_string(),
                product_id: product_id.to_string(),
                include: request.include,
            },
            Some(&trace.0),
        )
        .await
        .map_err(|e| ApiError::from_upstream(&e, "failed to load product"))?;

    let selection = request.selection.unwrap_or_default();
    let view = build_pdp_view(
        &response.pdp_payload,
        Selection {
            color: required(selection.color.as_deref()),
            size: required(selection.size.as_deref()),
        },
    );

    Ok(Json(PdpRouteResponse {
        pdp_payload: response.pdp_payload,
        view,
        raw: request.debug.then_some(response.raw),
    }))
}
