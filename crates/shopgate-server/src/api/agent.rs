//! POST /api/agent/turn: one conversational turn with a creator's agent.

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopgate_core::Product;
use shopgate_upstream::{AgentClient, AgentTurn, ChatMessage, SearchParams};

use crate::middleware::TraceId;

use super::{parse_body, required, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AgentTurnRequest {
    creator_id: Option<String>,
    #[serde(default)]
    messages: Vec<MessageInput>,
    user_id: Option<String>,
    #[serde(default)]
    recent_queries: Vec<String>,
    trace_id: Option<String>,
    search: Option<SearchInput>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageInput {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchInput {
    page: Option<u32>,
    limit: Option<u32>,
    query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AgentTurnResponse {
    reply: Option<String>,
    products: Vec<Product>,
    #[serde(rename = "page_info", skip_serializing_if = "Option::is_none")]
    page_info: Option<Value>,
    raw_agent_response: Value,
    agent_url_used: String,
}

pub(super) async fn agent_turn(
    State(state): State<AppState>,
    Extension(trace): Extension<TraceId>,
    body: Result<Json<AgentTurnRequest>, JsonRejection>,
) -> Result<Json<AgentTurnResponse>, ApiError> {
    let agent_configured = state.config.agent_url.is_some();
    let request = parse_body(body)
        .map_err(|e| with_turn_context(e, &trace.0, agent_configured))?;
    let trace_id = required(request.trace_id.as_deref())
        .unwrap_or(&trace.0)
        .to_string();
    let fail = |error: ApiError| with_turn_context(error, &trace_id, agent_configured);

    let Some(creator_id) = required(request.creator_id.as_deref()) else {
        return Err(fail(ApiError::bad_request("creatorId is required")));
    };
    if request.messages.is_empty() {
        return Err(fail(ApiError::bad_request("messages must not be empty")));
    }

    let client = AgentClient::from_config(state.http.clone(), &state.config)
        .map_err(|e| fail(ApiError::from_upstream(&e, "agent not configured")))?;

    let turn = AgentTurn {
        creator_id: creator_id.to_string(),
        messages: request
            .messages
            .into_iter()
            .map(|m| ChatMessage {
                role: m.role,
                content: m.content,
            })
            .collect(),
        user_id: request.user_id,
        recent_queries: request.recent_queries,
        search: request.search.map(|s| SearchParams {
            page: s.page,
            limit: s.limit,
            query: s.query,
        }),
    };

    let reply = client
        .creator_agent_turn(&turn, Some(&trace_id))
        .await
        .map_err(|e| fail(ApiError::from_upstream(&e, "agent turn failed")))?;

    Ok(Json(AgentTurnResponse {
        reply: reply.reply,
        products: reply.products,
        page_info: reply.page_info,
        raw_agent_response: reply.raw,
        agent_url_used: client.endpoint().to_string(),
    }))
}

/// Every agent-turn failure carries the trace id, whether an agent URL is
/// configured, and `upstreamStatus` (`null` when no upstream answered).
fn with_turn_context(error: ApiError, trace_id: &str, agent_configured: bool) -> ApiError {
    error
        .with_context("traceId", trace_id)
        .with_context("agentUrlConfigured", agent_configured)
        .with_context_default("upstreamStatus", Value::Null)
}
