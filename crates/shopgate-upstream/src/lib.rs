pub mod admin;
pub mod agent;
pub mod classify;
pub mod envelope;
pub mod error;
pub mod transport;

pub use admin::{AdminClient, AdminResource, AdminResponse, ADMIN_KEY_HEADER};
pub use agent::{
    AgentClient, AgentTurn, AgentTurnReply, ChatMessage, Operation, PdpRequest, PdpResponse,
    SearchParams, API_KEY_HEADER,
};
pub use classify::{
    classify_message, client_status, detail_from_body, ErrorEnvelope, PASSTHROUGH_STATUSES,
};
pub use envelope::{extract_field, EnvelopePath, ENVELOPE_PRIORITY};
pub use error::{require_fields, UpstreamError};
pub use transport::{
    outbound_headers, replay_headers, set_cookies, split_set_cookie, target_url,
    ProxiedResponse, SessionProxy,
};
