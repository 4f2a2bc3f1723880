//! boxscout-api — the inbound webhook surface.
//!
//! A single route, `GET /hook`, sets the scheduler's trigger event. Every
//! other path falls through to axum's 404. The endpoint performs no
//! authentication; deployments are expected to bind it to a trusted
//! network.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::sync::Notify;
use tracing::debug;

/// Shared state for the webhook handler.
#[derive(Clone)]
pub struct ApiState {
    pub trigger: Arc<Notify>,
}

/// Build the webhook router around the scheduler's trigger event.
pub fn build_router(trigger: Arc<Notify>) -> Router {
    Router::new()
        .route("/hook", get(hook))
        .with_state(ApiState { trigger })
}

/// GET /hook — request an out-of-band reconciliation cycle.
///
/// Repeated calls coalesce; at most one extra cycle is ever pending.
async fn hook(State(state): State<ApiState>) -> StatusCode {
    debug!("refresh hook invoked");
    state.trigger.notify_one();
    StatusCode::NO_CONTENT
}
