use std::sync::Arc;

use axum::{extract::State, Json};
use common::types::Money;
use service::counter::{CounterStore, IncrementService};

use crate::{errors::ApiError, metrics};

/// Shared router state. The store is chosen by the caller.
#[derive(Clone)]
pub struct ServerState {
    pub counter: IncrementService<dyn CounterStore>,
}

impl ServerState {
    pub fn new<S: CounterStore + 'static>(store: Arc<S>) -> Self {
        let store: Arc<dyn CounterStore> = store;
        Self { counter: IncrementService::new(store) }
    }
}

#[utoipa::path(
    post, path = "/click", tag = "counter",
    responses(
        (status = 200, description = "Counter advanced by one", body = crate::openapi::MoneyResponse),
        (status = 500, description = "Storage fault; counter unchanged", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn click(State(state): State<ServerState>) -> Result<Json<Money>, ApiError> {
    let timer = metrics::CLICK_DURATION.start_timer();
    let res = state.counter.handle_increment().await;
    timer.observe_duration();
    match res {
        Ok(money) => {
            metrics::CLICKS_TOTAL.inc();
            Ok(Json(money))
        }
        Err(fault) => {
            metrics::STORAGE_FAULTS_TOTAL.inc();
            Err(fault.into())
        }
    }
}

#[utoipa::path(
    get, path = "/money", tag = "counter",
    responses(
        (status = 200, description = "Current counter value", body = crate::openapi::MoneyResponse),
        (status = 500, description = "Storage fault", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn money(State(state): State<ServerState>) -> Result<Json<Money>, ApiError> {
    state.counter.handle_read().await.map(Json).map_err(|fault| {
        metrics::STORAGE_FAULTS_TOTAL.inc();
        fault.into()
    })
}
