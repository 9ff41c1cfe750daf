//! Readiness endpoint

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB (and Redis, if configured) answer a ping
async fn readiness_check(State(state): State<AppState>) -> Response {
    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            if database::mongodb::check_health(&state.db).await {
                Ok(())
            } else {
                Err("ping failed".to_string())
            }
        }),
    )];

    if let Some(ref redis) = state.redis {
        checks.push((
            "redis",
            Box::pin(async move {
                if database::redis::check_health(redis).await {
                    Ok(())
                } else {
                    Err("ping failed".to_string())
                }
            }),
        ));
    }

    run_health_checks(checks).await
}
