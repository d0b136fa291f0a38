use api::AppState;
use axum::{routing::get, Router};

pub fn build_app(state: AppState) -> Router {
    debug_assert!(runtime::module_ready());
    debug_assert!(api::module_ready());
    debug_assert!(ui::module_ready());

    let router = api::routes::router(state).route("/health", get(healthcheck));
    api::with_no_cache(router)
}

async fn healthcheck() -> &'static str {
    "ok"
}
